//! SQL Tokens - the atomic units of SQL output.
//!
//! Compilers emit tokens; identifiers are only turned into text when the
//! stream is serialized against an [`IdentifierPreparer`], so quoting
//! decisions live in one place.

use crate::dialect::IdentifierPreparer;

/// SQL Token - every element the Databend compilers emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Query Keywords ===
    Select,
    Distinct,
    From,
    Where,
    And,
    Or,
    Not,
    As,
    On,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    GroupBy,
    Having,
    OrderBy,
    Asc,
    Desc,
    NullsFirst,
    NullsLast,
    Limit,
    Offset,
    Case,
    When,
    Then,
    Else,
    End,
    In,
    Between,
    Like,
    IsNull,
    IsNotNull,
    Null,
    True,
    False,
    Cast,

    // === DDL Keywords ===
    Create,
    Drop,
    Table,
    Schema,
    If,
    Exists,
    Default,
    Engine,
    ClusterBy,

    // === MERGE Keywords ===
    Merge,
    Into,
    Using,
    Matched,
    Update,
    Set,
    Delete,
    Insert,
    Values,

    // === Punctuation ===
    Comma,
    Dot,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,

    // === Whitespace / Formatting ===
    Space,
    Newline,
    Tab,
    Indent(usize),

    // === Dynamic Content ===
    /// Identifier, quoted only when the preparer requires it.
    Ident(String),
    /// Identifier, always quoted.
    QuotedIdent(String),
    /// `schema.name` or just `name`, each part quoted as needed.
    QualifiedIdent {
        schema: Option<String>,
        name: String,
    },
    /// Unsigned integer literal (LIMIT / OFFSET counts).
    LitUInt(u64),
    /// Function name, emitted as given.
    FunctionName(String),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// Compilers use this for text they have already rendered safely
    /// (literals, placeholders, type names). Never pass user input here.
    Raw(String),
}

impl Token {
    /// Serialize this token, quoting identifiers with `preparer`.
    pub fn serialize(&self, preparer: &IdentifierPreparer) -> String {
        match self {
            // Query keywords
            Token::Select => "SELECT".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::And => "AND".into(),
            Token::Or => "OR".into(),
            Token::Not => "NOT".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::Inner => "INNER".into(),
            Token::Left => "LEFT".into(),
            Token::Right => "RIGHT".into(),
            Token::Full => "FULL".into(),
            Token::Outer => "OUTER".into(),
            Token::Cross => "CROSS".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::Having => "HAVING".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Asc => "ASC".into(),
            Token::Desc => "DESC".into(),
            Token::NullsFirst => "NULLS FIRST".into(),
            Token::NullsLast => "NULLS LAST".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Case => "CASE".into(),
            Token::When => "WHEN".into(),
            Token::Then => "THEN".into(),
            Token::Else => "ELSE".into(),
            Token::End => "END".into(),
            Token::In => "IN".into(),
            Token::Between => "BETWEEN".into(),
            Token::Like => "LIKE".into(),
            Token::IsNull => "IS NULL".into(),
            Token::IsNotNull => "IS NOT NULL".into(),
            Token::Null => "NULL".into(),
            Token::True => "true".into(),
            Token::False => "false".into(),
            Token::Cast => "CAST".into(),

            // DDL keywords
            Token::Create => "CREATE".into(),
            Token::Drop => "DROP".into(),
            Token::Table => "TABLE".into(),
            Token::Schema => "SCHEMA".into(),
            Token::If => "IF".into(),
            Token::Exists => "EXISTS".into(),
            Token::Default => "DEFAULT".into(),
            Token::Engine => "ENGINE".into(),
            Token::ClusterBy => "CLUSTER BY".into(),

            // MERGE keywords
            Token::Merge => "MERGE".into(),
            Token::Into => "INTO".into(),
            Token::Using => "USING".into(),
            Token::Matched => "MATCHED".into(),
            Token::Update => "UPDATE".into(),
            Token::Set => "SET".into(),
            Token::Delete => "DELETE".into(),
            Token::Insert => "INSERT".into(),
            Token::Values => "VALUES".into(),

            // Punctuation
            Token::Comma => ",".into(),
            Token::Dot => ".".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            // Operators
            Token::Eq => "=".into(),
            Token::Ne => "!=".into(),
            Token::Lt => "<".into(),
            Token::Gt => ">".into(),
            Token::Lte => "<=".into(),
            Token::Gte => ">=".into(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Mul => "*".into(),
            Token::Div => "/".into(),
            Token::Mod => "%".into(),

            // Whitespace
            Token::Space => " ".into(),
            Token::Newline => "\n".into(),
            Token::Tab => "\t".into(),
            Token::Indent(n) => "  ".repeat(*n),

            // Dynamic
            Token::Ident(name) => preparer.quote(name),
            Token::QuotedIdent(name) => preparer.quote_identifier(name),
            Token::QualifiedIdent { schema, name } => {
                preparer.format_qualified(schema.as_deref(), name)
            }
            Token::LitUInt(n) => n.to_string(),
            Token::FunctionName(name) => name.clone(),

            // Escape hatch
            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Extend with multiple tokens.
    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) -> &mut Self {
        self.tokens.extend(tokens);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, preparer: &IdentifierPreparer) -> String {
        self.tokens.iter().map(|t| t.serialize(preparer)).collect()
    }

    // Convenience methods for common tokens
    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn tab(&mut self) -> &mut Self {
        self.push(Token::Tab)
    }
    pub fn indent(&mut self, n: usize) -> &mut Self {
        self.push(Token::Indent(n))
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.push(Token::Raw(sql.into()))
    }
}
