//! Expression AST - the core of SQL expression building.
//!
//! This module provides a strongly-typed AST for SQL expressions. Rendering
//! lives in the [`StatementCompiler`](crate::compiler::StatementCompiler),
//! which matches exhaustively over [`Expr`].

use crate::driver::Value;
use crate::types::SqlType;

use super::query::{Query, SelectExpr};

// =============================================================================
// Expression AST
// =============================================================================

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference: optional_table.column
    Column {
        table: Option<String>,
        column: String,
    },

    /// Literal values
    Literal(Literal),

    /// Bound parameter. Rendered as a placeholder, or inlined in literal-binds mode.
    BindParam {
        name: String,
        value: Value,
        ty: Option<SqlType>,
    },

    /// Binary operation: left op right
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: op expr
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// LIKE / NOT LIKE. Databend has no ESCAPE clause; `escape` is dropped
    /// when rendering.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<char>,
        negated: bool,
    },

    /// Function call
    Function {
        func: Func,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// CAST(expr AS type)
    Cast { expr: Box<Expr>, ty: SqlType },

    /// CASE WHEN... THEN... ELSE... END
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    /// Subquery: (SELECT ...)
    Subquery(Box<Query>),

    /// IN: expr IN (values...)
    In {
        expr: Box<Expr>,
        values: Vec<Expr>,
        negated: bool,
    },

    /// BETWEEN: expr BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Wildcard: * or table.*
    Star { table: Option<String> },

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Raw SQL expression passed directly to output without escaping.
    ///
    /// Never pass user input here.
    Raw(String),
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // String
    Concat,
}

impl BinaryOperator {
    /// Binding strength; higher binds tighter.
    ///
    /// `Concat` renders as a function call and never needs grouping.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOperator::Or => 1,
            BinaryOperator::And => 2,
            BinaryOperator::Eq
            | BinaryOperator::Ne
            | BinaryOperator::Lt
            | BinaryOperator::Gt
            | BinaryOperator::Lte
            | BinaryOperator::Gte => 4,
            BinaryOperator::Plus | BinaryOperator::Minus => 5,
            BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => 6,
            BinaryOperator::Concat => u8::MAX,
        }
    }

    /// Comparisons do not chain: `a = b = c` is grouped explicitly.
    pub fn is_comparison(self) -> bool {
        self.precedence() == BinaryOperator::Eq.precedence()
    }

    /// `a - (b - c)` differs from `a - b - c`.
    pub fn is_right_sensitive(self) -> bool {
        matches!(
            self,
            BinaryOperator::Minus | BinaryOperator::Div | BinaryOperator::Mod
        )
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

/// Functions with Databend-specific spellings, plus a pass-through for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Func {
    /// `count(..)`; no arguments means `count(*)`.
    Count,
    /// Rendered as `rand()`.
    Random,
    /// Rendered as `now()`.
    Now,
    /// Rendered as `today()`.
    CurrentDate,
    /// `substring(s, start[, length])`.
    Substring,
    /// Any other function, emitted by name.
    Named(String),
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create a column reference.
pub fn col(name: &str) -> Expr {
    Expr::Column {
        table: None,
        column: name.into(),
    }
}

/// Create a qualified column reference (table.column).
pub fn table_col(table: &str, column: &str) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        column: column.into(),
    }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expr {
    Expr::Literal(Literal::Bool(b))
}

/// Create a NULL literal.
pub fn lit_null() -> Expr {
    Expr::Literal(Literal::Null)
}

/// Create a star (*) expression.
pub fn star() -> Expr {
    Expr::Star { table: None }
}

/// Create a qualified star (table.*) expression.
pub fn table_star(table: &str) -> Expr {
    Expr::Star {
        table: Some(table.into()),
    }
}

/// Untyped bound parameter.
pub fn bind(name: &str, value: impl Into<Value>) -> Expr {
    Expr::BindParam {
        name: name.into(),
        value: value.into(),
        ty: None,
    }
}

/// Bound parameter with a declared type. The type drives literal rendering
/// and explicit bind casts.
pub fn typed_bind(name: &str, value: impl Into<Value>, ty: SqlType) -> Expr {
    Expr::BindParam {
        name: name.into(),
        value: value.into(),
        ty: Some(ty),
    }
}

/// CAST(expr AS ty)
pub fn cast(expr: impl Into<Expr>, ty: SqlType) -> Expr {
    Expr::Cast {
        expr: Box::new(expr.into()),
        ty,
    }
}

// =============================================================================
// Functions
// =============================================================================

/// count(expr)
pub fn count(expr: Expr) -> Expr {
    Expr::Function {
        func: Func::Count,
        args: vec![expr],
        distinct: false,
    }
}

/// count(*)
pub fn count_star() -> Expr {
    Expr::Function {
        func: Func::Count,
        args: vec![],
        distinct: false,
    }
}

/// count(DISTINCT expr)
pub fn count_distinct(expr: Expr) -> Expr {
    Expr::Function {
        func: Func::Count,
        args: vec![expr],
        distinct: true,
    }
}

/// random()
pub fn random() -> Expr {
    Expr::Function {
        func: Func::Random,
        args: vec![],
        distinct: false,
    }
}

/// now()
pub fn now() -> Expr {
    Expr::Function {
        func: Func::Now,
        args: vec![],
        distinct: false,
    }
}

/// current_date()
pub fn current_date() -> Expr {
    Expr::Function {
        func: Func::CurrentDate,
        args: vec![],
        distinct: false,
    }
}

/// substring(s, start[, length])
pub fn substring(s: Expr, start: impl Into<Expr>, length: Option<Expr>) -> Expr {
    let mut args = vec![s, start.into()];
    args.extend(length);
    Expr::Function {
        func: Func::Substring,
        args,
        distinct: false,
    }
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        func: Func::Named(name.into()),
        args,
        distinct: false,
    }
}

/// Raw SQL expression (pass-through, no parsing).
///
/// Never pass user input to this function.
pub fn raw_sql(sql: &str) -> Expr {
    Expr::Raw(sql.into())
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn binary(self, op: BinaryOperator, other: impl Into<Expr>) -> Expr {
        Expr::BinaryOp {
            left: Box::new(self.into_expr()),
            op,
            right: Box::new(other.into()),
        }
    }

    fn eq(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Eq, other)
    }

    fn ne(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Ne, other)
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gt, other)
    }

    fn gte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Gte, other)
    }

    fn lt(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lt, other)
    }

    fn lte(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Lte, other)
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::And, other)
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Or, other)
    }

    fn not(self) -> Expr {
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr: Box::new(self.into_expr()),
        }
    }

    fn add(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Plus, other)
    }

    fn sub(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Minus, other)
    }

    fn mul(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Mul, other)
    }

    fn div(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Div, other)
    }

    /// String concatenation. Databend has no `||`; rendered as `concat(l, r)`.
    fn concat(self, other: impl Into<Expr>) -> Expr {
        self.binary(BinaryOperator::Concat, other)
    }

    fn like(self, pattern: impl Into<Expr>) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape: None,
            negated: false,
        }
    }

    fn not_like(self, pattern: impl Into<Expr>) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape: None,
            negated: true,
        }
    }

    fn like_escape(self, pattern: impl Into<Expr>, escape: char) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape: Some(escape),
            negated: false,
        }
    }

    fn not_like_escape(self, pattern: impl Into<Expr>, escape: char) -> Expr {
        Expr::Like {
            expr: Box::new(self.into_expr()),
            pattern: Box::new(pattern.into()),
            escape: Some(escape),
            negated: true,
        }
    }

    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: false,
        }
    }

    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self.into_expr()),
            negated: true,
        }
    }

    fn in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: false,
        }
    }

    fn not_in_list(self, values: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self.into_expr()),
            values,
            negated: true,
        }
    }

    fn between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    fn not_between(self, low: impl Into<Expr>, high: impl Into<Expr>) -> Expr {
        Expr::Between {
            expr: Box::new(self.into_expr()),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: true,
        }
    }

    fn paren(self) -> Expr {
        Expr::Paren(Box::new(self.into_expr()))
    }

    /// Add an alias, producing a SELECT list item.
    fn alias(self, name: &str) -> SelectExpr {
        SelectExpr::new(self.into_expr()).with_alias(name)
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Literal(Literal::String(s))
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<Query> for Expr {
    fn from(query: Query) -> Self {
        Expr::Subquery(Box::new(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_shapes() {
        let e = col("a").eq(1);
        assert!(matches!(
            e,
            Expr::BinaryOp {
                op: BinaryOperator::Eq,
                ..
            }
        ));

        let e = col("name").like_escape("a%", '\\');
        assert!(matches!(
            e,
            Expr::Like {
                escape: Some('\\'),
                negated: false,
                ..
            }
        ));
    }

    #[test]
    fn test_substring_optional_length() {
        match substring(col("s"), 2, None) {
            Expr::Function { func, args, .. } => {
                assert_eq!(func, Func::Substring);
                assert_eq!(args.len(), 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        match substring(col("s"), 2, Some(lit_int(3))) {
            Expr::Function { args, .. } => assert_eq!(args.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bind_carries_type() {
        let e = typed_bind("gap", "1 day", SqlType::Interval);
        assert!(matches!(
            e,
            Expr::BindParam {
                ty: Some(SqlType::Interval),
                ..
            }
        ));
    }
}
