//! CREATE / DROP rendering.
//!
//! Databend has no primary keys, foreign keys or secondary indexes. Those
//! constructs render as empty strings so portable table definitions still
//! produce valid DDL.

use tracing::{debug, warn};

use crate::dialect::IdentifierPreparer;
use crate::driver::ParamStyle;
use crate::error::{DialectError, Result};
use crate::sql::ddl::{
    ClusterBy, ClusterKey, ColumnDef, CreateIndex, CreateSchema, DdlStatement, DropIndex,
    DropSchema, DropTable, Table, TableConstraint,
};
use crate::sql::expr::Expr;
use crate::sql::token::{Token, TokenStream};

use super::{CompileOptions, StatementCompiler, TypeCompiler};

const TRANSIENT: &str = "TRANSIENT";

/// Renders DDL statements for Databend.
#[derive(Debug, Clone)]
pub struct DdlCompiler {
    preparer: IdentifierPreparer,
    types: TypeCompiler,
    /// Renders DEFAULT values and cluster keys with literals inlined.
    inline: StatementCompiler,
}

impl Default for DdlCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl DdlCompiler {
    pub fn new() -> Self {
        Self::with_supports_cast(true)
    }

    pub fn with_supports_cast(supports_cast: bool) -> Self {
        let inline = StatementCompiler::new()
            .with_param_style(ParamStyle::Named)
            .with_supports_cast(supports_cast)
            .with_options(
                CompileOptions::default()
                    .literal_binds(true)
                    .include_table(false),
            );
        Self {
            preparer: IdentifierPreparer::new(),
            types: TypeCompiler::new(),
            inline,
        }
    }

    /// Render any DDL statement.
    pub fn compile(&self, stmt: &DdlStatement) -> Result<String> {
        match stmt {
            DdlStatement::CreateTable(table) => self.create_table(table),
            DdlStatement::DropTable(drop) => Ok(self.drop_table(drop)),
            DdlStatement::CreateSchema(create) => Ok(self.create_schema(create)),
            DdlStatement::DropSchema(drop) => Ok(self.drop_schema(drop)),
            DdlStatement::CreateIndex(index) => Ok(self.create_index(index)),
            DdlStatement::DropIndex(index) => Ok(self.drop_index(index)),
        }
    }

    // =========================================================================
    // CREATE TABLE
    // =========================================================================

    /// Render `CREATE [TRANSIENT] TABLE` with Databend table options.
    ///
    /// ```text
    /// CREATE TABLE events (
    /// 	id BIGINT NOT NULL,
    /// 	ts DATETIME
    /// ) ENGINE=FUSE
    ///  CLUSTER BY ( ts )
    /// ```
    pub fn create_table(&self, table: &Table) -> Result<String> {
        let mut ts = TokenStream::new();

        ts.push(Token::Create).space();
        for prefix in self.table_prefixes(table) {
            ts.raw(prefix).space();
        }
        ts.push(Token::Table).space();
        ts.push(Token::QualifiedIdent {
            schema: table.schema.clone(),
            name: table.name.clone(),
        });
        ts.space().lparen();

        let mut first = true;
        for column in &table.columns {
            column_separator(&mut ts, &mut first);
            self.column_tokens(column, &mut ts)?;
        }
        for constraint in &table.constraints {
            let rendered = self.constraint(constraint);
            if !rendered.is_empty() {
                column_separator(&mut ts, &mut first);
                ts.raw(rendered);
            }
        }
        ts.newline().rparen();

        let mut sql = ts.serialize(&self.preparer);
        sql.push_str(&self.post_create_table(table)?);
        debug!(table = %table.name, "compiled CREATE TABLE");
        Ok(sql)
    }

    /// Prefix words, with TRANSIENT injected when the option asks for it.
    fn table_prefixes(&self, table: &Table) -> Vec<String> {
        let mut prefixes = table.prefixes.clone();
        if table.options.transient
            && !prefixes.iter().any(|p| p.eq_ignore_ascii_case(TRANSIENT))
        {
            prefixes.push(TRANSIENT.to_string());
        }
        prefixes
    }

    fn column_tokens(&self, column: &ColumnDef, ts: &mut TokenStream) -> Result<()> {
        ts.push(Token::Ident(column.name.clone()))
            .space()
            .raw(self.types.process(&column.data_type));
        if let Some(default) = &column.default {
            let rendered = self.inline.compile_expr(default)?.sql;
            ts.space().push(Token::Default).space().raw(rendered);
        }
        if !column.nullable {
            ts.space().push(Token::Not).space().push(Token::Null);
        }
        Ok(())
    }

    /// Constraint clause text. Databend supports none of them.
    pub fn constraint(&self, constraint: &TableConstraint) -> String {
        let kind = match constraint {
            TableConstraint::PrimaryKey { .. } => "PRIMARY KEY",
            TableConstraint::ForeignKey { .. } => "FOREIGN KEY",
            TableConstraint::Unique { .. } => "UNIQUE",
            TableConstraint::Check { .. } => "CHECK",
        };
        warn!(constraint = kind, "Databend has no table constraints; clause omitted");
        String::new()
    }

    /// ` ENGINE=<name>` and `\n CLUSTER BY ( <keys> )`, space-joined.
    fn post_create_table(&self, table: &Table) -> Result<String> {
        let mut parts = Vec::new();

        if let Some(engine) = &table.options.engine {
            let mut ts = TokenStream::new();
            ts.space()
                .push(Token::Engine)
                .push(Token::Eq)
                .raw(engine.clone());
            parts.push(ts.serialize(&self.preparer));
        }

        if let Some(cluster_by) = &table.options.cluster_by {
            let keys = match cluster_by {
                ClusterBy::Raw(raw) => raw.clone(),
                ClusterBy::Keys(keys) => keys
                    .iter()
                    .map(|key| self.cluster_key(table, key))
                    .collect::<Result<Vec<_>>>()?
                    .join(", "),
            };
            let mut ts = TokenStream::new();
            ts.newline()
                .space()
                .push(Token::ClusterBy)
                .space()
                .lparen()
                .space()
                .raw(keys)
                .space()
                .rparen();
            parts.push(ts.serialize(&self.preparer));
        }

        Ok(parts.join(" "))
    }

    fn cluster_key(&self, table: &Table, key: &ClusterKey) -> Result<String> {
        let expr = match key {
            ClusterKey::Column(name) => {
                let column = table.get_column(name).ok_or_else(|| DialectError::UnknownColumn {
                    table: table.name.clone(),
                    column: name.clone(),
                })?;
                Expr::Column {
                    table: None,
                    column: column.name.clone(),
                }
            }
            ClusterKey::Expr(expr) => expr.clone(),
        };
        Ok(self.inline.compile_expr(&expr)?.sql)
    }

    // =========================================================================
    // DROP TABLE / SCHEMA / INDEX
    // =========================================================================

    pub fn drop_table(&self, drop: &DropTable) -> String {
        let mut ts = TokenStream::new();
        ts.push(Token::Drop).space().push(Token::Table).space();
        if drop.if_exists {
            ts.push(Token::If).space().push(Token::Exists).space();
        }
        ts.push(Token::QualifiedIdent {
            schema: drop.schema.clone(),
            name: drop.name.clone(),
        });
        ts.serialize(&self.preparer)
    }

    pub fn create_schema(&self, create: &CreateSchema) -> String {
        let mut ts = TokenStream::new();
        ts.push(Token::Create).space().push(Token::Schema).space();
        if create.if_not_exists {
            ts.push(Token::If)
                .space()
                .push(Token::Not)
                .space()
                .push(Token::Exists)
                .space();
        }
        ts.push(Token::Ident(create.name.clone()));
        ts.serialize(&self.preparer)
    }

    /// `DROP SCHEMA name`. CASCADE is never emitted.
    pub fn drop_schema(&self, drop: &DropSchema) -> String {
        if drop.cascade {
            warn!(schema = %drop.name, "Databend does not support DROP SCHEMA ... CASCADE; option dropped");
        }
        let mut ts = TokenStream::new();
        ts.push(Token::Drop)
            .space()
            .push(Token::Schema)
            .space()
            .push(Token::Ident(drop.name.clone()));
        ts.serialize(&self.preparer)
    }

    pub fn create_index(&self, index: &CreateIndex) -> String {
        warn!(index = %index.name, table = %index.table, "Databend has no indexes; CREATE INDEX omitted");
        String::new()
    }

    pub fn drop_index(&self, index: &DropIndex) -> String {
        warn!(index = %index.name, "Databend has no indexes; DROP INDEX omitted");
        String::new()
    }
}

/// `\n\t` before the first entry, `, \n\t` before the rest.
fn column_separator(ts: &mut TokenStream, first: &mut bool) {
    if !*first {
        ts.comma().space();
    }
    *first = false;
    ts.newline().tab();
}
