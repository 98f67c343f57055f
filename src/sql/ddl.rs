//! DDL (Data Definition Language) support.
//!
//! Table metadata plus the statement nodes the
//! [`DdlCompiler`](crate::compiler::DdlCompiler) renders. Constraints and
//! indexes are part of the model so callers can describe a table portably;
//! Databend has neither, so the compiler renders them as nothing.
//!
//! # Examples
//!
//! ```ignore
//! use databend_dialect::sql::ddl::{ClusterBy, ColumnDef, Table, TableOptions};
//! use databend_dialect::types::SqlType;
//!
//! let table = Table::new("events")
//!     .column(ColumnDef::new("id", SqlType::BigInt).not_null())
//!     .column(ColumnDef::new("ts", SqlType::DateTime))
//!     .options(TableOptions::new().engine("FUSE").cluster_by(ClusterBy::columns(["ts"])));
//! ```

use super::expr::Expr;
use crate::types::SqlType;

/// DDL statement types.
#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    CreateTable(Table),
    DropTable(DropTable),
    CreateSchema(CreateSchema),
    DropSchema(DropSchema),
    CreateIndex(CreateIndex),
    DropIndex(DropIndex),
}

// ============================================================================
// Table metadata
// ============================================================================

/// A table definition: the unit CREATE TABLE renders and reflection rebuilds.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct Table {
    pub schema: Option<String>,
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
    /// Words placed between CREATE and TABLE, e.g. `TRANSIENT`.
    pub prefixes: Vec<String>,
    pub options: TableOptions,
}

impl Table {
    /// Create a new table definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            prefixes: Vec::new(),
            options: TableOptions::default(),
        }
    }

    /// Set the schema.
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a column definition.
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }

    /// Add multiple column definitions.
    pub fn columns(mut self, cols: impl IntoIterator<Item = ColumnDef>) -> Self {
        self.columns.extend(cols);
        self
    }

    /// Add a table constraint.
    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add a prefix word (`CREATE <prefix> TABLE`).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Set Databend table options.
    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Look up a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Column definition.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct ColumnDef {
    pub name: String,
    pub data_type: SqlType,
    pub nullable: bool,
    pub default: Option<Expr>,
    pub primary_key: bool,
}

impl ColumnDef {
    /// Create a new nullable column definition.
    pub fn new(name: impl Into<String>, data_type: SqlType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
        }
    }

    /// Add NOT NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set DEFAULT value.
    pub fn default(mut self, expr: Expr) -> Self {
        self.default = Some(expr);
        self
    }

    /// Mark as primary key. Implies NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }
}

/// Table constraints. Databend enforces none of them.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    PrimaryKey {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        ref_table: String,
        ref_columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    Check {
        name: Option<String>,
        expr: Expr,
    },
}

impl TableConstraint {
    /// Create a PRIMARY KEY constraint.
    pub fn primary_key(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        TableConstraint::PrimaryKey {
            name: None,
            columns: columns.into_iter().map(|c| c.into()).collect(),
        }
    }

    /// Create a UNIQUE constraint.
    pub fn unique(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        TableConstraint::Unique {
            name: None,
            columns: columns.into_iter().map(|c| c.into()).collect(),
        }
    }

    /// Create a FOREIGN KEY constraint.
    pub fn foreign_key(
        columns: impl IntoIterator<Item = impl Into<String>>,
        ref_table: impl Into<String>,
        ref_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        TableConstraint::ForeignKey {
            name: None,
            columns: columns.into_iter().map(|c| c.into()).collect(),
            ref_table: ref_table.into(),
            ref_columns: ref_columns.into_iter().map(|c| c.into()).collect(),
        }
    }

    /// Create a CHECK constraint.
    pub fn check(expr: Expr) -> Self {
        TableConstraint::Check { name: None, expr }
    }
}

// ============================================================================
// Databend table options
// ============================================================================

/// One cluster key: a column of the table or an arbitrary expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterKey {
    Column(String),
    Expr(Expr),
}

/// `CLUSTER BY` specification.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterBy {
    /// Key list emitted verbatim.
    Raw(String),
    /// Keys rendered with literals inlined, comma-joined.
    Keys(Vec<ClusterKey>),
}

impl ClusterBy {
    /// Cluster by plain column names.
    pub fn columns(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        ClusterBy::Keys(
            names
                .into_iter()
                .map(|n| ClusterKey::Column(n.into()))
                .collect(),
        )
    }
}

/// Dialect-specific table options carried on a [`Table`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableOptions {
    /// Storage engine, e.g. `FUSE`, `Memory`, `Iceberg`.
    pub engine: Option<String>,
    pub cluster_by: Option<ClusterBy>,
    pub transient: bool,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = Some(engine.into());
        self
    }

    pub fn cluster_by(mut self, cluster_by: ClusterBy) -> Self {
        self.cluster_by = Some(cluster_by);
        self
    }

    pub fn transient(mut self, transient: bool) -> Self {
        self.transient = transient;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.engine.is_none() && self.cluster_by.is_none() && !self.transient
    }
}

// ============================================================================
// DROP TABLE
// ============================================================================

/// DROP TABLE statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct DropTable {
    pub if_exists: bool,
    pub schema: Option<String>,
    pub name: String,
}

impl DropTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            if_exists: false,
            schema: None,
            name: name.into(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// CREATE SCHEMA statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct CreateSchema {
    pub if_not_exists: bool,
    pub name: String,
}

impl CreateSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            if_not_exists: false,
            name: name.into(),
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }
}

/// DROP SCHEMA statement. `cascade` is accepted but Databend has no such option.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct DropSchema {
    pub name: String,
    pub cascade: bool,
}

impl DropSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cascade: false,
        }
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }
}

// ============================================================================
// INDEX
// ============================================================================

/// CREATE INDEX statement. Databend has no secondary indexes of this kind.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct CreateIndex {
    pub name: String,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
}

impl CreateIndex {
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            columns: Vec::new(),
            unique: false,
        }
    }

    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns.extend(cols.into_iter().map(|c| c.into()));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// DROP INDEX statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct DropIndex {
    pub name: String,
}

impl DropIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
