//! # databend-dialect
//!
//! SQL generation and catalog reflection for Databend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        sql (Expr, Query, Merge, Table, DDL nodes)        │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compiler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   StatementCompiler / DdlCompiler / TypeCompiler         │
//! │   + IdentifierPreparer (reserved-word quoting)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [dialect]
//! ┌─────────────────────────────────────────────────────────┐
//! │  DatabendDialect: DSN, version check, CompatProfile      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [reflection]
//! ┌─────────────────────────────────────────────────────────┐
//! │  Inspector: information_schema / system catalog queries  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The wire-level driver is external; it plugs in through the
//! [`driver::Connection`] and [`driver::Driver`] traits.

pub mod compiler;
pub mod config;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod reflection;
pub mod sql;
pub mod types;

// Re-export SQL submodules at crate level
pub use sql::ddl;
pub use sql::dml;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compiler::{CompileOptions, Compiled, DdlCompiler, StatementCompiler, TypeCompiler};
    pub use crate::dialect::{DatabendDialect, IdentifierPreparer, ServerVersion};
    pub use crate::driver::{Connection, ParamStyle, Params, Row, Value};
    pub use crate::error::{DialectError, Result};
    pub use crate::expr::{
        // Constructors
        bind,
        cast,
        col,
        count,
        count_distinct,
        count_star,
        current_date,
        func,
        lit_bool,
        lit_float,
        lit_int,
        lit_null,
        lit_str,
        now,
        random,
        star,
        substring,
        table_col,
        table_star,
        typed_bind,
        // Types
        BinaryOperator,
        Expr,
        ExprExt,
        Literal,
        UnaryOperator,
    };
    pub use crate::ddl::{ClusterBy, ClusterKey, ColumnDef, Table, TableOptions};
    pub use crate::dml::{Assignments, Merge};
    pub use crate::query::{Join, JoinType, OrderByExpr, Query, SelectExpr, TableRef};
    pub use crate::reflection::Inspector;
    pub use crate::types::SqlType;
}

// Also export at crate root for convenience
pub use dialect::DatabendDialect;
pub use error::{DialectError, Result};
