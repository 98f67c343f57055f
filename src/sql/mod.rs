//! SQL building blocks.
//!
//! This module provides the strongly-typed trees the Databend compilers
//! render:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`ddl`] - Table metadata and CREATE / DROP statements
//! - [`dml`] - MERGE statement tree
//! - [`token`] - Token types for SQL generation

pub mod ddl;
pub mod dml;
pub mod expr;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use expr::{
    bind, cast, col, count, count_distinct, count_star, current_date, func, lit_bool, lit_float,
    lit_int, lit_null, lit_str, now, random, raw_sql, star, substring, table_col, table_star,
    typed_bind, BinaryOperator, Expr, ExprExt, Func, Literal, UnaryOperator,
};
pub use query::{
    Distinct, Join, JoinType, LimitOffset, NullsOrder, OrderByExpr, Query, SelectExpr, SortDir,
    TableRef,
};
pub use token::{Token, TokenStream};

// Re-export DDL types
pub use ddl::{
    ClusterBy, ClusterKey, ColumnDef, CreateIndex, CreateSchema, DdlStatement, DropIndex,
    DropSchema, DropTable, Table, TableConstraint, TableOptions,
};

// Re-export DML types
pub use dml::{Assignments, Merge, MergeSource, WhenClause};
