//! Databend SQL compilers.
//!
//! Three independent translators:
//!
//! - [`StatementCompiler`] - expressions, SELECT and MERGE
//! - [`DdlCompiler`] - CREATE / DROP, suppressing what Databend lacks
//! - [`TypeCompiler`] - generic types to Databend type names
//!
//! All of them are stateless between calls; formatting switches travel in
//! [`CompileOptions`].

mod ddl;
mod statement;
mod type_compiler;

pub use ddl::DdlCompiler;
pub use statement::StatementCompiler;
pub use type_compiler::{TypeCompiler, DEFAULT_NUMERIC_PRECISION, DEFAULT_NUMERIC_SCALE};

use crate::driver::Params;

/// Per-call formatting switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Inline bound values as literals instead of emitting placeholders.
    pub literal_binds: bool,
    /// Sort MERGE assignments by column name for reproducible output.
    pub deterministic: bool,
    /// Qualify column references with their table name.
    pub include_table: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            literal_binds: false,
            deterministic: false,
            include_table: true,
        }
    }
}

impl CompileOptions {
    pub fn literal_binds(mut self, on: bool) -> Self {
        self.literal_binds = on;
        self
    }

    pub fn deterministic(mut self, on: bool) -> Self {
        self.deterministic = on;
        self
    }

    pub fn include_table(mut self, on: bool) -> Self {
        self.include_table = on;
        self
    }
}

/// Rendered statement plus the parameters its placeholders refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub sql: String,
    pub params: Params,
}

impl std::fmt::Display for Compiled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.sql)
    }
}
