//! Error types for the Databend dialect.

use thiserror::Error;

use crate::driver::DriverError;

/// Errors raised while compiling SQL or reflecting the Databend catalog.
#[derive(Error, Debug)]
pub enum DialectError {
    /// Table or view does not exist.
    #[error("No such table: {0}")]
    NoSuchTable(String),

    /// A catalog value did not match the expected textual format.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// `SELECT VERSION()` returned a string we cannot interpret.
    #[error("Could not determine version from string '{0}'")]
    VersionParse(String),

    /// Column type name with no entry in the type mapping.
    #[error("Unknown column type: {0}")]
    UnknownType(String),

    /// Column type arguments could not be parsed.
    #[error("Invalid arguments for type {type_name}: ({args})")]
    InvalidTypeArguments { type_name: String, args: String },

    /// A cluster key references a column the table does not have.
    #[error("Table {table} has no column {column}")]
    UnknownColumn { table: String, column: String },

    /// A statement tree cannot be rendered (e.g. MERGE source without FROM).
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// A single-row catalog query returned more than one row.
    #[error("Multiple rows returned for {0}")]
    MultipleRows(String),

    /// Connection URL could not be parsed.
    #[error("Invalid connection URL: {0}")]
    InvalidUrl(String),

    /// Configuration error (missing env var, bad TOML, unknown connection).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reflection cache entry could not be (de)serialized.
    #[error("Reflection cache error: {0}")]
    Cache(#[from] serde_json::Error),

    /// Error surfaced by the underlying driver, passed through unchanged.
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl DialectError {
    /// Create an InvalidValue error.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        DialectError::InvalidValue(message.into())
    }

    /// Create an InvalidTypeArguments error.
    pub fn invalid_type_args(type_name: impl Into<String>, args: impl Into<String>) -> Self {
        DialectError::InvalidTypeArguments {
            type_name: type_name.into(),
            args: args.into(),
        }
    }

    /// Whether this is a not-found error for a table or view.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DialectError::NoSuchTable(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DialectError>;
