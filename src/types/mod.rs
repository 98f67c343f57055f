//! Column types.
//!
//! Two layers:
//!
//! - [`SqlType`] - the generic, engine-neutral type attached to columns,
//!   bind parameters and CAST nodes. The [`TypeCompiler`](crate::compiler::TypeCompiler)
//!   renders it as Databend type syntax.
//! - [`DatabendType`] - the engine-specific wrapper a generic type adapts to.
//!   Wrappers own result-value parsing (catalog text to native value) and
//!   literal rendering (native value to SQL text).
//!
//! Catalog type names are resolved through the closed [`TypeTag`] mapping in
//! [`mapping`].

pub mod mapping;
mod numeric;
mod temporal;

pub use mapping::{TypeArgs, TypeTag, CATALOG_TYPE_NAMES};
pub use numeric::DatabendNumeric;
pub use temporal::{DatabendDate, DatabendDateTime, DatabendInterval, DatabendTime};

use serde::{Deserialize, Serialize};

use crate::driver::Value;
use crate::error::{DialectError, Result};

/// Generic SQL type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    SmallInt,
    Integer,
    BigInt,
    /// Binary floating point; optional precision in bits.
    Float(Option<u32>),
    /// NUMERIC with optional precision and scale.
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// DECIMAL with optional precision and scale.
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Varchar(Option<u32>),
    NVarchar(Option<u32>),
    Char(Option<u32>),
    Text,
    Boolean,
    Binary(Option<u32>),
    Json,
    Date,
    DateTime,
    Timestamp,
    /// Time of day. Databend stores it as a DATETIME anchored to a fixed date.
    Time,
    Interval,
    Array(Box<SqlType>),
    Map(Box<SqlType>, Box<SqlType>),
}

impl SqlType {
    pub fn decimal(precision: u32, scale: u32) -> Self {
        SqlType::Decimal {
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    pub fn numeric(precision: u32, scale: u32) -> Self {
        SqlType::Numeric {
            precision: Some(precision),
            scale: Some(scale),
        }
    }

    pub fn array(element: SqlType) -> Self {
        SqlType::Array(Box::new(element))
    }

    pub fn map(key: SqlType, value: SqlType) -> Self {
        SqlType::Map(Box::new(key), Box::new(value))
    }

    /// Type implied by a bound value when the caller declared none.
    ///
    /// Only values whose rendering differs from the plain form are mapped.
    pub fn infer(value: &Value) -> Option<SqlType> {
        match value {
            Value::Date(_) => Some(SqlType::Date),
            Value::DateTime(_) => Some(SqlType::DateTime),
            Value::Time(_) => Some(SqlType::Time),
            Value::Decimal(_) => Some(SqlType::Decimal {
                precision: None,
                scale: None,
            }),
            _ => None,
        }
    }
}

/// Behaviour a Databend type wrapper adds on top of its generic type.
pub trait TypeWrapper {
    /// Convert a raw driver value into the canonical native value.
    ///
    /// Strings in the engine's textual format are parsed; values that are
    /// already native pass through. Malformed strings are an error.
    fn process_result(&self, value: Value) -> Result<Value>;

    /// Render `value` as a SQL literal. `None` when the value is absent.
    fn render_literal(&self, value: &Value) -> Result<Option<String>>;

    /// Whether bind parameters of this type are wrapped in an explicit CAST.
    fn render_bind_cast(&self) -> bool {
        false
    }
}

/// The engine-specific wrapper for a column or literal type.
#[derive(Debug, Clone, PartialEq)]
pub enum DatabendType {
    Date(DatabendDate),
    DateTime(DatabendDateTime),
    Time(DatabendTime),
    Numeric(DatabendNumeric),
    Interval(DatabendInterval),
    /// Types with no Databend-specific behaviour.
    Plain(SqlType),
}

impl DatabendType {
    /// Adapt a generic type to its Databend wrapper.
    pub fn adapt(ty: &SqlType) -> Self {
        match ty {
            SqlType::Interval => DatabendType::Interval(DatabendInterval),
            SqlType::Time => DatabendType::Time(DatabendTime),
            SqlType::Date => DatabendType::Date(DatabendDate),
            SqlType::DateTime | SqlType::Timestamp => DatabendType::DateTime(DatabendDateTime),
            SqlType::Numeric { scale, .. } | SqlType::Decimal { scale, .. } => {
                DatabendType::Numeric(DatabendNumeric::new(*scale))
            }
            SqlType::Float(_) => DatabendType::Numeric(DatabendNumeric::float()),
            other => DatabendType::Plain(other.clone()),
        }
    }

    fn wrapper(&self) -> Option<&dyn TypeWrapper> {
        match self {
            DatabendType::Date(w) => Some(w),
            DatabendType::DateTime(w) => Some(w),
            DatabendType::Time(w) => Some(w),
            DatabendType::Numeric(w) => Some(w),
            DatabendType::Interval(w) => Some(w),
            DatabendType::Plain(_) => None,
        }
    }
}

impl TypeWrapper for DatabendType {
    fn process_result(&self, value: Value) -> Result<Value> {
        match self.wrapper() {
            Some(w) => w.process_result(value),
            None => Ok(value),
        }
    }

    fn render_literal(&self, value: &Value) -> Result<Option<String>> {
        match self.wrapper() {
            Some(w) => w.render_literal(value),
            None => render_plain_literal(value),
        }
    }

    fn render_bind_cast(&self) -> bool {
        self.wrapper().is_some_and(|w| w.render_bind_cast())
    }
}

/// Quote a string literal.
///
/// Databend treats backslash as an escape character, so it is doubled along
/// with single quotes.
pub fn quote_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "''"))
}

/// Literal rendering shared by every type without a wrapper override.
pub fn render_plain_literal(value: &Value) -> Result<Option<String>> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(DialectError::invalid_value(format!(
                    "cannot render non-finite float {} as a literal",
                    f
                )));
            }
            let mut buffer = ryu::Buffer::new();
            buffer.format(*f).to_string()
        }
        Value::Decimal(d) => d.to_string(),
        Value::String(s) => quote_string(s),
        Value::Bytes(b) => {
            let hex: String = b.iter().map(|byte| format!("{:02x}", byte)).collect();
            format!("X'{}'", hex)
        }
        Value::Date(d) => format!("'{}'", d.format("%Y-%m-%d")),
        Value::DateTime(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.6f")),
        Value::Time(t) => format!("'{}'", t.format("%H:%M:%S%.6f")),
    };
    Ok(Some(text))
}
