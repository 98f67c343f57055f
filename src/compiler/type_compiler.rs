//! Generic type to Databend type syntax.

use crate::types::SqlType;

/// Precision and scale used when NUMERIC is declared without both.
pub const DEFAULT_NUMERIC_PRECISION: u32 = 38;
pub const DEFAULT_NUMERIC_SCALE: u32 = 10;

/// Renders [`SqlType`] as Databend column type syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeCompiler;

impl TypeCompiler {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, ty: &SqlType) -> String {
        match ty {
            SqlType::SmallInt => "SMALLINT".into(),
            SqlType::Integer => "INTEGER".into(),
            SqlType::BigInt => "BIGINT".into(),
            SqlType::Float(None) => "FLOAT".into(),
            SqlType::Float(Some(p)) => format!("FLOAT({})", p),
            SqlType::Numeric {
                precision: Some(p),
                scale: Some(s),
            } => decimal(Some(*p), Some(*s)),
            SqlType::Numeric { .. } => decimal(
                Some(DEFAULT_NUMERIC_PRECISION),
                Some(DEFAULT_NUMERIC_SCALE),
            ),
            SqlType::Decimal { precision, scale } => decimal(*precision, *scale),
            SqlType::Varchar(len) | SqlType::NVarchar(len) => with_length("VARCHAR", *len),
            SqlType::Char(len) => with_length("CHAR", *len),
            SqlType::Text => "TEXT".into(),
            SqlType::Boolean => "BOOLEAN".into(),
            SqlType::Binary(len) => with_length("BINARY", *len),
            SqlType::Json => "JSON".into(),
            SqlType::Date => "DATE".into(),
            SqlType::DateTime => "DATETIME".into(),
            SqlType::Timestamp => "TIMESTAMP".into(),
            // No time-of-day column type
            SqlType::Time => "DATETIME".into(),
            SqlType::Interval => "INTERVAL".into(),
            SqlType::Array(elem) => format!("Array({})", self.process(elem)),
            SqlType::Map(key, value) => {
                format!("Map({}, {})", self.process(key), self.process(value))
            }
        }
    }
}

fn decimal(precision: Option<u32>, scale: Option<u32>) -> String {
    match (precision, scale) {
        (None, _) => "DECIMAL".into(),
        (Some(p), None) => format!("DECIMAL({})", p),
        (Some(p), Some(s)) => format!("DECIMAL({}, {})", p, s),
    }
}

fn with_length(name: &str, len: Option<u32>) -> String {
    match len {
        Some(n) => format!("{}({})", name, n),
        None => name.into(),
    }
}
