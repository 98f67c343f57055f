//! Catalog type-name mapping.
//!
//! Databend reports column types by name (`Int32`, `Nullable(String)`,
//! `Decimal(18, 5)`, ...). After the parser strips wrappers and arguments,
//! the bare lower-cased name is resolved here to a [`TypeTag`], and the tag
//! builds the [`SqlType`] from the parsed arguments.

use std::fmt;

use crate::error::{DialectError, Result};

use super::SqlType;

/// Canonical type families a catalog name can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    BigInt,
    Integer,
    SmallInt,
    Numeric,
    Decimal,
    Date,
    DateTime,
    Float,
    Varchar,
    Array,
    Map,
    Json,
    Boolean,
    Binary,
    Time,
    Interval,
}

/// Every catalog type name the reflection layer can observe.
pub const CATALOG_TYPE_NAMES: &[(&str, TypeTag)] = &[
    ("bigint", TypeTag::BigInt),
    ("int", TypeTag::Integer),
    ("smallint", TypeTag::SmallInt),
    ("tinyint", TypeTag::SmallInt),
    ("int64", TypeTag::BigInt),
    ("int32", TypeTag::Integer),
    ("int16", TypeTag::SmallInt),
    ("int8", TypeTag::SmallInt),
    ("uint64", TypeTag::BigInt),
    ("uint32", TypeTag::Integer),
    ("uint16", TypeTag::SmallInt),
    ("uint8", TypeTag::SmallInt),
    ("numeric", TypeTag::Numeric),
    ("decimal", TypeTag::Decimal),
    ("date", TypeTag::Date),
    ("datetime", TypeTag::DateTime),
    ("timestamp", TypeTag::DateTime),
    ("float", TypeTag::Float),
    ("double", TypeTag::Float),
    ("float64", TypeTag::Float),
    ("float32", TypeTag::Float),
    ("string", TypeTag::Varchar),
    ("array", TypeTag::Array),
    ("map", TypeTag::Map),
    ("json", TypeTag::Json),
    ("variant", TypeTag::Json),
    ("varchar", TypeTag::Varchar),
    ("boolean", TypeTag::Boolean),
    ("binary", TypeTag::Binary),
    ("time", TypeTag::Time),
    ("interval", TypeTag::Interval),
];

/// Arguments parsed from a catalog type string.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeArgs {
    None,
    /// Single integer, e.g. `varchar(32)`.
    Length(u32),
    /// `decimal(p, s)`.
    PrecisionScale(u32, u32),
    /// `Array(T)`.
    Element(SqlType),
    /// `Map(K, V)`.
    KeyValue(SqlType, SqlType),
}

impl fmt::Display for TypeArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgs::None => Ok(()),
            TypeArgs::Length(n) => write!(f, "{}", n),
            TypeArgs::PrecisionScale(p, s) => write!(f, "{}, {}", p, s),
            TypeArgs::Element(t) => write!(f, "{:?}", t),
            TypeArgs::KeyValue(k, v) => write!(f, "{:?}, {:?}", k, v),
        }
    }
}

impl TypeTag {
    /// Resolve a bare catalog type name, case-insensitively.
    pub fn from_catalog_name(name: &str) -> Result<TypeTag> {
        let lower = name.to_lowercase();
        CATALOG_TYPE_NAMES
            .iter()
            .find(|(n, _)| *n == lower)
            .map(|(_, tag)| *tag)
            .ok_or_else(|| DialectError::UnknownType(name.to_string()))
    }

    /// Build the generic type for this tag.
    ///
    /// Argument shapes a type cannot take are rejected rather than dropped.
    pub fn build(self, args: TypeArgs) -> Result<SqlType> {
        let ty = match (self, args) {
            (TypeTag::BigInt, TypeArgs::None) => SqlType::BigInt,
            (TypeTag::Integer, TypeArgs::None) => SqlType::Integer,
            (TypeTag::SmallInt, TypeArgs::None) => SqlType::SmallInt,
            (TypeTag::Numeric, TypeArgs::None) => SqlType::Numeric {
                precision: None,
                scale: None,
            },
            (TypeTag::Numeric, TypeArgs::Length(p)) => SqlType::Numeric {
                precision: Some(p),
                scale: None,
            },
            (TypeTag::Numeric, TypeArgs::PrecisionScale(p, s)) => SqlType::numeric(p, s),
            (TypeTag::Decimal, TypeArgs::None) => SqlType::Decimal {
                precision: None,
                scale: None,
            },
            (TypeTag::Decimal, TypeArgs::Length(p)) => SqlType::Decimal {
                precision: Some(p),
                scale: None,
            },
            (TypeTag::Decimal, TypeArgs::PrecisionScale(p, s)) => SqlType::decimal(p, s),
            (TypeTag::Date, TypeArgs::None) => SqlType::Date,
            (TypeTag::DateTime, TypeArgs::None) => SqlType::DateTime,
            (TypeTag::Float, TypeArgs::None) => SqlType::Float(None),
            (TypeTag::Float, TypeArgs::Length(n)) => SqlType::Float(Some(n)),
            (TypeTag::Varchar, TypeArgs::None) => SqlType::Varchar(None),
            (TypeTag::Varchar, TypeArgs::Length(n)) => SqlType::Varchar(Some(n)),
            (TypeTag::Array, TypeArgs::Element(t)) => SqlType::array(t),
            (TypeTag::Map, TypeArgs::KeyValue(k, v)) => SqlType::map(k, v),
            (TypeTag::Json, TypeArgs::None) => SqlType::Json,
            (TypeTag::Boolean, TypeArgs::None) => SqlType::Boolean,
            (TypeTag::Binary, TypeArgs::None) => SqlType::Binary(None),
            (TypeTag::Binary, TypeArgs::Length(n)) => SqlType::Binary(Some(n)),
            (TypeTag::Time, TypeArgs::None) => SqlType::Time,
            (TypeTag::Interval, TypeArgs::None) => SqlType::Interval,
            (tag, args) => {
                return Err(DialectError::invalid_type_args(
                    tag.to_string(),
                    args.to_string(),
                ))
            }
        };
        Ok(ty)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::BigInt => "BIGINT",
            TypeTag::Integer => "INTEGER",
            TypeTag::SmallInt => "SMALLINT",
            TypeTag::Numeric => "NUMERIC",
            TypeTag::Decimal => "DECIMAL",
            TypeTag::Date => "DATE",
            TypeTag::DateTime => "DATETIME",
            TypeTag::Float => "FLOAT",
            TypeTag::Varchar => "VARCHAR",
            TypeTag::Array => "ARRAY",
            TypeTag::Map => "MAP",
            TypeTag::Json => "JSON",
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::Binary => "BINARY",
            TypeTag::Time => "TIME",
            TypeTag::Interval => "INTERVAL",
        };
        write!(f, "{}", name)
    }
}
