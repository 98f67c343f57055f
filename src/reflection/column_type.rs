//! Catalog column-type strings to [`SqlType`].
//!
//! `information_schema.columns.column_type` reports types such as
//! `Nullable(Decimal(18, 5))`, `VARCHAR`, `Array(Nullable(INT))` or
//! `Map(String, Int32)`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DialectError, Result};
use crate::types::mapping::{TypeArgs, TypeTag};
use crate::types::SqlType;

static NULLABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Nullable\((\w+)(?:\((.*?)\))?\)").expect("nullable pattern is valid")
});

static TYPE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\w+)\s*").expect("type name pattern is valid"));

/// Strip a `Nullable(..)` wrapper and any argument list, returning the bare
/// type name in its original case.
///
/// `Nullable(Array(INT))` gives `Array`, `Decimal(1,2)` gives `Decimal`.
/// A `Nullable` string that does not match the wrapper shape gives `""`.
pub fn extract_nullable_string(target: &str) -> String {
    if target.contains("Nullable") {
        return NULLABLE_RE
            .captures(target)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
    }
    target.split('(').next().unwrap_or(target).to_string()
}

/// Parse a catalog column type into a [`SqlType`].
///
/// Unknown type names and malformed arguments are errors; nothing falls
/// back to a default type.
pub fn parse_column_type(column_type: &str) -> Result<SqlType> {
    let inner = strip_nullable(column_type.trim());

    let caps = TYPE_NAME_RE
        .captures(inner)
        .ok_or_else(|| DialectError::UnknownType(column_type.to_string()))?;
    let whole = caps.get(0).map_or(0, |m| m.end());
    let name = caps.get(1).map_or("", |m| m.as_str());
    let tag = TypeTag::from_catalog_name(name)?;

    let rest = &inner[whole..];
    let args = match rest.strip_prefix('(') {
        Some(_) => Some(balanced_args(name, rest)?),
        None => None,
    };

    let type_args = match args {
        None => TypeArgs::None,
        Some(raw) => type_args_for(tag, name, raw)?,
    };
    tag.build(type_args)
}

/// Peel any number of `Nullable(...)` wrappers.
fn strip_nullable(mut s: &str) -> &str {
    while let Some(inner) = s
        .strip_prefix("Nullable(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        s = inner.trim();
    }
    s
}

/// Contents of the parenthesised group that opens `rest`.
fn balanced_args<'a>(name: &str, rest: &'a str) -> Result<&'a str> {
    let mut depth = 0usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&rest[1..i]);
                }
            }
            _ => {}
        }
    }
    Err(DialectError::invalid_type_args(name, rest))
}

/// Split at commas that are not nested inside parentheses.
fn split_top_level(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}

fn type_args_for(tag: TypeTag, name: &str, raw: &str) -> Result<TypeArgs> {
    let parts = split_top_level(raw);
    let int = |s: &str| -> Result<u32> {
        s.parse::<u32>()
            .map_err(|_| DialectError::invalid_type_args(name, raw))
    };

    match (tag, parts.as_slice()) {
        (TypeTag::Decimal, [precision, scale]) => {
            Ok(TypeArgs::PrecisionScale(int(precision)?, int(scale)?))
        }
        (TypeTag::Array, [element]) => Ok(TypeArgs::Element(parse_column_type(element)?)),
        (TypeTag::Map, [key, value]) => Ok(TypeArgs::KeyValue(
            parse_column_type(key)?,
            parse_column_type(value)?,
        )),
        (TypeTag::Decimal | TypeTag::Array | TypeTag::Map, _) => {
            Err(DialectError::invalid_type_args(name, raw))
        }
        (_, [single]) => Ok(TypeArgs::Length(int(single)?)),
        _ => Err(DialectError::invalid_type_args(name, raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_nullable_string() {
        assert_eq!(extract_nullable_string("Nullable(Array(INT))"), "Array");
        assert_eq!(extract_nullable_string("Nullable(Decimal(2,4))"), "Decimal");
        assert_eq!(extract_nullable_string("Decimal(1,2)"), "Decimal");
        assert_eq!(extract_nullable_string("FLOAT"), "FLOAT");
        assert_eq!(extract_nullable_string("Nullable"), "");
    }

    #[test]
    fn test_extracted_names_are_mapped() {
        for raw in ["Nullable(Array(INT))", "Decimal(1,2)", "FLOAT", "Nullable(VARCHAR)", "Map(String, Int32)"] {
            let name = extract_nullable_string(raw);
            assert!(TypeTag::from_catalog_name(&name).is_ok(), "{} -> {}", raw, name);
        }
    }

    #[test]
    fn test_simple_types() {
        assert_eq!(parse_column_type("INT").unwrap(), SqlType::Integer);
        assert_eq!(parse_column_type("int").unwrap(), SqlType::Integer);
        assert_eq!(parse_column_type("date").unwrap(), SqlType::Date);
        assert_eq!(parse_column_type("Nullable(TIMESTAMP)").unwrap(), SqlType::DateTime);
    }

    #[test]
    fn test_decimal_arguments() {
        assert_eq!(
            parse_column_type("Nullable(Decimal(2,4))").unwrap(),
            SqlType::decimal(2, 4)
        );
        assert_eq!(
            parse_column_type("DECIMAL(18, 5)").unwrap(),
            SqlType::decimal(18, 5)
        );
    }

    #[test]
    fn test_length_argument() {
        assert_eq!(
            parse_column_type("varchar(32)").unwrap(),
            SqlType::Varchar(Some(32))
        );
    }

    #[test]
    fn test_nested_types() {
        assert_eq!(
            parse_column_type("Array(Nullable(INT))").unwrap(),
            SqlType::array(SqlType::Integer)
        );
        assert_eq!(
            parse_column_type("Map(String, Array(Int64))").unwrap(),
            SqlType::map(SqlType::Varchar(None), SqlType::array(SqlType::BigInt))
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_column_type("GEOGRAPHY"),
            Err(DialectError::UnknownType(_))
        ));
        assert!(matches!(
            parse_column_type("varchar(abc)"),
            Err(DialectError::InvalidTypeArguments { .. })
        ));
        assert!(matches!(
            parse_column_type("decimal(10"),
            Err(DialectError::InvalidTypeArguments { .. })
        ));
    }
}
