//! Test utilities for SQL emission validation.
//!
//! Generated SELECT text is round-tripped through sqlparser's generic
//! dialect. Databend-only syntax (MERGE with `UPDATE *`, `CLUSTER BY`) is not
//! understood by sqlparser and is checked by snapshot instead.

use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// Validates that a SQL string is syntactically valid.
///
/// # Example
///
/// ```ignore
/// use crate::sql::test_utils::validate_sql;
///
/// validate_sql("SELECT * FROM orders").unwrap();
/// ```
pub fn validate_sql(sql: &str) -> Result<(), String> {
    Parser::parse_sql(&GenericDialect {}, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL: {}\nSQL: {}", e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        validate_sql("SELECT * FROM orders").unwrap();
        validate_sql("SELECT concat(a, b), rand() FROM orders LIMIT 5").unwrap();
    }

    #[test]
    fn test_validate_invalid_sql() {
        assert!(validate_sql("SELEC * FORM orders").is_err());
    }
}
