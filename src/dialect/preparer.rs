//! Identifier quoting.
//!
//! Identifiers are emitted bare when they are safe and double-quoted
//! otherwise. An identifier needs quotes when it collides with a Databend
//! keyword, starts with a digit or `$`, contains characters outside
//! `[A-Za-z0-9_$]`, or carries upper-case letters (Databend folds unquoted
//! identifiers to lower case).

use super::reserved::is_reserved;

const QUOTE: char = '"';

/// Decides when identifiers must be quoted and quotes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentifierPreparer;

impl IdentifierPreparer {
    pub fn new() -> Self {
        Self
    }

    /// Quote `ident` only if it requires quoting.
    pub fn quote(&self, ident: &str) -> String {
        if self.requires_quotes(ident) {
            self.quote_identifier(ident)
        } else {
            ident.to_string()
        }
    }

    /// Always quote `ident`, doubling embedded quote characters.
    pub fn quote_identifier(&self, ident: &str) -> String {
        let escaped = ident.replace(QUOTE, "\"\"");
        format!("{QUOTE}{escaped}{QUOTE}")
    }

    /// Whether `ident` must be quoted to survive the round trip.
    pub fn requires_quotes(&self, ident: &str) -> bool {
        let Some(first) = ident.chars().next() else {
            return true;
        };
        let lower = ident.to_lowercase();
        is_reserved(&lower)
            || first.is_ascii_digit()
            || first == '$'
            || !ident
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            || lower != ident
    }

    /// `schema.name`, each part quoted as needed.
    pub fn format_qualified(&self, schema: Option<&str>, name: &str) -> String {
        match schema {
            Some(s) => format!("{}.{}", self.quote(s), self.quote(name)),
            None => self.quote(name),
        }
    }

    /// `"schema"."name"`, both parts always quoted. Used for catalog lookups.
    pub fn format_qualified_strict(&self, schema: Option<&str>, name: &str) -> String {
        match schema {
            Some(s) => format!("{}.{}", self.quote_identifier(s), self.quote_identifier(name)),
            None => self.quote_identifier(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifier_unquoted() {
        let p = IdentifierPreparer::new();
        assert_eq!(p.quote("customer_id"), "customer_id");
        assert_eq!(p.quote("t1"), "t1");
    }

    #[test]
    fn test_reserved_word_quoted() {
        let p = IdentifierPreparer::new();
        assert_eq!(p.quote("select"), "\"select\"");
        assert_eq!(p.quote("cluster"), "\"cluster\"");
        assert_eq!(p.quote("table"), "\"table\"");
    }

    #[test]
    fn test_case_and_characters() {
        let p = IdentifierPreparer::new();
        assert_eq!(p.quote("MyTable"), "\"MyTable\"");
        assert_eq!(p.quote("1col"), "\"1col\"");
        assert_eq!(p.quote("my col"), "\"my col\"");
        assert_eq!(p.quote(""), "\"\"");
    }

    #[test]
    fn test_quote_identifier_escapes() {
        let p = IdentifierPreparer::new();
        assert_eq!(p.quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_qualified() {
        let p = IdentifierPreparer::new();
        assert_eq!(p.format_qualified(Some("analytics"), "events"), "analytics.events");
        assert_eq!(
            p.format_qualified_strict(Some("analytics"), "events"),
            "\"analytics\".\"events\""
        );
    }
}
