//! Driver contract consumed by the dialect.
//!
//! The wire-level connector lives outside this crate. The dialect only needs
//! a blocking execute/scalar surface and the value types rows are made of.
//!
//! ```text
//! ┌──────────────────────┐   connect(dsn)   ┌──────────────────────┐
//! │   DatabendDialect    │ ───────────────▶ │  Driver (external)   │
//! │  (compile, reflect)  │                  └──────────┬───────────┘
//! └──────────┬───────────┘                             │
//!            │ execute(sql, params) / scalar(sql)      ▼
//!            └───────────────────────────────▶  Connection
//! ```

mod value;

pub use value::Value;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error reported by the driver.
///
/// `code` is the server error code when the driver exposes one; `message`
/// is the raw text, which for Databend also embeds the code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    pub code: Option<i64>,
    pub message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: i64, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Whether the error carries the given server code, either structurally
    /// or embedded in the message text.
    pub fn has_code(&self, code: i64) -> bool {
        self.code == Some(code) || self.message.contains(&code.to_string())
    }
}

/// One result row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(pub Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Column value by position; `Value::Null` when out of range.
    pub fn get(&self, idx: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.0.get(idx).unwrap_or(&NULL)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V: Into<Value>> FromIterator<V> for Row {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Row(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered named parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, replacing an existing one with the same name.
    pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// In-place form of [`bind`](Self::bind).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Placeholder syntax expected by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamStyle {
    /// `%(name)s`
    #[default]
    Pyformat,
    /// `:name`
    Named,
}

impl ParamStyle {
    /// Rewrite `:name` markers in `sql` for this style.
    ///
    /// `::` casts are left alone. Under `pyformat`, literal `%` is doubled
    /// so the driver's interpolation leaves it intact.
    pub fn render(&self, sql: &str) -> String {
        if *self == ParamStyle::Named {
            return sql.to_string();
        }

        let chars: Vec<char> = sql.chars().collect();
        let mut out = String::with_capacity(sql.len() + 16);
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                '%' => out.push_str("%%"),
                ':' if chars.get(i + 1) == Some(&':') => {
                    out.push_str("::");
                    i += 1;
                }
                ':' if chars
                    .get(i + 1)
                    .is_some_and(|n| n.is_ascii_alphabetic() || *n == '_') =>
                {
                    let start = i + 1;
                    let mut end = start;
                    while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_')
                    {
                        end += 1;
                    }
                    let name: String = chars[start..end].iter().collect();
                    out.push_str(&self.placeholder(&name));
                    i = end;
                    continue;
                }
                _ => out.push(c),
            }
            i += 1;
        }
        out
    }

    /// Escape literal `%` for this style, leaving `:` untouched.
    ///
    /// Used for statements that embed quoted identifiers and carry no
    /// parameters, where a `:` inside a name must not become a placeholder.
    pub fn escape(&self, sql: &str) -> String {
        match self {
            ParamStyle::Pyformat => sql.replace('%', "%%"),
            ParamStyle::Named => sql.to_string(),
        }
    }

    /// Placeholder text for one parameter.
    pub fn placeholder(&self, name: &str) -> String {
        match self {
            ParamStyle::Pyformat => format!("%({})s", name),
            ParamStyle::Named => format!(":{}", name),
        }
    }
}

impl fmt::Display for ParamStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamStyle::Pyformat => write!(f, "pyformat"),
            ParamStyle::Named => write!(f, "named"),
        }
    }
}

/// A live connection to Databend.
///
/// All calls block until the server responds. The dialect never retries.
pub trait Connection {
    /// Execute `sql` with `params`, returning all rows.
    fn execute(&mut self, sql: &str, params: &Params) -> Result<Vec<Row>, DriverError>;

    /// Execute `sql` and return the first column of the first row.
    fn scalar(&mut self, sql: &str) -> Result<Option<Value>, DriverError> {
        let rows = self.execute(sql, &Params::new())?;
        Ok(rows.into_iter().next().and_then(|r| r.0.into_iter().next()))
    }
}

/// Factory for connections.
pub trait Driver {
    type Conn: Connection;

    fn connect(&self, dsn: &str) -> Result<Self::Conn, DriverError>;
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn execute(&mut self, sql: &str, params: &Params) -> Result<Vec<Row>, DriverError> {
        (**self).execute(sql, params)
    }

    fn scalar(&mut self, sql: &str) -> Result<Option<Value>, DriverError> {
        (**self).scalar(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyformat_placeholders() {
        let sql = "select x from t where a = :schema_name and b = :table_name";
        assert_eq!(
            ParamStyle::Pyformat.render(sql),
            "select x from t where a = %(schema_name)s and b = %(table_name)s"
        );
    }

    #[test]
    fn test_escape_keeps_colons() {
        let sql = r#"EXISTS TABLE "s"."a:b%""#;
        assert_eq!(
            ParamStyle::Pyformat.escape(sql),
            r#"EXISTS TABLE "s"."a:b%%""#
        );
        assert_eq!(ParamStyle::Named.escape(sql), sql);
    }

    #[test]
    fn test_pyformat_doubles_percent() {
        let sql = "where engine LIKE '%VIEW%' and s = :schema_name";
        assert_eq!(
            ParamStyle::Pyformat.render(sql),
            "where engine LIKE '%%VIEW%%' and s = %(schema_name)s"
        );
    }

    #[test]
    fn test_double_colon_untouched() {
        assert_eq!(ParamStyle::Pyformat.render("select 1::int"), "select 1::int");
    }

    #[test]
    fn test_named_is_passthrough() {
        let sql = "where engine LIKE '%VIEW%' and s = :schema_name";
        assert_eq!(ParamStyle::Named.render(sql), sql);
    }

    #[test]
    fn test_params_bind_replaces() {
        let params = Params::new().bind("a", 1i64).bind("b", "x").bind("a", 2i64);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_driver_error_code_in_message() {
        let err = DriverError::new("QueryErrors{code: 1025, message: Unknown table 'v'}");
        assert!(err.has_code(1025));
        assert!(!err.has_code(1006));
        assert!(DriverError::with_code(1025, "unknown").has_code(1025));
    }

    #[test]
    fn test_row_get_out_of_range() {
        let row: Row = vec!["a"].into_iter().collect();
        assert_eq!(row.get(0), &Value::String("a".into()));
        assert_eq!(row.get(5), &Value::Null);
    }
}
