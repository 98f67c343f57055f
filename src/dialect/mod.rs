//! The Databend dialect.
//!
//! [`DatabendDialect`] ties the pieces together: it hands out compilers and
//! the identifier preparer, turns connection URLs into driver DSNs, detects
//! the server version once per connection, and picks catalog query
//! strategies for that version.
//!
//! # Lifecycle
//!
//! ```text
//! Unconnected ──connect()──▶ Connected ──initialize()──▶ Ready
//!                                 (SELECT VERSION(), SELECT currentDatabase())
//! ```
//!
//! Compilers work in every state. Reflection uses whatever was detected; an
//! uninitialized dialect assumes the current catalog layout and the `default`
//! database.

mod dsn;
mod preparer;
mod reserved;
mod version;

pub use dsn::{build_dsn, parse_url, DEFAULT_PORT, SCHEME};
pub use preparer::IdentifierPreparer;
pub use reserved::{is_reserved, RESERVED_WORDS};
pub use version::{
    CompatProfile, ServerVersion, TableOptionsSource, VersionWindow, ViewListing,
    VIEWS_MISSING_FROM_INFORMATION_SCHEMA, VIEWS_MISSING_FROM_SYSTEM_TABLES,
};

use tracing::{debug, info};

use crate::compiler::{CompileOptions, DdlCompiler, StatementCompiler, TypeCompiler};
use crate::config::DialectSettings;
use crate::driver::{Connection, Driver, ParamStyle};
use crate::error::{DialectError, Result};
use crate::reflection::{queries, Inspector};

/// Database used when the server has not been asked for its current one.
pub const DEFAULT_SCHEMA: &str = "default";

/// Connection lifecycle as seen by the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Unconnected,
    Connected,
    /// Version and default schema detected.
    Ready,
}

/// Static capability flags reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub supports_sane_rowcount: bool,
    pub supports_sane_multi_rowcount: bool,
    pub supports_native_boolean: bool,
    pub supports_native_decimal: bool,
    pub supports_alter: bool,
    pub supports_comments: bool,
    pub supports_empty_insert: bool,
    pub supports_is_distinct_from: bool,
    pub supports_multivalues_insert: bool,
    pub supports_statement_cache: bool,
    pub supports_server_side_cursors: bool,
    pub returns_native_bytes: bool,
    pub max_identifier_length: usize,
}

pub const CAPABILITIES: Capabilities = Capabilities {
    supports_sane_rowcount: false,
    supports_sane_multi_rowcount: false,
    supports_native_boolean: true,
    supports_native_decimal: true,
    supports_alter: true,
    supports_comments: false,
    supports_empty_insert: false,
    supports_is_distinct_from: false,
    supports_multivalues_insert: true,
    supports_statement_cache: false,
    supports_server_side_cursors: true,
    returns_native_bytes: true,
    max_identifier_length: 127,
};

/// Databend dialect state for one connection.
#[derive(Debug, Clone)]
pub struct DatabendDialect {
    state: ConnectionState,
    server_version: Option<ServerVersion>,
    default_schema: Option<String>,
    compat: CompatProfile,
    supports_cast: bool,
    param_style: ParamStyle,
    deterministic_merge: bool,
    preparer: IdentifierPreparer,
}

impl Default for DatabendDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabendDialect {
    pub const NAME: &'static str = "databend";
    pub const DRIVER: &'static str = "databend";

    pub fn new() -> Self {
        Self {
            state: ConnectionState::Unconnected,
            server_version: None,
            default_schema: None,
            compat: CompatProfile::default(),
            supports_cast: true,
            param_style: ParamStyle::default(),
            deterministic_merge: false,
            preparer: IdentifierPreparer::new(),
        }
    }

    /// Apply `[dialect]` settings from a config file.
    pub fn with_settings(mut self, settings: &DialectSettings) -> Self {
        self.supports_cast = settings.supports_cast;
        self.param_style = settings.paramstyle;
        self.deterministic_merge = settings.deterministic_merge;
        self
    }

    pub fn with_param_style(mut self, style: ParamStyle) -> Self {
        self.param_style = style;
        self
    }

    pub fn with_supports_cast(mut self, supports_cast: bool) -> Self {
        self.supports_cast = supports_cast;
        self
    }

    // =========================================================================
    // Static properties
    // =========================================================================

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn driver(&self) -> &'static str {
        Self::DRIVER
    }

    pub fn capabilities(&self) -> Capabilities {
        CAPABILITIES
    }

    pub fn supports_cast(&self) -> bool {
        self.supports_cast
    }

    pub fn param_style(&self) -> ParamStyle {
        self.param_style
    }

    /// Databend has no transactions at the DML layer this dialect targets.
    pub fn autocommit(&self) -> bool {
        false
    }

    pub fn identifier_preparer(&self) -> &IdentifierPreparer {
        &self.preparer
    }

    // =========================================================================
    // Compilers
    // =========================================================================

    pub fn statement_compiler(&self) -> StatementCompiler {
        StatementCompiler::new()
            .with_param_style(self.param_style)
            .with_supports_cast(self.supports_cast)
            .with_options(CompileOptions::default().deterministic(self.deterministic_merge))
    }

    pub fn ddl_compiler(&self) -> DdlCompiler {
        DdlCompiler::with_supports_cast(self.supports_cast)
    }

    pub fn type_compiler(&self) -> TypeCompiler {
        TypeCompiler::new()
    }

    // =========================================================================
    // Connection lifecycle
    // =========================================================================

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Turn a `databend://` URL into the DSN the driver expects.
    pub fn create_connect_args(&self, url: &str) -> Result<String> {
        build_dsn(&parse_url(url)?)
    }

    /// Open a connection through `driver`.
    pub fn connect<D: Driver>(&mut self, driver: &D, url: &str) -> Result<D::Conn> {
        let dsn = self.create_connect_args(url)?;
        let conn = driver.connect(&dsn)?;
        self.state = ConnectionState::Connected;
        debug!(dialect = Self::NAME, "connected");
        Ok(conn)
    }

    /// Detect server version and default schema, then select catalog query
    /// strategies for that version.
    pub fn initialize<C: Connection>(&mut self, mut conn: C) -> Result<()> {
        let version = Self::query_server_version(&mut conn)?;
        let default_schema = conn
            .scalar(queries::CURRENT_DATABASE)?
            .and_then(|v| v.to_text());

        self.compat = CompatProfile::for_version(Some(version));
        self.server_version = Some(version);
        self.default_schema = default_schema;
        self.state = ConnectionState::Ready;

        info!(
            version = %version,
            default_schema = self.default_schema_name(),
            compat = ?self.compat,
            "Databend dialect initialized"
        );
        Ok(())
    }

    fn query_server_version<C: Connection>(conn: &mut C) -> Result<ServerVersion> {
        let raw = conn
            .scalar(queries::VERSION)?
            .and_then(|v| v.to_text())
            .ok_or_else(|| DialectError::VersionParse(String::new()))?;
        let version = ServerVersion::parse(&raw)?;
        debug!(raw = %raw, version = %version, "server version detected");
        Ok(version)
    }

    /// No-op: there is nothing to roll back.
    pub fn do_rollback<C: Connection>(&self, _conn: &mut C) {}

    pub fn server_version(&self) -> Option<ServerVersion> {
        self.server_version
    }

    pub fn default_schema_name(&self) -> &str {
        self.default_schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    pub fn compat_profile(&self) -> CompatProfile {
        self.compat
    }

    // =========================================================================
    // Reflection
    // =========================================================================

    /// Catalog inspector over `conn`, with its own result cache.
    pub fn inspector<C: Connection>(&self, conn: C) -> Inspector<'_, C> {
        Inspector::new(self, conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, Params, Row, Value};

    struct VersionConn {
        version: &'static str,
    }

    impl Connection for VersionConn {
        fn execute(&mut self, sql: &str, _params: &Params) -> std::result::Result<Vec<Row>, DriverError> {
            let value = match sql {
                "SELECT VERSION()" => Value::from(self.version),
                "SELECT currentDatabase()" => Value::from("analytics"),
                other => return Err(DriverError::new(format!("unexpected query {}", other))),
            };
            Ok(vec![Row::new(vec![value])])
        }
    }

    #[test]
    fn test_initialize_selects_profile() {
        let mut dialect = DatabendDialect::new();
        assert_eq!(dialect.state(), ConnectionState::Unconnected);
        assert_eq!(dialect.default_schema_name(), "default");

        dialect
            .initialize(VersionConn {
                version: "8.0.26-v1.2.500-nightly-abc(rust-1.75.0-nightly-2023-12-01)",
            })
            .unwrap();
        assert_eq!(dialect.state(), ConnectionState::Ready);
        assert_eq!(dialect.server_version(), Some(ServerVersion::new(1, 2, 500)));
        assert_eq!(dialect.default_schema_name(), "analytics");
        assert_eq!(
            dialect.compat_profile().view_listing,
            ViewListing::InformationSchemaViews
        );
    }

    #[test]
    fn test_initialize_rejects_unknown_version_format() {
        let mut dialect = DatabendDialect::new();
        let err = dialect.initialize(VersionConn { version: "Databend 1.2" }).unwrap_err();
        assert!(matches!(err, DialectError::VersionParse(_)));
        assert_eq!(dialect.state(), ConnectionState::Unconnected);
    }

    #[test]
    fn test_capabilities() {
        let dialect = DatabendDialect::new();
        let caps = dialect.capabilities();
        assert_eq!(dialect.name(), "databend");
        assert_eq!(caps.max_identifier_length, 127);
        assert!(!caps.supports_sane_rowcount);
        assert!(caps.supports_multivalues_insert);
        assert!(!dialect.autocommit());
        assert_eq!(dialect.param_style(), ParamStyle::Pyformat);
    }

    #[test]
    fn test_statement_compiler_follows_dialect_settings() {
        use crate::sql::expr::{cast, col};
        use crate::types::SqlType;

        let dialect = DatabendDialect::new().with_supports_cast(false);
        let sql = dialect
            .statement_compiler()
            .compile_expr(&cast(col("x"), SqlType::Integer))
            .unwrap()
            .sql;
        assert_eq!(sql, "x");
    }
}
