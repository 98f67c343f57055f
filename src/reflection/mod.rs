//! Catalog reflection.
//!
//! [`Inspector`] answers schema questions (tables, views, columns, table
//! options, view definitions) by querying Databend's `information_schema`
//! and `system` catalogs. Each answer is cached per call arguments for the
//! lifetime of the inspector, since catalog metadata rarely changes within
//! one session.
//!
//! Which catalog query runs for views and table options depends on the
//! server version; the choice is made once in
//! [`CompatProfile`](crate::dialect::CompatProfile) and read here.
//!
//! # Example
//!
//! ```ignore
//! let mut dialect = DatabendDialect::new();
//! dialect.initialize(&mut conn)?;
//!
//! let mut inspector = dialect.inspector(&mut conn);
//! for name in inspector.get_table_names(None)? {
//!     let columns = inspector.get_columns(&name, None)?;
//!     println!("{}: {} columns", name, columns.len());
//! }
//! ```

mod cache;
pub mod column_type;
pub mod queries;

pub use cache::{CacheKey, ReflectionCache};
pub use column_type::{extract_nullable_string, parse_column_type};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::dialect::DatabendDialect;
use crate::driver::{Connection, Params, Row, Value};
use crate::error::{DialectError, Result};
use crate::sql::ddl::{ClusterBy, ColumnDef, Table, TableOptions};
use crate::types::SqlType;

/// Driver error code for an unknown table or view.
const UNKNOWN_TABLE_CODE: i64 = 1025;

static CLUSTER_BY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((.*)\)").expect("cluster_by pattern is valid"));

// ============================================================================
// Result types
// ============================================================================

/// One reflected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectedColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: SqlType,
    pub nullable: bool,
    /// Databend does not report column defaults through this query.
    pub default: Option<String>,
}

impl ReflectedColumn {
    pub fn to_column_def(&self) -> ColumnDef {
        let def = ColumnDef::new(&self.name, self.data_type.clone());
        if self.nullable {
            def
        } else {
            def.not_null()
        }
    }
}

/// Databend table options read back from `system.tables`.
///
/// Views reported through the `system.views` branch carry no cluster keys
/// and are never transient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReflectedTableOptions {
    pub engine: Option<String>,
    /// Cluster key list without the surrounding parentheses.
    pub cluster_by: Option<String>,
    pub is_transient: bool,
}

impl ReflectedTableOptions {
    /// Options keyed the way table metadata carries them.
    pub fn as_map(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        if let Some(engine) = &self.engine {
            map.insert("databend_engine", engine.clone());
        }
        if let Some(cluster_by) = &self.cluster_by {
            map.insert("databend_cluster_by", cluster_by.clone());
        }
        if self.is_transient {
            map.insert("databend_is_transient", "true".to_string());
        }
        map
    }

    /// Options in the form the DDL compiler consumes.
    pub fn to_table_options(&self) -> TableOptions {
        TableOptions {
            engine: self.engine.clone(),
            cluster_by: self.cluster_by.clone().map(ClusterBy::Raw),
            transient: self.is_transient,
        }
    }
}

/// Foreign key description. Databend has none, so lists are always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyInfo {
    pub name: Option<String>,
    pub constrained_columns: Vec<String>,
    pub referred_schema: Option<String>,
    pub referred_table: String,
    pub referred_columns: Vec<String>,
}

/// Index description. Databend has none, so lists are always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub column_names: Vec<String>,
    pub unique: bool,
}

// ============================================================================
// Inspector
// ============================================================================

/// Runs catalog queries over one connection.
pub struct Inspector<'d, C: Connection> {
    dialect: &'d DatabendDialect,
    conn: C,
    cache: ReflectionCache,
}

impl<'d, C: Connection> Inspector<'d, C> {
    pub fn new(dialect: &'d DatabendDialect, conn: C) -> Self {
        Self {
            dialect,
            conn,
            cache: ReflectionCache::new(),
        }
    }

    /// Drop all cached results.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Release the connection.
    pub fn into_inner(self) -> C {
        self.conn
    }

    fn schema_or_default(&self, schema: Option<&str>) -> String {
        schema
            .unwrap_or_else(|| self.dialect.default_schema_name())
            .to_string()
    }

    /// `"schema"."name"`, always quoted.
    fn full_name(&self, schema: &str, name: &str) -> String {
        self.dialect
            .identifier_preparer()
            .format_qualified_strict(Some(schema), name)
    }

    fn query(&mut self, sql: &str, params: &Params) -> Result<Vec<Row>> {
        let rendered = self.dialect.param_style().render(sql);
        debug!(sql = %rendered, params = params.len(), "catalog query");
        Ok(self.conn.execute(&rendered, params)?)
    }

    /// Escape a parameterless statement that embeds quoted identifiers.
    fn identifier_query(&self, sql: String) -> String {
        let escaped = self.dialect.param_style().escape(&sql);
        debug!(sql = %escaped, "catalog query");
        escaped
    }

    fn first_column(rows: Vec<Row>) -> Vec<String> {
        rows.iter().filter_map(|r| r.get(0).to_text()).collect()
    }

    // ------------------------------------------------------------------------
    // Schemas, tables, views
    // ------------------------------------------------------------------------

    /// All databases visible to the session.
    pub fn get_schema_names(&mut self) -> Result<Vec<String>> {
        let key = ReflectionCache::key("schemas", None, None);
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }
        let rows = self.query(queries::SHOW_DATABASES, &Params::new())?;
        let names = Self::first_column(rows);
        self.cache.set(key, &names)?;
        Ok(names)
    }

    /// Whether `schema.table` exists, checked with `EXISTS TABLE`.
    pub fn has_table(&mut self, table: &str, schema: Option<&str>) -> Result<bool> {
        let schema = self.schema_or_default(schema);
        let key = ReflectionCache::key("has_table", Some(&schema), Some(table));
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }

        let sql = self.identifier_query(queries::exists_table(&self.full_name(&schema, table)));
        let value = self.conn.scalar(&sql)?;
        let exists = matches!(
            value,
            Some(Value::Int(1)) | Some(Value::UInt(1)) | Some(Value::Bool(true))
        );
        self.cache.set(key, &exists)?;
        Ok(exists)
    }

    /// Base table names in `schema` (default schema when `None`).
    pub fn get_table_names(&mut self, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = self.schema_or_default(schema);
        let key = ReflectionCache::key("tables", Some(&schema), None);
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }
        let params = Params::new().bind("schema_name", schema.as_str());
        let rows = self.query(queries::TABLE_NAMES, &params)?;
        let names = Self::first_column(rows);
        self.cache.set(key, &names)?;
        Ok(names)
    }

    /// View names in `schema` (default schema when `None`).
    pub fn get_view_names(&mut self, schema: Option<&str>) -> Result<Vec<String>> {
        let schema = self.schema_or_default(schema);
        let key = ReflectionCache::key("views", Some(&schema), None);
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }
        let sql = queries::view_names(self.dialect.compat_profile().view_listing);
        let params = Params::new().bind("schema_name", schema.as_str());
        let rows = self.query(sql, &params)?;
        let names = Self::first_column(rows);
        self.cache.set(key, &names)?;
        Ok(names)
    }

    // ------------------------------------------------------------------------
    // Columns and options
    // ------------------------------------------------------------------------

    /// Columns of `schema.table`.
    ///
    /// An empty result is only an error when the table is confirmed absent.
    pub fn get_columns(&mut self, table: &str, schema: Option<&str>) -> Result<Vec<ReflectedColumn>> {
        let schema = self.schema_or_default(schema);
        let key = ReflectionCache::key("columns", Some(&schema), Some(table));
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }

        let params = Params::new()
            .bind("table_name", table)
            .bind("schema_name", schema.as_str());
        let rows = self.query(queries::COLUMNS, &params)?;

        let columns = rows
            .iter()
            .map(|row| {
                let name = row.get(0).to_text().unwrap_or_default();
                let raw_type = row.get(1).to_text().unwrap_or_default();
                Ok(ReflectedColumn {
                    name,
                    data_type: parse_column_type(&raw_type)?,
                    nullable: row.get(2).as_str() == Some("YES"),
                    default: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if columns.is_empty() && !self.has_table(table, Some(&schema))? {
            return Err(DialectError::NoSuchTable(table.to_string()));
        }

        self.cache.set(key, &columns)?;
        Ok(columns)
    }

    /// Engine, cluster keys and transient flag of `schema.table`.
    pub fn get_table_options(
        &mut self,
        table: &str,
        schema: Option<&str>,
    ) -> Result<ReflectedTableOptions> {
        let schema = self.schema_or_default(schema);
        let key = ReflectionCache::key("options", Some(&schema), Some(table));
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }

        let sql = queries::table_options(self.dialect.compat_profile().table_options);
        let params = Params::new()
            .bind("table_name", table)
            .bind("schema_name", schema.as_str());
        let rows = self.query(sql, &params)?;

        let full_name = self.full_name(&schema, table);
        let row = match rows.as_slice() {
            [] => return Err(DialectError::NoSuchTable(full_name)),
            [row] => row,
            _ => return Err(DialectError::MultipleRows(full_name)),
        };

        let engine = row.get(0).to_text().filter(|s| !s.is_empty());
        let cluster_by = match row.get(1).to_text().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                CLUSTER_BY_RE
                    .captures(&raw)
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_string())
                    .ok_or_else(|| {
                        DialectError::invalid_value(format!(
                            "cluster_by '{}' of {} is not parenthesised",
                            raw, full_name
                        ))
                    })?,
            ),
            None => None,
        };
        let options = ReflectedTableOptions {
            engine,
            cluster_by,
            is_transient: row.get(2).truthy(),
        };

        self.cache.set(key, &options)?;
        Ok(options)
    }

    /// `CREATE VIEW` text of `schema.view`.
    pub fn get_view_definition(&mut self, view: &str, schema: Option<&str>) -> Result<String> {
        let schema = self.schema_or_default(schema);
        let key = ReflectionCache::key("view_definition", Some(&schema), Some(view));
        if let Some(hit) = self.cache.get(&key)? {
            return Ok(hit);
        }

        let full_name = self.full_name(&schema, view);
        if !self.get_view_names(Some(&schema))?.iter().any(|v| v == view) {
            return Err(DialectError::NoSuchTable(full_name));
        }

        let sql = self.identifier_query(queries::show_create_table(&full_name));
        let rows = match self.conn.execute(&sql, &Params::new()) {
            Ok(rows) => rows,
            Err(e) if e.has_code(UNKNOWN_TABLE_CODE) => {
                return Err(DialectError::NoSuchTable(full_name))
            }
            Err(e) => return Err(e.into()),
        };

        let definition = rows
            .first()
            .and_then(|row| row.get(1).to_text())
            .ok_or_else(|| DialectError::NoSuchTable(full_name.clone()))?;
        self.cache.set(key, &definition)?;
        Ok(definition)
    }

    // ------------------------------------------------------------------------
    // Constraints and indexes
    // ------------------------------------------------------------------------

    /// Always empty: Databend has no foreign keys.
    pub fn get_foreign_keys(&mut self, _table: &str, _schema: Option<&str>) -> Result<Vec<ForeignKeyInfo>> {
        Ok(Vec::new())
    }

    /// Always empty: Databend has no primary keys.
    pub fn get_pk_constraint(&mut self, _table: &str, _schema: Option<&str>) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    /// Always empty: Databend has no indexes.
    pub fn get_indexes(&mut self, _table: &str, _schema: Option<&str>) -> Result<Vec<IndexInfo>> {
        Ok(Vec::new())
    }

    // ------------------------------------------------------------------------
    // Whole tables
    // ------------------------------------------------------------------------

    /// Rebuild a [`Table`] from its columns and options, ready for the DDL
    /// compiler.
    pub fn reflect_table(&mut self, table: &str, schema: Option<&str>) -> Result<Table> {
        let schema = self.schema_or_default(schema);
        let columns = self.get_columns(table, Some(&schema))?;
        let options = self.get_table_options(table, Some(&schema))?;

        Ok(Table::new(table)
            .schema(schema)
            .columns(columns.iter().map(ReflectedColumn::to_column_def))
            .options(options.to_table_options()))
    }
}
