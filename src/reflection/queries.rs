//! Catalog query text.
//!
//! Queries are written with `:name` placeholders and rendered for the
//! dialect's paramstyle just before execution.

use crate::dialect::{TableOptionsSource, ViewListing};

pub const VERSION: &str = "SELECT VERSION()";

pub const CURRENT_DATABASE: &str = "SELECT currentDatabase()";

pub const SHOW_DATABASES: &str = "SHOW DATABASES";

pub const COLUMNS: &str = "select column_name, column_type, is_nullable \
from information_schema.columns \
where table_name = :table_name \
and table_schema = :schema_name";

pub const TABLE_NAMES: &str = "select table_name \
from information_schema.tables \
where table_schema = :schema_name \
and engine NOT LIKE '%VIEW%'";

const VIEW_NAMES_FROM_TABLES: &str = "select table_name \
from information_schema.tables \
where table_schema = :schema_name \
and engine LIKE '%VIEW%'";

const VIEW_NAMES_FROM_VIEWS: &str = "select table_name \
from information_schema.views \
where table_schema = :schema_name";

const TABLE_OPTIONS: &str = "SELECT engine_full, cluster_by, is_transient \
FROM system.tables \
WHERE database = :schema_name \
and name = :table_name";

const TABLE_OPTIONS_WITH_VIEWS: &str = "SELECT engine_full, cluster_by, is_transient \
FROM system.tables \
WHERE database = :schema_name \
and name = :table_name \
UNION \
SELECT engine_full, NULL as cluster_by, NULL as is_transient \
FROM system.views \
WHERE database = :schema_name \
and name = :table_name";

pub fn view_names(listing: ViewListing) -> &'static str {
    match listing {
        ViewListing::InformationSchemaTables => VIEW_NAMES_FROM_TABLES,
        ViewListing::InformationSchemaViews => VIEW_NAMES_FROM_VIEWS,
    }
}

pub fn table_options(source: TableOptionsSource) -> &'static str {
    match source {
        TableOptionsSource::SystemTables => TABLE_OPTIONS,
        TableOptionsSource::SystemTablesUnionViews => TABLE_OPTIONS_WITH_VIEWS,
    }
}

/// `EXISTS TABLE "schema"."table"`.
pub fn exists_table(qualified: &str) -> String {
    format!("EXISTS TABLE {}", qualified)
}

/// `SHOW CREATE TABLE "schema"."view"`.
pub fn show_create_table(qualified: &str) -> String {
    format!("SHOW CREATE TABLE {}", qualified)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_listing_variants() {
        assert!(view_names(ViewListing::InformationSchemaTables).contains("engine LIKE '%VIEW%'"));
        assert!(view_names(ViewListing::InformationSchemaViews).contains("information_schema.views"));
    }

    #[test]
    fn test_table_options_union() {
        assert!(!table_options(TableOptionsSource::SystemTables).contains("UNION"));
        assert!(table_options(TableOptionsSource::SystemTablesUnionViews)
            .contains("UNION SELECT engine_full, NULL as cluster_by"));
    }
}
