//! Server version detection and catalog compatibility windows.
//!
//! Some Databend releases shipped catalog bugs that change which tables a
//! reflection query must read. Each bug is a named [`VersionWindow`]; the
//! windows are evaluated once, after the version is detected, into a
//! [`CompatProfile`] that the reflection layer consults.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DialectError, Result};

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:.*)v(\d+).(\d+).(\d+)-([^\(]+)\(").expect("valid version regex")
});

/// Databend server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ServerVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl ServerVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse the output of `SELECT VERSION()`.
    ///
    /// The string must contain `vMAJOR.MINOR.PATCH-<build>(`; anything else
    /// means the server reports versions in a format we do not understand.
    pub fn parse(raw: &str) -> Result<Self> {
        let caps = VERSION_RE
            .captures(raw)
            .ok_or_else(|| DialectError::VersionParse(raw.to_string()))?;
        let part = |idx: usize| -> Result<u32> {
            caps.get(idx)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| DialectError::VersionParse(raw.to_string()))
        };
        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }

    pub fn as_tuple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for ServerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Half-open release range `(after, through]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionWindow {
    pub after: ServerVersion,
    pub through: ServerVersion,
}

impl VersionWindow {
    pub fn contains(&self, version: ServerVersion) -> bool {
        self.after < version && version <= self.through
    }
}

/// Releases where views were missing from `information_schema.tables`.
pub const VIEWS_MISSING_FROM_INFORMATION_SCHEMA: VersionWindow = VersionWindow {
    after: ServerVersion::new(1, 2, 410),
    through: ServerVersion::new(1, 2, 566),
};

/// Releases where views were missing from `system.tables`.
pub const VIEWS_MISSING_FROM_SYSTEM_TABLES: VersionWindow = VersionWindow {
    after: ServerVersion::new(1, 2, 410),
    through: ServerVersion::new(1, 2, 604),
};

/// Where view names are listed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewListing {
    /// `information_schema.tables` filtered by engine name.
    #[default]
    InformationSchemaTables,
    /// `information_schema.views`.
    InformationSchemaViews,
}

/// Where table options are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableOptionsSource {
    /// `system.tables` only.
    #[default]
    SystemTables,
    /// `system.tables` unioned with `system.views`.
    SystemTablesUnionViews,
}

/// Query strategies selected for one server version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompatProfile {
    pub view_listing: ViewListing,
    pub table_options: TableOptionsSource,
}

impl CompatProfile {
    /// Select strategies for `version`. Without a detected version the current
    /// catalog layout is assumed.
    pub fn for_version(version: Option<ServerVersion>) -> Self {
        let Some(version) = version else {
            return Self::default();
        };

        let view_listing = if VIEWS_MISSING_FROM_INFORMATION_SCHEMA.contains(version) {
            ViewListing::InformationSchemaViews
        } else {
            ViewListing::InformationSchemaTables
        };
        let table_options = if VIEWS_MISSING_FROM_SYSTEM_TABLES.contains(version) {
            TableOptionsSource::SystemTablesUnionViews
        } else {
            TableOptionsSource::SystemTables
        };

        Self {
            view_listing,
            table_options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nightly() {
        let v = ServerVersion::parse("Databend Query v1.2.411-nightly(rust-1.77.0-nightly)").unwrap();
        assert_eq!(v.as_tuple(), (1, 2, 411));
    }

    #[test]
    fn test_parse_with_mysql_prefix() {
        let v = ServerVersion::parse("8.0.26-v1.2.636-ab12cd(rust-1.81.0-nightly-2024-10-01)").unwrap();
        assert_eq!(v, ServerVersion::new(1, 2, 636));
    }

    #[test]
    fn test_parse_rejects_unknown_format() {
        let err = ServerVersion::parse("1.2.411").unwrap_err();
        assert_eq!(err.to_string(), "Could not determine version from string '1.2.411'");
    }

    #[test]
    fn test_window_boundaries() {
        let w = VIEWS_MISSING_FROM_INFORMATION_SCHEMA;
        assert!(!w.contains(ServerVersion::new(1, 2, 410)));
        assert!(w.contains(ServerVersion::new(1, 2, 411)));
        assert!(w.contains(ServerVersion::new(1, 2, 566)));
        assert!(!w.contains(ServerVersion::new(1, 2, 567)));
    }

    #[test]
    fn test_profiles() {
        let old = CompatProfile::for_version(Some(ServerVersion::new(1, 2, 300)));
        assert_eq!(old, CompatProfile::default());

        let buggy = CompatProfile::for_version(Some(ServerVersion::new(1, 2, 500)));
        assert_eq!(buggy.view_listing, ViewListing::InformationSchemaViews);
        assert_eq!(buggy.table_options, TableOptionsSource::SystemTablesUnionViews);

        let partial = CompatProfile::for_version(Some(ServerVersion::new(1, 2, 600)));
        assert_eq!(partial.view_listing, ViewListing::InformationSchemaTables);
        assert_eq!(partial.table_options, TableOptionsSource::SystemTablesUnionViews);

        assert_eq!(CompatProfile::for_version(None), CompatProfile::default());
    }
}
