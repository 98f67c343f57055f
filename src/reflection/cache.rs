//! In-memory reflection result cache.
//!
//! Entries are keyed by the method name and its arguments, kept as separate
//! fields so that `("x", "a.b")` and `("x.a", "b")` never collide:
//!
//! ```text
//! (schemas, -, -)                    -> ["default", "analytics", ...]
//! (tables, schema, -)                -> ["orders", ...]
//! (columns, schema, table)           -> [ReflectedColumn, ...]
//! (options, schema, table)           -> ReflectedTableOptions
//! (view_definition, schema, view)    -> "CREATE VIEW ..."
//! ```
//!
//! Values are stored as JSON so every result type shares one map.

use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::Result;

/// Method name plus the arguments it was called with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub method: String,
    pub schema: Option<String>,
    pub name: Option<String>,
}

/// Cache of reflection results for one connection.
#[derive(Debug, Default)]
pub struct ReflectionCache {
    entries: HashMap<CacheKey, serde_json::Value>,
}

impl ReflectionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache key from a method name and its arguments.
    pub fn key(method: &str, schema: Option<&str>, name: Option<&str>) -> CacheKey {
        CacheKey {
            method: method.to_string(),
            schema: schema.map(str::to_string),
            name: name.map(str::to_string),
        }
    }

    /// Get a value from the cache.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        match self.entries.get(key) {
            Some(value) => {
                debug!(key = ?key, "reflection cache hit");
                Ok(Some(serde_json::from_value(value.clone())?))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&mut self, key: CacheKey, value: &T) -> Result<()> {
        self.entries.insert(key, serde_json::to_value(value)?);
        Ok(())
    }

    /// Delete every entry cached for `method`.
    pub fn invalidate(&mut self, method: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| k.method != method);
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
