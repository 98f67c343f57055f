//! Configuration.
//!
//! Handles connection configuration, environment variables, and settings.

mod connection;
mod settings;

pub use connection::{ConnectionConfig, DEFAULT_DATABASE};
pub use settings::{
    expand_env_vars, ConnectionSettings, DialectSettings, Settings, SettingsError,
};
