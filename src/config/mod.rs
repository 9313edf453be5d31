//! Configuration module for tablesift.
//!
//! Handles the settings file, environment variables and query defaults.

mod settings;

pub use settings::{expand_env_vars, DatabaseSettings, QuerySettings, Settings, SettingsError};
