//! Configuration module for the advisor.
//!
//! Handles the settings file, environment variables and the resolved
//! Neo4j connection.

mod connection;
mod settings;

pub use connection::{http_base_url, ConnectionConfig, ConnectionError};
pub use settings::{
    AnalysisSettings, LoggingSettings, Neo4jSettings, Settings, SettingsError,
    CONFIG_ENV_VAR,
};
