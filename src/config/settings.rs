//! TOML-based configuration for the advisor.
//!
//! Supports a config file (cypher-advisor.toml) with environment variable
//! expansion in string values that name credentials. Write `$$` for a
//! literal `$`.
//!
//! Without a config file, read queries are PROFILEd: PROFILE executes them.
//! Set `profile = false` to collect EXPLAIN plans only.
//!
//! Example configuration:
//! ```toml
//! [neo4j]
//! uri = "http://localhost:7474"
//! user = "neo4j"
//! password = "${NEO4J_PASSWORD}"
//! database = "neo4j"
//! timeout_seconds = 30
//!
//! [analysis]
//! profile = true         # also run PROFILE after EXPLAIN (default)
//! profile_writes = false # PROFILE executes the query; keep writes out
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "CYPHER_ADVISOR_CONFIG";

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Database connection.
    pub neo4j: Neo4jSettings,

    /// Plan collection behaviour.
    pub analysis: AnalysisSettings,

    pub logging: LoggingSettings,
}

/// Neo4j connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Neo4jSettings {
    /// Server URI (supports ${ENV_VAR} expansion).
    pub uri: Option<String>,

    pub user: String,

    /// Password (supports ${ENV_VAR} expansion).
    pub password: Option<String>,

    /// Database used when a request does not name one.
    pub database: String,

    /// Per-request timeout.
    pub timeout_seconds: u64,
}

impl Default for Neo4jSettings {
    fn default() -> Self {
        Self {
            uri: None,
            user: "neo4j".to_string(),
            password: None,
            database: "neo4j".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// When PROFILE runs in addition to EXPLAIN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Run PROFILE after EXPLAIN. On by default.
    pub profile: bool,

    /// Also PROFILE queries that write. PROFILE executes the query.
    pub profile_writes: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            profile: true,
            profile_writes: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `CYPHER_ADVISOR_CONFIG`
    /// 2. `./cypher-advisor.toml`
    /// 3. `~/.config/cypher-advisor/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("cypher-advisor.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("cypher-advisor").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }
}

/// Expand variables from `lookup` in a string.
///
/// Supports `${VAR}` and `$VAR` syntax. `$$` is a literal `$`, and a `$` not
/// followed by a name is kept.
pub(crate) fn expand_with<F>(s: &str, lookup: F) -> Result<String, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.next_if_eq(&'$').is_some() {
            result.push('$');
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                var_name.push(ch);
            }
            if var_name.is_empty() {
                result.push('$');
                continue;
            }
        }

        let value = lookup(&var_name).ok_or_else(|| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
