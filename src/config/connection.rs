//! Neo4j connection configuration.
//!
//! Resolved from the `[neo4j]` settings section, then overridden by
//! environment variables:
//! - `NEO4J_URI`: Server URI (`http(s)://`, or `bolt`/`neo4j` schemes which
//!   are mapped onto the HTTP port)
//! - `NEO4J_USER`: Username (default `neo4j`)
//! - `NEO4J_PASSWORD`: Password
//! - `NEO4J_DATABASE`: Default database (default `neo4j`)

use std::env;
use std::time::Duration;

use super::settings::{expand_with, Neo4jSettings, SettingsError};

const HTTP_PORT: u16 = 7474;
const HTTPS_PORT: u16 = 7473;

/// Error type for connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Missing required setting: {0} (set it in [neo4j] or the environment)")]
    Missing(&'static str),

    #[error("Unsupported URI scheme: {0}. Supported: http, https, bolt, neo4j")]
    UnsupportedScheme(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Resolved connection to a Neo4j server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Base URL of the HTTP API, without a trailing slash.
    pub base_url: String,
    pub user: String,
    pub password: String,
    /// Database used when a request does not name one.
    pub database: String,
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Connection from environment variables only.
    ///
    /// Requires `NEO4J_URI` and `NEO4J_PASSWORD`.
    pub fn from_env() -> Result<Self, ConnectionError> {
        Self::resolve(&Neo4jSettings::default())
    }

    /// Connection from settings, with `NEO4J_*` variables taking precedence.
    pub fn resolve(settings: &Neo4jSettings) -> Result<Self, ConnectionError> {
        Self::resolve_with(settings, |name| env::var(name).ok())
    }

    pub(crate) fn resolve_with<F>(settings: &Neo4jSettings, lookup: F) -> Result<Self, ConnectionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let expand = |value: &str| expand_with(value, &lookup);

        let uri = match lookup("NEO4J_URI") {
            Some(uri) => uri,
            None => expand(settings.uri.as_deref().ok_or(ConnectionError::Missing("NEO4J_URI"))?)?,
        };

        let password = match lookup("NEO4J_PASSWORD") {
            Some(password) => password,
            None => expand(
                settings
                    .password
                    .as_deref()
                    .ok_or(ConnectionError::Missing("NEO4J_PASSWORD"))?,
            )?,
        };

        let user = lookup("NEO4J_USER").unwrap_or_else(|| settings.user.clone());
        let database = lookup("NEO4J_DATABASE").unwrap_or_else(|| settings.database.clone());

        if database.is_empty() {
            return Err(ConnectionError::InvalidConfig("database name is empty".to_string()));
        }

        Ok(Self {
            base_url: http_base_url(&uri)?,
            user,
            password,
            database,
            timeout: Duration::from_secs(settings.timeout_seconds),
        })
    }

    /// Transactional commit endpoint for a database.
    pub fn commit_url(&self, database: Option<&str>) -> String {
        format!(
            "{}/db/{}/tx/commit",
            self.base_url,
            database.unwrap_or(&self.database)
        )
    }
}

/// Map a Neo4j URI onto the base URL of its HTTP API.
///
/// Bolt-style schemes keep the host and move to the default HTTP(S) port.
pub fn http_base_url(uri: &str) -> Result<String, ConnectionError> {
    let (scheme, rest) = uri
        .trim()
        .split_once("://")
        .ok_or_else(|| ConnectionError::InvalidConfig(format!("not a URI: {uri}")))?;

    let authority = rest.split('/').next().unwrap_or_default();
    if authority.is_empty() {
        return Err(ConnectionError::InvalidConfig(format!("no host in URI: {uri}")));
    }

    match scheme.to_lowercase().as_str() {
        "http" | "https" => Ok(format!("{}://{}", scheme.to_lowercase(), authority)),
        "bolt" | "neo4j" => Ok(format!("http://{}:{}", host_of(authority), HTTP_PORT)),
        "bolt+s" | "bolt+ssc" | "neo4j+s" | "neo4j+ssc" => {
            Ok(format!("https://{}:{}", host_of(authority), HTTPS_PORT))
        }
        other => Err(ConnectionError::UnsupportedScheme(other.to_string())),
    }
}

/// Host part of `host[:port]`, keeping bracketed IPv6 literals intact.
fn host_of(authority: &str) -> &str {
    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }
    authority.split(':').next().unwrap_or(authority)
}
