//! Connector configuration file support
//!
//! Handles parsing of `.dataproduct.toml` configuration files and
//! environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".dataproduct.toml";

/// Default metadata service endpoint
pub const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Default catalog web UI, used for glossary term links
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:9002";

/// Default actor recorded in audit stamps
pub const DEFAULT_AUDIT_ACTOR: &str = "urn:li:corpuser:datahub";

/// Environment variable for the metadata service endpoint
pub const ENV_SERVER: &str = "DATAHUB_GMS_URL";

/// Environment variable for the access token
pub const ENV_TOKEN: &str = "DATAHUB_GMS_TOKEN";

/// Environment variable for the web UI base url
pub const ENV_FRONTEND_URL: &str = "DATAHUB_FRONTEND_URL";

/// Environment variable for the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "DATAHUB_TIMEOUT_SECS";

/// Error type for configuration handling
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Metadata service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    #[serde(default = "default_server")]
    pub server: String,

    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            server: default_server(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Catalog web UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendSection {
    #[serde(default = "default_frontend_url")]
    pub base_url: String,
}

fn default_frontend_url() -> String {
    DEFAULT_FRONTEND_URL.to_string()
}

impl Default for FrontendSection {
    fn default() -> Self {
        Self {
            base_url: default_frontend_url(),
        }
    }
}

/// Settings applied while generating change records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionSection {
    #[serde(default = "default_audit_actor")]
    pub audit_actor: String,
}

fn default_audit_actor() -> String {
    DEFAULT_AUDIT_ACTOR.to_string()
}

impl Default for IngestionSection {
    fn default() -> Self {
        Self {
            audit_actor: default_audit_actor(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.dataproduct.toml` configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub catalog: CatalogSection,

    #[serde(default)]
    pub frontend: FrontendSection,

    #[serde(default)]
    pub ingestion: IngestionSection,
}

impl ConnectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a directory
    ///
    /// Looks for `.dataproduct.toml` in `dir`. Falls back to defaults if
    /// not found. Environment overrides are applied either way.
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let config_path = dir.join(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_file(&config_path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Load configuration from an explicit file path
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(server) = std::env::var(ENV_SERVER) {
            self.catalog.server = server;
        }

        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.catalog.token = Some(token);
        }

        if let Ok(url) = std::env::var(ENV_FRONTEND_URL) {
            self.frontend.base_url = url;
        }

        if let Ok(timeout) = std::env::var(ENV_TIMEOUT_SECS)
            && let Ok(timeout) = timeout.parse()
        {
            self.catalog.timeout_secs = timeout;
        }
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Data product connector configuration

[catalog]
# Metadata service endpoint
server = "http://localhost:8080"

# Personal access token (or set DATAHUB_GMS_TOKEN)
# token = "..."

# Request timeout in seconds
timeout_secs = 30

[frontend]
# Catalog web UI, used to build glossary term links
base_url = "http://localhost:9002"

[ingestion]
# Actor recorded in audit stamps
audit_actor = "urn:li:corpuser:datahub"
"#
}
