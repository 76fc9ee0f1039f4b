//! Wanderfeed configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main Wanderfeed configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Location server configuration
    pub server: ServerConfig,

    /// Location dataset configuration
    pub dataset: DatasetConfig,

    /// Locations client configuration
    pub client: ClientConfig,

    /// Assistant configuration
    pub assistant: AssistantConfig,
}

/// Location server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty allows any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
        }
    }
}

/// Location dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// CSV file holding the location records
    pub path: PathBuf,

    /// Directory holding one image folder per location
    pub images_dir: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/locations.csv"),
            images_dir: PathBuf::from("data/images"),
        }
    }
}

/// Locations client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the locations API
    pub api_base_url: String,

    /// Base URL prefixed to relative image paths
    pub image_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            image_base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// Assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Simulated delay before the assistant reply is delivered
    pub reply_delay_ms: u64,

    /// Maximum locations returned by the conversation endpoint
    pub top_k: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: 1000,
            top_k: 5,
        }
    }
}

impl AssistantConfig {
    pub fn reply_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reply_delay_ms)
    }
}

impl FeedConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: FeedConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default config file location (`<config dir>/wanderfeed/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|d| d.join("wanderfeed").join("config.toml"))
    }

    /// Check invariants that serde defaults cannot express
    pub fn validate(&self) -> Result<()> {
        if self.client.api_base_url.trim().is_empty() {
            return Err(Error::Config("client.api_base_url must not be empty".to_string()));
        }
        if self.client.image_base_url.trim().is_empty() {
            return Err(Error::Config(
                "client.image_base_url must not be empty".to_string(),
            ));
        }
        if self.assistant.top_k == 0 {
            return Err(Error::Config("assistant.top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.client.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.assistant.reply_delay_ms, 1000);
        assert_eq!(config.assistant.top_k, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: FeedConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [assistant]
            reply_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.assistant.reply_delay_ms, 250);
        assert_eq!(config.assistant.top_k, 5);
        assert_eq!(config.dataset.images_dir, PathBuf::from("data/images"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[client]\napi_base_url = \"http://feed.test/api\"\nimage_base_url = \"http://feed.test\""
        )
        .unwrap();

        let config = FeedConfig::load(file.path()).unwrap();
        assert_eq!(config.client.api_base_url, "http://feed.test/api");
        assert_eq!(config.client.image_base_url, "http://feed.test");
    }

    #[test]
    fn test_load_missing_file() {
        let err = FeedConfig::load("/nonexistent/wanderfeed.toml").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let mut config = FeedConfig::default();
        config.assistant.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml = toml::to_string_pretty(&FeedConfig::default()).unwrap();
        assert!(toml.contains("[server]"));
        let parsed: FeedConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.server.port, 5000);
    }
}
