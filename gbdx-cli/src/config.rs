use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use gbdx_client::config::DEFAULT_CONFIG_FILE;
use gbdx_client::GbdxConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub gbdx: GbdxConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            gbdx: GbdxConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Client settings come from a `[gbdx]` section, or from the top level
    /// of the document when that section is absent.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut config: AppConfig = toml::from_str(content)?;
        if !table.contains_key("gbdx") {
            config.gbdx = GbdxConfig::from_toml(content)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = AppConfig::from_toml(
            r#"
log_level = "debug"
log_dir = "/tmp/gbdx-logs"

[gbdx]
user_name = "alice"
user_password = "pw"
api_key = "id:secret"
query_cache_secs = 60
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_dir, PathBuf::from("/tmp/gbdx-logs"));
        assert_eq!(config.gbdx.query_cache_secs, 60);
        assert_eq!(config.gbdx.user_credentials().unwrap(), ("alice", "pw"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.gbdx.base_url, gbdx_client::GBDX_BASE_URL);
    }

    #[test]
    fn test_flat_client_config() {
        let config = AppConfig::from_toml(
            r#"
log_level = "warn"
user_name = "alice"
user_password = "pw"
api_key = "id:secret"
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.gbdx.user_credentials().unwrap(), ("alice", "pw"));
        assert_eq!(
            config.gbdx.credentials().unwrap(),
            ("id".to_string(), "secret".to_string())
        );
    }

    #[test]
    fn test_missing_file() {
        assert!(AppConfig::from_file("/nonexistent/gbdx.toml").is_err());
    }
}
