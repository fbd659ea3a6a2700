use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    GBDX_AUTH_URL, GBDX_BASE_URL, QUERY_CACHE_DURATION_SECS, REQUEST_TIMEOUT_SECS,
};
use crate::error::{GbdxError, Result};

pub const DEFAULT_CONFIG_FILE: &str = ".gbdx-config.toml";

/// Connection and credential settings for a GBDX account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GbdxConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default)]
    pub user_name: Option<String>,

    #[serde(default)]
    pub user_password: Option<String>,

    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    /// `client_id:client_secret` in one value, used when the pair is absent.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_query_cache_secs")]
    pub query_cache_secs: u64,
}

fn default_base_url() -> String {
    GBDX_BASE_URL.to_string()
}

fn default_auth_url() -> String {
    GBDX_AUTH_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    REQUEST_TIMEOUT_SECS
}

fn default_query_cache_secs() -> u64 {
    QUERY_CACHE_DURATION_SECS
}

impl Default for GbdxConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_url: default_auth_url(),
            user_name: None,
            user_password: None,
            client_id: None,
            client_secret: None,
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
            query_cache_secs: default_query_cache_secs(),
        }
    }
}

impl GbdxConfig {
    /// `~/.gbdx-config.toml`, if a home directory can be resolved.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_CONFIG_FILE))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parses either a bare table or a document with a `[gbdx]` section.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(content).map_err(|e| GbdxError::Config(e.to_string()))?;
        let section = match table.get("gbdx").cloned() {
            Some(section) => section,
            None => toml::Value::Table(table),
        };
        section
            .try_into::<GbdxConfig>()
            .map_err(|e| GbdxError::Config(e.to_string()))
    }

    /// Resolves the OAuth2 client credentials.
    pub fn credentials(&self) -> Result<(String, String)> {
        match (&self.client_id, &self.client_secret, &self.api_key) {
            (Some(id), Some(secret), _) => Ok((id.clone(), secret.clone())),
            (_, _, Some(api_key)) => unpack_api_key(api_key),
            _ => Err(GbdxError::Config(
                "either client_id/client_secret or api_key must be set".to_string(),
            )),
        }
    }

    pub fn user_credentials(&self) -> Result<(&str, &str)> {
        match (&self.user_name, &self.user_password) {
            (Some(user), Some(password)) => Ok((user, password)),
            _ => Err(GbdxError::Config(
                "user_name and user_password must be set".to_string(),
            )),
        }
    }
}

/// Splits an api key on its first `:`; the secret may itself contain `:`.
pub fn unpack_api_key(api_key: &str) -> Result<(String, String)> {
    match api_key.split_once(':') {
        Some((id, secret)) if !id.is_empty() => Ok((id.to_string(), secret.to_string())),
        _ => Err(GbdxError::Config(
            "api_key must have the form client_id:client_secret".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_applied() {
        let config = GbdxConfig::from_toml("user_name = \"alice\"").unwrap();
        assert_eq!(config.base_url, GBDX_BASE_URL);
        assert_eq!(config.auth_url, GBDX_AUTH_URL);
        assert_eq!(config.query_cache_secs, 300);
        assert_eq!(config.user_name.as_deref(), Some("alice"));
    }

    #[test]
    fn test_section_table() {
        let content = r#"
log_level = "debug"

[gbdx]
base_url = "http://localhost:9000"
client_id = "id"
client_secret = "secret"
"#;
        let config = GbdxConfig::from_toml(content).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(
            config.credentials().unwrap(),
            ("id".to_string(), "secret".to_string())
        );
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gbdx]\napi_key = \"abc:def\"").unwrap();
        let config = GbdxConfig::from_file(file.path()).unwrap();
        assert_eq!(
            config.credentials().unwrap(),
            ("abc".to_string(), "def".to_string())
        );
    }

    #[test]
    fn test_unpack_api_key_keeps_colons_in_secret() {
        let (id, secret) = unpack_api_key("client:se:cr:et").unwrap();
        assert_eq!(id, "client");
        assert_eq!(secret, "se:cr:et");
        assert!(unpack_api_key("no-separator").is_err());
    }

    #[test]
    fn test_missing_credentials() {
        let config = GbdxConfig::default();
        assert!(matches!(config.credentials(), Err(GbdxError::Config(_))));
        assert!(matches!(config.user_credentials(), Err(GbdxError::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            GbdxConfig::from_toml("request_timeout_secs = \"soon\""),
            Err(GbdxError::Config(_))
        ));
    }
}
