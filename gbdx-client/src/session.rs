//! Authenticated HTTP session used by every GBDX call.
//!
//! [`HttpSession`] is the seam the catalog query and REST wrappers talk
//! through; [`GbdxSession`] is the reqwest implementation holding an OAuth2
//! bearer token.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::GbdxConfig;
use crate::error::{GbdxError, Result, SessionError};

const ERROR_BODY_LIMIT: usize = 500;

#[async_trait]
pub trait HttpSession: Send + Sync {
    /// Root URL the platform endpoints hang off, e.g. `https://geobigdata.io`.
    fn base_url(&self) -> &str;

    async fn get_json(&self, url: &str) -> std::result::Result<Value, SessionError>;

    async fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, SessionError>;

    async fn post_json(&self, url: &str, body: String) -> std::result::Result<Value, SessionError>;
}

/// Deserializes a JSON body into `T`, reporting failures against `url`.
pub(crate) fn decode<T: DeserializeOwned>(
    url: &str,
    value: Value,
) -> std::result::Result<T, SessionError> {
    serde_json::from_value(value).map_err(|e| SessionError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn encode<T: Serialize + ?Sized>(
    url: &str,
    body: &T,
) -> std::result::Result<String, SessionError> {
    serde_json::to_string(body).map_err(|e| SessionError::Encode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// OAuth2 token endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Lifetime in seconds, as reported by the server.
    #[serde(default)]
    pub expires_in: Option<i64>,

    #[serde(skip, default = "Utc::now")]
    pub issued_at: DateTime<Utc>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
            expires_in: None,
            issued_at: Utc::now(),
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_in
            .map(|secs| self.issued_at + ChronoDuration::seconds(secs))
    }

    /// Tokens without a reported lifetime never count as expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at().is_some_and(|at| Utc::now() >= at)
    }
}

/// reqwest-backed session carrying a bearer token.
pub struct GbdxSession {
    client: Client,
    base_url: String,
    token: AccessToken,
}

impl GbdxSession {
    /// Obtains a token with the OAuth2 password grant and opens a session.
    pub async fn connect(config: &GbdxConfig) -> Result<Self> {
        let client = build_client(config.request_timeout_secs)?;
        let (client_id, client_secret) = config.credentials()?;
        let (user_name, user_password) = config.user_credentials()?;

        tracing::info!("Requesting GBDX access token from {}", config.auth_url);

        let form = format!(
            "grant_type=password&username={}&password={}",
            urlencoding::encode(user_name),
            urlencoding::encode(user_password)
        );

        let response = client
            .post(&config.auth_url)
            .basic_auth(&client_id, Some(&client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .map_err(|e| GbdxError::Auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GbdxError::Auth(format!(
                "token endpoint returned HTTP {}: {}",
                status,
                truncate(&body)
            )));
        }

        let mut token: AccessToken = response
            .json()
            .await
            .map_err(|e| GbdxError::Auth(format!("malformed token response: {}", e)))?;
        token.issued_at = Utc::now();

        tracing::info!(
            "GBDX access token acquired (expires at {:?})",
            token.expires_at()
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Opens a session around an already-issued token.
    pub fn with_token(
        base_url: impl Into<String>,
        token: AccessToken,
        request_timeout_secs: u64,
    ) -> Result<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            client: build_client(request_timeout_secs)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    pub fn token_expired(&self) -> bool {
        self.token.is_expired()
    }

    async fn send(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> std::result::Result<Response, SessionError> {
        let response = request
            .bearer_auth(&self.token.access_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| SessionError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("HTTP {} from {}", status, url);
            return Err(SessionError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body: truncate(&body),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpSession for GbdxSession {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: &str) -> std::result::Result<Value, SessionError> {
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url), url).await?;
        response.json().await.map_err(|e| SessionError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, SessionError> {
        tracing::debug!("GET {} (binary)", url);
        let response = self.send(self.client.get(url), url).await?;
        let bytes = response.bytes().await.map_err(|e| SessionError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    async fn post_json(&self, url: &str, body: String) -> std::result::Result<Value, SessionError> {
        tracing::debug!("POST {} ({} bytes)", url, body.len());
        let response = self.send(self.client.post(url).body(body), url).await?;
        response.json().await.map_err(|e| SessionError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for GbdxSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GbdxSession")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.token.expires_at())
            .finish()
    }
}

fn build_client(request_timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(request_timeout_secs))
        .build()
        .map_err(|e| GbdxError::Config(format!("failed to build HTTP client: {}", e)))
}

fn truncate(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
