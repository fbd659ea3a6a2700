//! Temporary S3 credentials for the caller's storage prefix.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::join_url;
use crate::error::Result;
use crate::session::{self, HttpSession};

pub const DEFAULT_S3_CREDS_DURATION_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Credentials {
    pub bucket: String,
    pub prefix: String,

    /// Access keys and session token, as issued.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl S3Credentials {
    pub fn s3_url(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.prefix)
    }
}

pub async fn get_s3_credentials<S>(session: &S, duration_secs: u64) -> Result<S3Credentials>
where
    S: HttpSession + ?Sized,
{
    let endpoint = format!("prefix?duration={}", duration_secs);
    let url = join_url(session.base_url(), &["s3creds", "v1", &endpoint]);
    tracing::info!("Requesting S3 credentials valid for {}s", duration_secs);
    let body = session.get_json(&url).await?;
    Ok(session::decode(&url, body)?)
}
