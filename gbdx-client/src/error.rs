//! Error types for the GBDX client.

use thiserror::Error;

/// Failures raised by an [`HttpSession`](crate::session::HttpSession) call.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("failed to encode request body for {url}: {message}")]
    Encode { url: String, message: String },

    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl SessionError {
    /// HTTP status code, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors produced by the GBDX client.
#[derive(Error, Debug)]
pub enum GbdxError {
    #[error("invalid AOI: {0}")]
    InvalidAoi(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("catalog query failed: {0}")]
    QueryExecution(#[source] SessionError),

    #[error("result set does not contain {0}")]
    RecordNotFound(String),

    #[error("record {identifier} has no property {key}")]
    PropertyNotFound { identifier: String, key: String },

    #[error("index {index} out of range (records: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("failed to parse footprint of {identifier}: {reason}")]
    GeometryParse { identifier: String, reason: String },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for GBDX client operations.
pub type Result<T> = std::result::Result<T, GbdxError>;
