//! In-memory [`HttpSession`] that replays canned responses.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::SessionError;
use crate::session::HttpSession;

pub(crate) const MOCK_BASE_URL: &str = "https://gbdx.test";

pub(crate) enum MockBody {
    Json(Value),
    Bytes(Vec<u8>),
    Error(SessionError),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
}

pub(crate) struct MockSession {
    responses: Mutex<VecDeque<MockBody>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push_json(&self, value: Value) -> &Self {
        self.responses.lock().unwrap().push_back(MockBody::Json(value));
        self
    }

    pub fn push_bytes(&self, bytes: Vec<u8>) -> &Self {
        self.responses.lock().unwrap().push_back(MockBody::Bytes(bytes));
        self
    }

    pub fn push_status(&self, status: u16) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(MockBody::Error(SessionError::Status {
                status,
                url: MOCK_BASE_URL.to_string(),
                body: String::new(),
            }));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, method: &'static str, url: &str, body: Option<String>) -> MockBody {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                MockBody::Error(SessionError::Transport {
                    url: url.to_string(),
                    message: "no canned response".to_string(),
                })
            })
    }
}

fn into_json(url: &str, body: MockBody) -> Result<Value, SessionError> {
    match body {
        MockBody::Json(value) => Ok(value),
        MockBody::Bytes(_) => Err(SessionError::Decode {
            url: url.to_string(),
            message: "expected JSON, got binary body".to_string(),
        }),
        MockBody::Error(e) => Err(e),
    }
}

#[async_trait]
impl HttpSession for MockSession {
    fn base_url(&self) -> &str {
        MOCK_BASE_URL
    }

    async fn get_json(&self, url: &str) -> Result<Value, SessionError> {
        into_json(url, self.record("GET", url, None))
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, SessionError> {
        match self.record("GET", url, None) {
            MockBody::Bytes(bytes) => Ok(bytes),
            MockBody::Json(value) => Ok(value.to_string().into_bytes()),
            MockBody::Error(e) => Err(e),
        }
    }

    async fn post_json(&self, url: &str, body: String) -> Result<Value, SessionError> {
        into_json(url, self.record("POST", url, Some(body)))
    }
}
