//! Workflow and task data types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::GbdxError;

pub const DEFAULT_LOOKBACK_HOURS: u32 = 3;

/// Workflow states accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    Submitted,
    Scheduled,
    Started,
    Canceled,
    Cancelling,
    Failed,
    Succeeded,
    Timedout,
    Pending,
    Running,
    Complete,
    /// Matches any state
    #[default]
    All,
}

impl WorkflowState {
    pub const ALL_STATES: [WorkflowState; 12] = [
        WorkflowState::Submitted,
        WorkflowState::Scheduled,
        WorkflowState::Started,
        WorkflowState::Canceled,
        WorkflowState::Cancelling,
        WorkflowState::Failed,
        WorkflowState::Succeeded,
        WorkflowState::Timedout,
        WorkflowState::Pending,
        WorkflowState::Running,
        WorkflowState::Complete,
        WorkflowState::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Submitted => "submitted",
            WorkflowState::Scheduled => "scheduled",
            WorkflowState::Started => "started",
            WorkflowState::Canceled => "canceled",
            WorkflowState::Cancelling => "cancelling",
            WorkflowState::Failed => "failed",
            WorkflowState::Succeeded => "succeeded",
            WorkflowState::Timedout => "timedout",
            WorkflowState::Pending => "pending",
            WorkflowState::Running => "running",
            WorkflowState::Complete => "complete",
            WorkflowState::All => "all",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowState {
    type Err = GbdxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL_STATES
            .into_iter()
            .find(|state| state.as_str() == lower)
            .ok_or_else(|| GbdxError::InvalidParameter {
                name: "state",
                reason: format!("unknown workflow state '{}'", s),
            })
    }
}

/// Body of `POST /workflows/v1/workflows/search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSearch {
    pub state: WorkflowState,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    pub lookback_h: u32,
}

impl Default for WorkflowSearch {
    fn default() -> Self {
        Self {
            state: WorkflowState::All,
            owner: None,
            lookback_h: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WorkflowSearchResponse {
    #[serde(rename = "Workflows", default)]
    pub workflows: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaskListResponse {
    #[serde(default)]
    pub tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStatus {
    pub id: String,

    #[serde(default)]
    pub owner: String,

    #[serde(default)]
    pub tasks: Vec<WorkflowTask>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTask {
    pub name: String,

    #[serde(rename = "taskType")]
    pub task_type: String,

    pub state: TaskState,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskState {
    pub state: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parsing() {
        assert_eq!("Running".parse::<WorkflowState>().unwrap(), WorkflowState::Running);
        assert_eq!(" ALL ".parse::<WorkflowState>().unwrap(), WorkflowState::All);
        assert!("exploded".parse::<WorkflowState>().is_err());
        for state in WorkflowState::ALL_STATES {
            assert_eq!(state.as_str().parse::<WorkflowState>().unwrap(), state);
        }
    }

    #[test]
    fn test_search_body() {
        let body = serde_json::to_value(WorkflowSearch::default()).unwrap();
        assert_eq!(body, serde_json::json!({"state": "all", "lookback_h": 3}));

        let body = serde_json::to_value(WorkflowSearch {
            state: WorkflowState::Failed,
            owner: Some("alice".to_string()),
            lookback_h: 24,
        })
        .unwrap();
        assert_eq!(body["owner"], "alice");
        assert_eq!(body["state"], "failed");
    }
}
