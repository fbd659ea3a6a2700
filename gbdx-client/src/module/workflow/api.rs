//! Read-only workflow and task endpoints

use serde_json::Value;

use super::types::{TaskListResponse, WorkflowSearch, WorkflowSearchResponse, WorkflowStatus};
use crate::constants::{join_url, path_segment};
use crate::error::Result;
use crate::session::{self, HttpSession};

/// Names of the tasks available on the platform.
pub async fn list_available_tasks<S>(session: &S) -> Result<Vec<String>>
where
    S: HttpSession + ?Sized,
{
    let url = join_url(session.base_url(), &["workflows", "v1", "tasks"]);
    let body = session.get_json(&url).await?;
    let response: TaskListResponse = session::decode(&url, body)?;
    tracing::debug!("{} tasks available", response.tasks.len());
    Ok(response.tasks)
}

/// Task definition (inputs, outputs, description) as returned by the service.
pub async fn get_task_definition<S>(session: &S, task_name: &str) -> Result<Value>
where
    S: HttpSession + ?Sized,
{
    let url = join_url(
        session.base_url(),
        &["workflows", "v1", "tasks", &path_segment(task_name)],
    );
    Ok(session.get_json(&url).await?)
}

/// Ids of the workflows matching `search`.
pub async fn search_workflows<S>(session: &S, search: &WorkflowSearch) -> Result<Vec<String>>
where
    S: HttpSession + ?Sized,
{
    let url = join_url(session.base_url(), &["workflows", "v1", "workflows", "search"]);
    let payload = session::encode(&url, search)?;

    tracing::info!(
        "Searching {} workflows from the last {}h",
        search.state,
        search.lookback_h
    );
    let body = session.post_json(&url, payload).await?;
    let response: WorkflowSearchResponse = session::decode(&url, body)?;
    Ok(response.workflows)
}

pub async fn get_workflow_status<S>(session: &S, workflow_id: &str) -> Result<WorkflowStatus>
where
    S: HttpSession + ?Sized,
{
    let url = join_url(
        session.base_url(),
        &["workflows", "v1", "workflows", &path_segment(workflow_id)],
    );
    let body = session.get_json(&url).await?;
    Ok(session::decode(&url, body)?)
}

/// One `\t{name}({taskType}):{state}` line per task.
pub fn summarize_workflow_tasks(workflow: &WorkflowStatus) -> String {
    workflow
        .tasks
        .iter()
        .map(|t| format!("\t{}({}):{}", t.name, t.task_type, t.state.state))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fetches each workflow's status and renders a header plus task summary.
///
/// Issues one request per id, in order; the first failure aborts.
pub async fn describe_workflows<S>(session: &S, workflow_ids: &[String]) -> Result<String>
where
    S: HttpSession + ?Sized,
{
    let mut summary = String::new();
    for workflow_id in workflow_ids {
        let status = get_workflow_status(session, workflow_id).await?;
        summary.push_str(&format!("Workflow {} ({})\n", status.id, status.owner));
        summary.push_str(&summarize_workflow_tasks(&status));
        summary.push('\n');
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::workflow::WorkflowState;
    use crate::testing::{MockSession, MOCK_BASE_URL};
    use serde_json::json;

    fn workflow_json(id: &str) -> Value {
        json!({
            "id": id,
            "owner": "alice",
            "state": {"state": "running"},
            "tasks": [
                {"name": "ortho", "taskType": "AOP_Strip_Processor", "state": {"state": "complete", "event": "succeeded"}},
                {"name": "upload", "taskType": "StageDataToS3", "state": {"state": "pending"}}
            ]
        })
    }

    #[tokio::test]
    async fn test_list_available_tasks() {
        let session = MockSession::new();
        session.push_json(json!({"tasks": ["AOP_Strip_Processor", "StageDataToS3"]}));

        let tasks = list_available_tasks(&session).await.unwrap();
        assert_eq!(tasks, vec!["AOP_Strip_Processor", "StageDataToS3"]);
        assert_eq!(session.calls()[0].url, format!("{}/workflows/v1/tasks", MOCK_BASE_URL));
    }

    #[tokio::test]
    async fn test_get_task_definition() {
        let session = MockSession::new();
        session.push_json(json!({"name": "StageDataToS3", "description": "Stages data"}));

        let definition = get_task_definition(&session, "StageDataToS3").await.unwrap();
        assert!(definition.get("description").is_some());
        assert_eq!(
            session.calls()[0].url,
            format!("{}/workflows/v1/tasks/StageDataToS3", MOCK_BASE_URL)
        );
    }

    #[tokio::test]
    async fn test_search_workflows() {
        let session = MockSession::new();
        session.push_json(json!({"Workflows": ["4321", "4322"]}));

        let search = WorkflowSearch {
            state: WorkflowState::Running,
            owner: None,
            lookback_h: 24,
        };
        let ids = search_workflows(&session, &search).await.unwrap();
        assert_eq!(ids, vec!["4321", "4322"]);

        let call = &session.calls()[0];
        assert_eq!(call.method, "POST");
        let body: Value = serde_json::from_str(call.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"state": "running", "lookback_h": 24}));
    }

    #[test]
    fn test_summarize_workflow_tasks() {
        let status: WorkflowStatus = serde_json::from_value(workflow_json("4321")).unwrap();
        assert_eq!(
            summarize_workflow_tasks(&status),
            "\tortho(AOP_Strip_Processor):complete\n\tupload(StageDataToS3):pending"
        );
    }

    #[tokio::test]
    async fn test_describe_workflows() {
        let session = MockSession::new();
        session
            .push_json(workflow_json("4321"))
            .push_json(workflow_json("4322"));

        let ids = vec!["4321".to_string(), "4322".to_string()];
        let summary = describe_workflows(&session, &ids).await.unwrap();
        assert!(summary.starts_with("Workflow 4321 (alice)\n\tortho"));
        assert!(summary.contains("Workflow 4322 (alice)\n"));
        assert_eq!(session.call_count(), 2);
    }
}
