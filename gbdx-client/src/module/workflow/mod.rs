//! Workflow monitoring: task catalog, workflow search and status summaries.

mod api;
mod types;

pub use api::{
    describe_workflows, get_task_definition, get_workflow_status, list_available_tasks,
    search_workflows, summarize_workflow_tasks,
};
pub use types::{
    TaskState, WorkflowSearch, WorkflowState, WorkflowStatus, WorkflowTask,
    DEFAULT_LOOKBACK_HOURS,
};
