use std::sync::Arc;

use crate::prelude::*;

use super::{describe_in_batches, EcsApi, ListTasksRequest, TaskSummary, DESCRIBE_TASKS_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskStatus {
    Running,
    Pending,
    Stopped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Running => "RUNNING",
            TaskStatus::Pending => "PENDING",
            TaskStatus::Stopped => "STOPPED",
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksInput {
    /// Cluster name or ARN
    pub cluster: String,
    /// Service name to filter by
    #[serde(default)]
    pub service_name: Option<String>,
    /// Filter by task status
    #[serde(default)]
    pub desired_status: Option<TaskStatus>,
}

#[derive(Debug, Serialize)]
struct ListTasksOutput {
    cluster: String,
    count: usize,
    tasks: Vec<TaskSummary>,
}

pub struct ListTasksTool {
    client: Arc<dyn EcsApi>,
}

impl ListTasksTool {
    pub fn new(client: Arc<dyn EcsApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListTasksTool {
    type Input = ListTasksInput;

    fn name(&self) -> &str {
        "ecs_list_tasks"
    }

    fn description(&self) -> &str {
        "List tasks in an ECS cluster, optionally filtered by service."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let arns = self
            .client
            .list_tasks(ListTasksRequest {
                cluster: input.cluster.clone(),
                service_name: input.service_name.filter(|s| !s.is_empty()),
                desired_status: input.desired_status.map(|s| s.as_str().to_string()),
            })
            .await?;

        let tasks = if arns.is_empty() {
            Vec::new()
        } else {
            let cluster = input.cluster.as_str();
            describe_in_batches(&arns, DESCRIBE_TASKS_LIMIT, |batch| {
                self.client.describe_tasks(cluster, batch)
            })
            .await?
        };

        Ok(ToolResult::json(ListTasksOutput {
            cluster: input.cluster,
            count: tasks.len(),
            tasks,
        })?)
    }
}
