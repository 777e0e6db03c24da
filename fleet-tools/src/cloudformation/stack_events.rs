use std::sync::Arc;

use crate::prelude::*;

use super::{CloudFormationApi, StackEvent};

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StackEventsInput {
    /// Stack name or ID
    pub stack_name: String,
    /// Max events to return (default 20)
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StackEventsOutput {
    stack_name: String,
    count: usize,
    events: Vec<StackEvent>,
}

pub struct StackEventsTool {
    client: Arc<dyn CloudFormationApi>,
}

impl StackEventsTool {
    pub fn new(client: Arc<dyn CloudFormationApi>) -> Self {
        Self { client }
    }
}

impl Tool for StackEventsTool {
    type Input = StackEventsInput;

    fn name(&self) -> &str {
        "cfn_stack_events"
    }

    fn description(&self) -> &str {
        "Get recent events for a CloudFormation stack. Useful for debugging deployments."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let limit = input
            .limit
            .filter(|n| *n > 0)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_LIMIT);

        let mut events = self.client.describe_stack_events(&input.stack_name).await?;
        events.truncate(limit);

        Ok(ToolResult::json(StackEventsOutput {
            stack_name: input.stack_name,
            count: events.len(),
            events,
        })?)
    }
}
