use std::sync::Arc;

use crate::prelude::*;

use super::{GetLogEventsRequest, LogEvent, LogsApi};

const DEFAULT_LIMIT: i32 = 50;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetLogsInput {
    /// Log group name (e.g. /aws/lambda/my-function)
    pub log_group_name: String,
    /// Log stream name
    pub log_stream_name: String,
    /// Max events to return (default 50)
    #[serde(default)]
    pub limit: Option<i32>,
    /// Start from oldest (true) or newest (false, default)
    #[serde(default)]
    pub start_from_head: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetLogsOutput {
    log_group_name: String,
    log_stream_name: String,
    count: usize,
    events: Vec<LogEvent>,
}

pub struct GetLogsTool {
    client: Arc<dyn LogsApi>,
}

impl GetLogsTool {
    pub fn new(client: Arc<dyn LogsApi>) -> Self {
        Self { client }
    }
}

impl Tool for GetLogsTool {
    type Input = GetLogsInput;

    fn name(&self) -> &str {
        "cloudwatch_get_logs"
    }

    fn description(&self) -> &str {
        "Get recent log events from a CloudWatch Logs log group and stream."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let events = self
            .client
            .get_log_events(GetLogEventsRequest {
                log_group_name: input.log_group_name.clone(),
                log_stream_name: input.log_stream_name.clone(),
                limit: input.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT),
                start_from_head: input.start_from_head.unwrap_or(false),
            })
            .await?;

        Ok(ToolResult::json(GetLogsOutput {
            log_group_name: input.log_group_name,
            log_stream_name: input.log_stream_name,
            count: events.len(),
            events,
        })?)
    }
}
