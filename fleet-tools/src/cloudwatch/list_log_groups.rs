use std::sync::Arc;

use crate::prelude::*;

use super::{LogGroupSummary, LogsApi};

const DEFAULT_LIMIT: i32 = 50;

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListLogGroupsInput {
    /// Log group name prefix to filter by
    #[serde(default)]
    pub prefix: Option<String>,
    /// Max log groups to return (default 50)
    #[serde(default)]
    pub limit: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListLogGroupsOutput {
    count: usize,
    log_groups: Vec<LogGroupSummary>,
}

pub struct ListLogGroupsTool {
    client: Arc<dyn LogsApi>,
}

impl ListLogGroupsTool {
    pub fn new(client: Arc<dyn LogsApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListLogGroupsTool {
    type Input = ListLogGroupsInput;

    fn name(&self) -> &str {
        "cloudwatch_list_log_groups"
    }

    fn description(&self) -> &str {
        "List CloudWatch Logs log groups. Optionally filter by name prefix."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let groups = self
            .client
            .describe_log_groups(
                input.prefix.filter(|p| !p.is_empty()),
                input.limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIMIT),
            )
            .await?;

        Ok(ToolResult::json(ListLogGroupsOutput {
            count: groups.len(),
            log_groups: groups,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudwatch::fake::FakeLogs;
    use crate::cloudwatch::Retention;
    use crate::convert::Timestamp;
    use serde_json::json;

    #[tokio::test]
    async fn test_retention_rendering() {
        let fake = Arc::new(FakeLogs {
            groups: vec![
                LogGroupSummary {
                    name: Some("/aws/lambda/api".into()),
                    stored_bytes: Some(1024),
                    retention_days: Retention(Some(14)),
                    creation_time: Timestamp::from_millis(0),
                },
                LogGroupSummary {
                    name: Some("/ecs/web".into()),
                    stored_bytes: Some(0),
                    retention_days: Retention(None),
                    creation_time: None,
                },
            ],
            ..Default::default()
        });
        let tool = ListLogGroupsTool::new(fake.clone());

        let result = tool
            .execute(ListLogGroupsInput {
                prefix: Some("/".into()),
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({
                "count": 2,
                "logGroups": [
                    {
                        "name": "/aws/lambda/api",
                        "storedBytes": 1024,
                        "retentionDays": 14,
                        "creationTime": "1970-01-01T00:00:00.000Z",
                    },
                    {
                        "name": "/ecs/web",
                        "storedBytes": 0,
                        "retentionDays": "never expires",
                        "creationTime": null,
                    },
                ]
            })
        );
        assert_eq!(
            fake.group_requests.lock().unwrap()[0],
            (Some("/".to_string()), 50)
        );
    }

    #[tokio::test]
    async fn test_empty_prefix_is_not_sent() {
        let fake = Arc::new(FakeLogs::default());
        let tool = ListLogGroupsTool::new(fake.clone());

        tool.execute(ListLogGroupsInput {
            prefix: Some(String::new()),
            limit: Some(5),
        })
        .await
        .unwrap();

        assert_eq!(fake.group_requests.lock().unwrap()[0], (None, 5));
    }
}
