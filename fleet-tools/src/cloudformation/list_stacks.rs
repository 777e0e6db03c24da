use std::sync::Arc;

use crate::prelude::*;

use super::{CloudFormationApi, StackSummary, ACTIVE_STACK_STATUSES};

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListStacksInput {
    /// Stack status filters (e.g. ["CREATE_COMPLETE", "UPDATE_COMPLETE"]). Default excludes DELETE_COMPLETE.
    #[serde(default)]
    pub status_filter: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ListStacksOutput {
    count: usize,
    stacks: Vec<StackSummary>,
}

pub struct ListStacksTool {
    client: Arc<dyn CloudFormationApi>,
}

impl ListStacksTool {
    pub fn new(client: Arc<dyn CloudFormationApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListStacksTool {
    type Input = ListStacksInput;

    fn name(&self) -> &str {
        "cfn_list_stacks"
    }

    fn description(&self) -> &str {
        "List CloudFormation stacks. Optionally filter by status."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let status_filter = match input.status_filter {
            Some(filter) if !filter.is_empty() => filter,
            _ => ACTIVE_STACK_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        let stacks = self.client.list_stacks(status_filter).await?;

        Ok(ToolResult::json(ListStacksOutput {
            count: stacks.len(),
            stacks,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloudformation::fake::FakeCloudFormation;
    use serde_json::json;

    #[tokio::test]
    async fn test_default_filter_excludes_deleted() {
        let fake = Arc::new(FakeCloudFormation::default());
        let tool = ListStacksTool::new(fake.clone());

        tool.execute(ListStacksInput::default()).await.unwrap();
        tool.execute(ListStacksInput {
            status_filter: Some(vec![]),
        })
        .await
        .unwrap();

        let filters = fake.status_filters.lock().unwrap().clone();
        assert_eq!(filters.len(), 2);
        for filter in filters {
            assert_eq!(filter.len(), 12);
            assert!(!filter.iter().any(|s| s.starts_with("DELETE")));
        }
    }

    #[tokio::test]
    async fn test_explicit_filter_and_null_fields() {
        let fake = Arc::new(FakeCloudFormation {
            stacks: vec![StackSummary {
                stack_name: Some("network".into()),
                stack_status: Some("CREATE_COMPLETE".into()),
                ..Default::default()
            }],
            ..Default::default()
        });
        let tool = ListStacksTool::new(fake.clone());

        let result = tool
            .execute(ListStacksInput {
                status_filter: Some(vec!["CREATE_COMPLETE".into()]),
            })
            .await
            .unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({
                "count": 1,
                "stacks": [{
                    "StackName": "network",
                    "StackStatus": "CREATE_COMPLETE",
                    "Description": null,
                    "DriftStatus": null,
                }]
            })
        );
        assert_eq!(
            fake.status_filters.lock().unwrap()[0],
            vec!["CREATE_COMPLETE".to_string()]
        );
    }
}
