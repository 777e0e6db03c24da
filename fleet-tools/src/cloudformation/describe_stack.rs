use std::sync::Arc;

use crate::prelude::*;

use super::{CloudFormationApi, ResourceSummary, StackDetail};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescribeStackInput {
    /// Stack name or ID
    pub stack_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeStackOutput {
    #[serde(flatten)]
    stack: StackDetail,
    resource_count: usize,
    resources: Vec<ResourceSummary>,
}

/// Describes a stack together with its resources.
pub struct DescribeStackTool {
    client: Arc<dyn CloudFormationApi>,
}

impl DescribeStackTool {
    pub fn new(client: Arc<dyn CloudFormationApi>) -> Self {
        Self { client }
    }
}

impl Tool for DescribeStackTool {
    type Input = DescribeStackInput;

    fn name(&self) -> &str {
        "cfn_describe_stack"
    }

    fn description(&self) -> &str {
        "Get detailed information about a CloudFormation stack, including parameters, outputs, and resources."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let (stack, resources) = tokio::try_join!(
            self.client.describe_stack(&input.stack_name),
            self.client.list_stack_resources(&input.stack_name),
        )?;

        Ok(ToolResult::json(DescribeStackOutput {
            stack,
            resource_count: resources.len(),
            resources,
        })?)
    }
}
