use std::sync::Arc;

use crate::prelude::*;

use super::{FunctionSummary, LambdaApi};

const DEFAULT_MAX_ITEMS: i32 = 50;

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFunctionsInput {
    /// Max functions to return (default 50)
    #[serde(default)]
    pub max_items: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ListFunctionsOutput {
    count: usize,
    functions: Vec<FunctionSummary>,
}

pub struct ListFunctionsTool {
    client: Arc<dyn LambdaApi>,
}

impl ListFunctionsTool {
    pub fn new(client: Arc<dyn LambdaApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListFunctionsTool {
    type Input = ListFunctionsInput;

    fn name(&self) -> &str {
        "lambda_list_functions"
    }

    fn description(&self) -> &str {
        "List Lambda functions in the account."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let max_items = input
            .max_items
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_ITEMS);
        let functions = self.client.list_functions(max_items).await?;

        Ok(ToolResult::json(ListFunctionsOutput {
            count: functions.len(),
            functions,
        })?)
    }
}
