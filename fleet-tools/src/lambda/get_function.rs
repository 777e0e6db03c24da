use std::sync::Arc;

use crate::prelude::*;

use super::LambdaApi;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetFunctionInput {
    /// Function name or ARN
    pub function_name: String,
}

pub struct GetFunctionTool {
    client: Arc<dyn LambdaApi>,
}

impl GetFunctionTool {
    pub fn new(client: Arc<dyn LambdaApi>) -> Self {
        Self { client }
    }
}

impl Tool for GetFunctionTool {
    type Input = GetFunctionInput;

    fn name(&self) -> &str {
        "lambda_get_function"
    }

    fn description(&self) -> &str {
        "Get detailed configuration for a Lambda function."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let detail = self.client.get_function(&input.function_name).await?;
        Ok(ToolResult::json(detail)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lambda::fake::FakeLambda;
    use crate::lambda::FunctionDetail;
    use fleet_core::{Dispatcher, FailureKind, ToolRegistry};
    use serde_json::json;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_environment_and_layers() {
        let fake = Arc::new(FakeLambda {
            detail: Some(FunctionDetail {
                function_name: Some("api".into()),
                environment: BTreeMap::from([
                    ("STAGE".to_string(), "prod".to_string()),
                    ("LOG_LEVEL".to_string(), "info".to_string()),
                ]),
                layers: vec!["arn:aws:lambda:us-east-1:123:layer:deps:4".into()],
                state: Some("Active".into()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let tool = GetFunctionTool::new(fake);

        let result = tool
            .execute(GetFunctionInput {
                function_name: "api".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({
                "FunctionName": "api",
                "Environment": {"LOG_LEVEL": "info", "STAGE": "prod"},
                "Layers": ["arn:aws:lambda:us-east-1:123:layer:deps:4"],
                "State": "Active",
            })
        );
    }

    #[tokio::test]
    async fn test_empty_environment_is_an_object() {
        let fake = Arc::new(FakeLambda {
            detail: Some(FunctionDetail::default()),
            ..Default::default()
        });
        let tool = GetFunctionTool::new(fake);

        let result = tool
            .execute(GetFunctionInput {
                function_name: "bare".into(),
            })
            .await
            .unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({"Environment": {}, "Layers": []})
        );
    }

    #[tokio::test]
    async fn test_missing_function_is_not_found() {
        let mut builder = ToolRegistry::builder();
        builder
            .add(GetFunctionTool::new(Arc::new(FakeLambda::default())))
            .unwrap();
        let dispatcher = Dispatcher::new(builder.build());

        let envelope = dispatcher
            .invoke("lambda_get_function", json!({"functionName": "ghost"}))
            .await;

        assert!(envelope.is_error());
        assert_eq!(envelope.failure_kind(), Some(FailureKind::NotFound));
    }
}
