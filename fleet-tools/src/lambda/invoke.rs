use std::sync::Arc;

use base64::Engine;

use crate::prelude::*;

use super::{InvokeRequest, LambdaApi};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
pub enum InvocationKind {
    #[default]
    RequestResponse,
    Event,
    DryRun,
}

impl InvocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvocationKind::RequestResponse => "RequestResponse",
            InvocationKind::Event => "Event",
            InvocationKind::DryRun => "DryRun",
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvokeInput {
    /// Function name or ARN
    pub function_name: String,
    /// JSON payload string to send
    #[serde(default)]
    pub payload: Option<String>,
    /// Invocation type (default RequestResponse for sync)
    #[serde(default)]
    pub invocation_type: Option<InvocationKind>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeOutput {
    function_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    executed_version: Option<String>,
    function_error: Option<String>,
    log_result: Option<String>,
    payload: Option<String>,
}

pub struct InvokeTool {
    client: Arc<dyn LambdaApi>,
}

impl InvokeTool {
    pub fn new(client: Arc<dyn LambdaApi>) -> Self {
        Self { client }
    }
}

/// Decodes the base64 log tail, keeping the raw text if it is not valid base64.
fn decode_log_tail(encoded: String) -> String {
    match base64::engine::general_purpose::STANDARD.decode(&encoded) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            log::debug!("Lambda log tail is not base64: {}", err);
            encoded
        }
    }
}

impl Tool for InvokeTool {
    type Input = InvokeInput;

    fn name(&self) -> &str {
        "lambda_invoke"
    }

    fn description(&self) -> &str {
        "Invoke a Lambda function with an optional JSON payload. Returns the response."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let response = self
            .client
            .invoke(InvokeRequest {
                function_name: input.function_name.clone(),
                invocation_type: input.invocation_type.unwrap_or_default().as_str().to_string(),
                payload: input
                    .payload
                    .filter(|p| !p.is_empty())
                    .map(String::into_bytes),
            })
            .await?;

        Ok(ToolResult::json(InvokeOutput {
            function_name: input.function_name,
            status_code: response.status_code,
            executed_version: response.executed_version,
            function_error: response.function_error,
            log_result: response.log_result.map(decode_log_tail),
            payload: response
                .payload
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
        })?)
    }
}
