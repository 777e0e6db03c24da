//! Lambda function listing, inspection and invocation.

mod client;
mod get_function;
mod invoke;
mod list_functions;

pub use client::SdkLambdaClient;
pub use get_function::GetFunctionTool;
pub use invoke::InvokeTool;
pub use list_functions::ListFunctionsTool;

use std::collections::BTreeMap;
use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};
use serde::Serialize;

use crate::config::FleetConfig;

/// Row of `lambda_list_functions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_size: Option<i64>,
    pub description: Option<String>,
}

/// Full configuration returned by `lambda_get_function`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub layers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    pub function_name: String,
    pub invocation_type: String,
    pub payload: Option<Vec<u8>>,
}

/// Invoke response as the service returns it. `log_result` is still base64.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeResponse {
    pub status_code: Option<i32>,
    pub executed_version: Option<String>,
    pub function_error: Option<String>,
    pub log_result: Option<String>,
    pub payload: Option<Vec<u8>>,
}

#[async_trait::async_trait]
pub trait LambdaApi: Send + Sync {
    async fn list_functions(&self, max_items: i32) -> Result<Vec<FunctionSummary>, ProviderError>;

    async fn get_function(&self, function_name: &str) -> Result<FunctionDetail, ProviderError>;

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, ProviderError>;
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    _config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(builder, Arc::new(SdkLambdaClient::new(sdk_config)))
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    client: Arc<dyn LambdaApi>,
) -> Result<(), RegistryError> {
    builder
        .add(ListFunctionsTool::new(client.clone()))?
        .add(GetFunctionTool::new(client.clone()))?
        .add(InvokeTool::new(client))?;
    Ok(())
}
