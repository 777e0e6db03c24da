use aws_config::SdkConfig;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{FunctionConfiguration, InvocationType, LogType};
use fleet_core::ProviderError;

use super::{FunctionDetail, FunctionSummary, InvokeRequest, InvokeResponse, LambdaApi};
use crate::convert::{non_empty, text, IntoOption};
use crate::error::classify_sdk_error;

/// [`LambdaApi`] over the AWS SDK.
pub struct SdkLambdaClient {
    client: aws_sdk_lambda::Client,
}

impl SdkLambdaClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_lambda::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl LambdaApi for SdkLambdaClient {
    async fn list_functions(&self, max_items: i32) -> Result<Vec<FunctionSummary>, ProviderError> {
        let output = self
            .client
            .list_functions()
            .max_items(max_items)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .functions()
            .iter()
            .map(|f| FunctionSummary {
                function_name: text(f.function_name()),
                runtime: f.runtime().map(|r| r.as_str().to_string()),
                handler: text(f.handler()),
                memory_size: f.memory_size().into_option(),
                timeout: f.timeout().into_option(),
                last_modified: text(f.last_modified()),
                code_size: f.code_size().into_option(),
                description: non_empty(f.description()),
            })
            .collect())
    }

    async fn get_function(&self, function_name: &str) -> Result<FunctionDetail, ProviderError> {
        let output = self
            .client
            .get_function()
            .function_name(function_name)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output.configuration().map(detail).unwrap_or_default())
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<InvokeResponse, ProviderError> {
        let invocation_type = InvocationType::from(request.invocation_type.as_str());
        let log_type = matches!(invocation_type, InvocationType::RequestResponse)
            .then_some(LogType::Tail);

        let output = self
            .client
            .invoke()
            .function_name(request.function_name)
            .invocation_type(invocation_type)
            .set_log_type(log_type)
            .set_payload(request.payload.map(Blob::new))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(InvokeResponse {
            status_code: output.status_code().into_option(),
            executed_version: text(output.executed_version()),
            function_error: non_empty(output.function_error()),
            log_result: non_empty(output.log_result()),
            payload: output.payload().map(|blob| blob.as_ref().to_vec()),
        })
    }
}

fn detail(config: &FunctionConfiguration) -> FunctionDetail {
    FunctionDetail {
        function_name: text(config.function_name()),
        function_arn: text(config.function_arn()),
        runtime: config.runtime().map(|r| r.as_str().to_string()),
        handler: text(config.handler()),
        role: text(config.role()),
        memory_size: config.memory_size().into_option(),
        timeout: config.timeout().into_option(),
        last_modified: text(config.last_modified()),
        code_size: config.code_size().into_option(),
        description: text(config.description()),
        environment: config
            .environment()
            .and_then(|env| env.variables())
            .map(|vars| vars.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
        layers: config
            .layers()
            .iter()
            .filter_map(|layer| text(layer.arn()))
            .collect(),
        state: config.state().map(|s| s.as_str().to_string()),
        last_update_status: config.last_update_status().map(|s| s.as_str().to_string()),
    }
}
