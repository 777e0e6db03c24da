use std::error::Error as StdError;
use std::fmt::Debug;

use aws_config::SdkConfig;
use aws_sdk_cloudformation::types as cfn;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use fleet_core::ProviderError;

use super::{
    CloudFormationApi, ResourceSummary, StackDetail, StackEvent, StackOutput, StackSummary,
};
use crate::convert::{non_empty, text, timestamp, IntoOption};
use crate::error::classify_sdk_error;

/// [`CloudFormationApi`] over the AWS SDK.
pub struct SdkCloudFormationClient {
    client: aws_sdk_cloudformation::Client,
}

impl SdkCloudFormationClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudformation::Client::new(sdk_config),
        }
    }
}

/// CloudFormation reports unknown stacks as a `ValidationError` rather than a
/// not-found code.
fn stack_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: Debug,
{
    match classify_sdk_error(err) {
        ProviderError::Api { code, message }
            if code == "ValidationError" && message.contains("does not exist") =>
        {
            ProviderError::NotFound(message)
        }
        other => other,
    }
}

#[async_trait::async_trait]
impl CloudFormationApi for SdkCloudFormationClient {
    async fn list_stacks(
        &self,
        status_filter: Vec<String>,
    ) -> Result<Vec<StackSummary>, ProviderError> {
        let statuses = status_filter
            .iter()
            .map(|s| cfn::StackStatus::from(s.as_str()))
            .collect();

        let output = self
            .client
            .list_stacks()
            .set_stack_status_filter(Some(statuses))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .stack_summaries()
            .iter()
            .map(|s| StackSummary {
                stack_name: text(s.stack_name()),
                stack_status: s
                    .stack_status()
                    .into_option()
                    .map(|status| status.as_str().to_string()),
                creation_time: timestamp(s.creation_time()),
                last_updated_time: timestamp(s.last_updated_time()),
                description: non_empty(s.template_description()),
                drift_status: s
                    .drift_information()
                    .and_then(|d| d.stack_drift_status().into_option())
                    .map(|status| status.as_str().to_string()),
            })
            .collect())
    }

    async fn describe_stack(&self, stack_name: &str) -> Result<StackDetail, ProviderError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(stack_error)?;

        output
            .stacks()
            .first()
            .map(stack_detail)
            .ok_or_else(|| ProviderError::NotFound(format!("Stack {stack_name} not found")))
    }

    async fn list_stack_resources(
        &self,
        stack_name: &str,
    ) -> Result<Vec<ResourceSummary>, ProviderError> {
        let output = self
            .client
            .list_stack_resources()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(stack_error)?;

        Ok(output
            .stack_resource_summaries()
            .iter()
            .map(|r| ResourceSummary {
                logical_id: text(r.logical_resource_id()),
                physical_id: text(r.physical_resource_id()),
                resource_type: text(r.resource_type()),
                status: r
                    .resource_status()
                    .into_option()
                    .map(|status| status.as_str().to_string()),
                last_updated: timestamp(r.last_updated_timestamp()),
            })
            .collect())
    }

    async fn describe_stack_events(
        &self,
        stack_name: &str,
    ) -> Result<Vec<StackEvent>, ProviderError> {
        let output = self
            .client
            .describe_stack_events()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(stack_error)?;

        Ok(output
            .stack_events()
            .iter()
            .map(|e| StackEvent {
                timestamp: timestamp(e.timestamp()),
                logical_resource_id: text(e.logical_resource_id()),
                resource_type: text(e.resource_type()),
                resource_status: e
                    .resource_status()
                    .into_option()
                    .map(|status| status.as_str().to_string()),
                resource_status_reason: non_empty(e.resource_status_reason()),
            })
            .collect())
    }
}

fn stack_detail(stack: &cfn::Stack) -> StackDetail {
    StackDetail {
        stack_name: text(stack.stack_name()),
        stack_id: text(stack.stack_id()),
        status: stack
            .stack_status()
            .into_option()
            .map(|status| status.as_str().to_string()),
        status_reason: non_empty(stack.stack_status_reason()),
        description: non_empty(stack.description()),
        creation_time: timestamp(stack.creation_time()),
        last_updated_time: timestamp(stack.last_updated_time()),
        parameters: stack
            .parameters()
            .iter()
            .filter_map(|p| {
                let key = text(p.parameter_key())?;
                Some((key, text(p.parameter_value()).unwrap_or_default()))
            })
            .collect(),
        outputs: stack
            .outputs()
            .iter()
            .filter_map(|o| {
                let key = text(o.output_key())?;
                let output = StackOutput {
                    value: text(o.output_value()),
                    description: text(o.description()),
                };
                Some((key, output))
            })
            .collect(),
        tags: stack
            .tags()
            .iter()
            .filter_map(|t| Some((text(t.key())?, text(t.value()).unwrap_or_default())))
            .collect(),
    }
}
