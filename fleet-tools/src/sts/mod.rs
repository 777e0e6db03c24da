//! Caller identity.

mod whoami;

pub use whoami::WhoAmITool;

use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};

use crate::config::FleetConfig;
use crate::convert::text;
use crate::error::classify_sdk_error;

/// Result of GetCallerIdentity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

#[async_trait::async_trait]
pub trait StsApi: Send + Sync {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, ProviderError>;
}

/// [`StsApi`] over the AWS SDK.
pub struct SdkStsClient {
    client: aws_sdk_sts::Client,
}

impl SdkStsClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl StsApi for SdkStsClient {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, ProviderError> {
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(CallerIdentity {
            account: text(output.account()),
            arn: text(output.arn()),
            user_id: text(output.user_id()),
        })
    }
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(builder, config, Arc::new(SdkStsClient::new(sdk_config)))
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    config: &FleetConfig,
    client: Arc<dyn StsApi>,
) -> Result<(), RegistryError> {
    builder.add(WhoAmITool::new(client, config.region.clone()))?;
    Ok(())
}
