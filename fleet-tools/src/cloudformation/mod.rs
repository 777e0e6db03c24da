//! CloudFormation stack listing, description and event history.

mod client;
mod describe_stack;
mod list_stacks;
mod stack_events;

pub use client::SdkCloudFormationClient;
pub use describe_stack::DescribeStackTool;
pub use list_stacks::ListStacksTool;
pub use stack_events::StackEventsTool;

use std::collections::BTreeMap;
use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};
use serde::Serialize;

use crate::config::FleetConfig;
use crate::convert::Timestamp;

/// Every stack status except the deleted ones.
pub const ACTIVE_STACK_STATUSES: &[&str] = &[
    "CREATE_IN_PROGRESS",
    "CREATE_COMPLETE",
    "CREATE_FAILED",
    "ROLLBACK_IN_PROGRESS",
    "ROLLBACK_COMPLETE",
    "ROLLBACK_FAILED",
    "UPDATE_IN_PROGRESS",
    "UPDATE_COMPLETE",
    "UPDATE_FAILED",
    "UPDATE_ROLLBACK_IN_PROGRESS",
    "UPDATE_ROLLBACK_COMPLETE",
    "UPDATE_ROLLBACK_FAILED",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<Timestamp>,
    pub description: Option<String>,
    pub drift_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A stack as DescribeStacks reports it, with list members keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub status_reason: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<Timestamp>,
    pub parameters: BTreeMap<String, String>,
    pub outputs: BTreeMap<String, StackOutput>,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_id: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEvent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_status: Option<String>,
    pub resource_status_reason: Option<String>,
}

/// Stack operations. A stack that does not exist is reported as
/// [`ProviderError::NotFound`] by every method.
#[async_trait::async_trait]
pub trait CloudFormationApi: Send + Sync {
    async fn list_stacks(
        &self,
        status_filter: Vec<String>,
    ) -> Result<Vec<StackSummary>, ProviderError>;

    async fn describe_stack(&self, stack_name: &str) -> Result<StackDetail, ProviderError>;

    async fn list_stack_resources(
        &self,
        stack_name: &str,
    ) -> Result<Vec<ResourceSummary>, ProviderError>;

    /// Events of the first page, newest first.
    async fn describe_stack_events(
        &self,
        stack_name: &str,
    ) -> Result<Vec<StackEvent>, ProviderError>;
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    _config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(builder, Arc::new(SdkCloudFormationClient::new(sdk_config)))
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    client: Arc<dyn CloudFormationApi>,
) -> Result<(), RegistryError> {
    builder
        .add(ListStacksTool::new(client.clone()))?
        .add(DescribeStackTool::new(client.clone()))?
        .add(StackEventsTool::new(client))?;
    Ok(())
}
