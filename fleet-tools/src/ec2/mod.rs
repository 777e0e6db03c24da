//! EC2 instance listing and lifecycle actions.

mod client;
mod list_instances;
mod manage_instance;

pub use client::SdkEc2Client;
pub use list_instances::ListInstancesTool;
pub use manage_instance::ManageInstanceTool;

use std::collections::BTreeMap;
use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};
use serde::Serialize;

use crate::config::FleetConfig;
use crate::convert::Timestamp;

/// A DescribeInstances filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceFilter {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeInstancesRequest {
    pub filters: Vec<InstanceFilter>,
    pub max_results: Option<i32>,
}

/// One instance, flattened out of its reservation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstanceSummary {
    #[serde(rename = "InstanceId", skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(rename = "State", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(rename = "LaunchTime", skip_serializing_if = "Option::is_none")]
    pub launch_time: Option<Timestamp>,
    #[serde(rename = "PublicIp")]
    pub public_ip: Option<String>,
    #[serde(rename = "PrivateIp")]
    pub private_ip: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Tags")]
    pub tags: BTreeMap<String, String>,
}

/// Previous and current state reported by StartInstances / StopInstances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateChange {
    pub previous_state: Option<String>,
    pub current_state: Option<String>,
}

#[async_trait::async_trait]
pub trait Ec2Api: Send + Sync {
    async fn describe_instances(
        &self,
        request: DescribeInstancesRequest,
    ) -> Result<Vec<InstanceSummary>, ProviderError>;

    async fn start_instance(&self, instance_id: &str) -> Result<StateChange, ProviderError>;

    async fn stop_instance(&self, instance_id: &str) -> Result<StateChange, ProviderError>;

    async fn reboot_instance(&self, instance_id: &str) -> Result<(), ProviderError>;
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    _config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(builder, Arc::new(SdkEc2Client::new(sdk_config)))
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    client: Arc<dyn Ec2Api>,
) -> Result<(), RegistryError> {
    builder
        .add(ListInstancesTool::new(client.clone()))?
        .add(ManageInstanceTool::new(client))?;
    Ok(())
}
