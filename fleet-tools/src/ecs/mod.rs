//! ECS clusters, services and tasks.
//!
//! Services and tasks are listed by ARN and then described. The describe calls
//! accept a bounded number of ARNs, so listings are split into batches that are
//! described concurrently and reassembled in listing order.

mod client;
mod list_clusters;
mod list_services;
mod list_tasks;

pub use client::SdkEcsClient;
pub use list_clusters::ListClustersTool;
pub use list_services::ListServicesTool;
pub use list_tasks::ListTasksTool;

use std::future::Future;
use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};
use futures::future::try_join_all;
use serde::Serialize;

use crate::config::FleetConfig;
use crate::convert::Timestamp;

/// Most service ARNs one DescribeServices call accepts.
pub const DESCRIBE_SERVICES_LIMIT: usize = 10;
/// Most task ARNs one DescribeTasks call accepts.
pub const DESCRIBE_TASKS_LIMIT: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_definition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTasksRequest {
    pub cluster: String,
    pub service_name: Option<String>,
    pub desired_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_definition_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<Timestamp>,
    pub stopped_reason: Option<String>,
    pub containers: Vec<ContainerSummary>,
}

#[async_trait::async_trait]
pub trait EcsApi: Send + Sync {
    async fn list_clusters(&self) -> Result<Vec<String>, ProviderError>;

    async fn list_services(
        &self,
        cluster: &str,
        max_results: i32,
    ) -> Result<Vec<String>, ProviderError>;

    /// Describes at most [`DESCRIBE_SERVICES_LIMIT`] services.
    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: Vec<String>,
    ) -> Result<Vec<ServiceSummary>, ProviderError>;

    async fn list_tasks(&self, request: ListTasksRequest) -> Result<Vec<String>, ProviderError>;

    /// Describes at most [`DESCRIBE_TASKS_LIMIT`] tasks.
    async fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: Vec<String>,
    ) -> Result<Vec<TaskSummary>, ProviderError>;
}

/// Runs `describe` over `chunk_size` batches of `arns` concurrently and
/// concatenates the results in batch order.
pub(crate) async fn describe_in_batches<T, F, Fut>(
    arns: &[String],
    chunk_size: usize,
    describe: F,
) -> Result<Vec<T>, ProviderError>
where
    F: Fn(Vec<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ProviderError>>,
{
    let batches = try_join_all(arns.chunks(chunk_size).map(|chunk| describe(chunk.to_vec())))
        .await?;
    Ok(batches.into_iter().flatten().collect())
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    _config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(builder, Arc::new(SdkEcsClient::new(sdk_config)))
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    client: Arc<dyn EcsApi>,
) -> Result<(), RegistryError> {
    builder
        .add(ListClustersTool::new(client.clone()))?
        .add(ListServicesTool::new(client.clone()))?
        .add(ListTasksTool::new(client))?;
    Ok(())
}
