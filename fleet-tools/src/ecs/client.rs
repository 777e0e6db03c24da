use aws_config::SdkConfig;
use aws_sdk_ecs::types::{Container, DesiredStatus, Service, Task};
use fleet_core::ProviderError;

use super::{ContainerSummary, EcsApi, ListTasksRequest, ServiceSummary, TaskSummary};
use crate::convert::{non_empty, text, timestamp, IntoOption};
use crate::error::classify_sdk_error;

/// [`EcsApi`] over the AWS SDK.
pub struct SdkEcsClient {
    client: aws_sdk_ecs::Client,
}

impl SdkEcsClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ecs::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl EcsApi for SdkEcsClient {
    async fn list_clusters(&self) -> Result<Vec<String>, ProviderError> {
        let output = self
            .client
            .list_clusters()
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(output.cluster_arns().to_vec())
    }

    async fn list_services(
        &self,
        cluster: &str,
        max_results: i32,
    ) -> Result<Vec<String>, ProviderError> {
        let output = self
            .client
            .list_services()
            .cluster(cluster)
            .max_results(max_results)
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(output.service_arns().to_vec())
    }

    async fn describe_services(
        &self,
        cluster: &str,
        service_arns: Vec<String>,
    ) -> Result<Vec<ServiceSummary>, ProviderError> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(service_arns))
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(output.services().iter().map(service_summary).collect())
    }

    async fn list_tasks(&self, request: ListTasksRequest) -> Result<Vec<String>, ProviderError> {
        let output = self
            .client
            .list_tasks()
            .cluster(request.cluster)
            .set_service_name(request.service_name)
            .set_desired_status(request.desired_status.as_deref().map(DesiredStatus::from))
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(output.task_arns().to_vec())
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        task_arns: Vec<String>,
    ) -> Result<Vec<TaskSummary>, ProviderError> {
        let output = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(task_arns))
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(output.tasks().iter().map(task_summary).collect())
    }
}

fn service_summary(service: &Service) -> ServiceSummary {
    ServiceSummary {
        service_name: text(service.service_name()),
        status: text(service.status()),
        desired_count: service.desired_count().into_option(),
        running_count: service.running_count().into_option(),
        pending_count: service.pending_count().into_option(),
        launch_type: service.launch_type().map(|t| t.as_str().to_string()),
        task_definition: text(service.task_definition()),
        created_at: timestamp(service.created_at()),
    }
}

fn task_summary(task: &Task) -> TaskSummary {
    TaskSummary {
        task_arn: text(task.task_arn()),
        task_definition_arn: text(task.task_definition_arn()),
        last_status: text(task.last_status()),
        desired_status: text(task.desired_status()),
        cpu: text(task.cpu()),
        memory: text(task.memory()),
        launch_type: task.launch_type().map(|t| t.as_str().to_string()),
        started_at: timestamp(task.started_at()),
        stopped_at: timestamp(task.stopped_at()),
        stopped_reason: non_empty(task.stopped_reason()),
        containers: task.containers().iter().map(container_summary).collect(),
    }
}

fn container_summary(container: &Container) -> ContainerSummary {
    ContainerSummary {
        name: text(container.name()),
        last_status: text(container.last_status()),
        exit_code: container.exit_code().into_option(),
        reason: non_empty(container.reason()),
    }
}
