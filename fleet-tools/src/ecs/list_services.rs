use std::sync::Arc;

use crate::prelude::*;

use super::{describe_in_batches, EcsApi, ServiceSummary, DESCRIBE_SERVICES_LIMIT};

const DEFAULT_MAX_RESULTS: i32 = 50;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListServicesInput {
    /// Cluster name or ARN
    pub cluster: String,
    /// Max results (default 50)
    #[serde(default)]
    pub max_results: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ListServicesOutput {
    cluster: String,
    count: usize,
    services: Vec<ServiceSummary>,
}

pub struct ListServicesTool {
    client: Arc<dyn EcsApi>,
}

impl ListServicesTool {
    pub fn new(client: Arc<dyn EcsApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListServicesTool {
    type Input = ListServicesInput;

    fn name(&self) -> &str {
        "ecs_list_services"
    }

    fn description(&self) -> &str {
        "List services in an ECS cluster."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let max_results = input
            .max_results
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_RESULTS);
        let arns = self.client.list_services(&input.cluster, max_results).await?;

        let services = if arns.is_empty() {
            Vec::new()
        } else {
            let cluster = input.cluster.as_str();
            describe_in_batches(&arns, DESCRIBE_SERVICES_LIMIT, |batch| {
                self.client.describe_services(cluster, batch)
            })
            .await?
        };

        Ok(ToolResult::json(ListServicesOutput {
            cluster: input.cluster,
            count: services.len(),
            services,
        })?)
    }
}
