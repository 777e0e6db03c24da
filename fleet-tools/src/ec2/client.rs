use std::collections::BTreeMap;

use aws_config::SdkConfig;
use aws_sdk_ec2::types::{Filter, Instance, InstanceState, InstanceStateChange};
use fleet_core::ProviderError;

use super::{DescribeInstancesRequest, Ec2Api, InstanceSummary, StateChange};
use crate::convert::{non_empty, text, timestamp};
use crate::error::classify_sdk_error;

/// [`Ec2Api`] over the AWS SDK.
pub struct SdkEc2Client {
    client: aws_sdk_ec2::Client,
}

impl SdkEc2Client {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl Ec2Api for SdkEc2Client {
    async fn describe_instances(
        &self,
        request: DescribeInstancesRequest,
    ) -> Result<Vec<InstanceSummary>, ProviderError> {
        let filters: Vec<Filter> = request
            .filters
            .into_iter()
            .map(|f| Filter::builder().name(f.name).set_values(Some(f.values)).build())
            .collect();

        let output = self
            .client
            .describe_instances()
            .set_filters((!filters.is_empty()).then_some(filters))
            .set_max_results(request.max_results)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .reservations()
            .iter()
            .flat_map(|r| r.instances())
            .map(summarize)
            .collect())
    }

    async fn start_instance(&self, instance_id: &str) -> Result<StateChange, ProviderError> {
        let output = self
            .client
            .start_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(state_change(output.starting_instances().first()))
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<StateChange, ProviderError> {
        let output = self
            .client
            .stop_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(state_change(output.stopping_instances().first()))
    }

    async fn reboot_instance(&self, instance_id: &str) -> Result<(), ProviderError> {
        self.client
            .reboot_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(())
    }
}

fn summarize(instance: &Instance) -> InstanceSummary {
    let tags: BTreeMap<String, String> = instance
        .tags()
        .iter()
        .filter_map(|tag| {
            let key = tag.key()?;
            Some((key.to_string(), tag.value().unwrap_or_default().to_string()))
        })
        .collect();
    let name = tags.get("Name").filter(|v| !v.is_empty()).cloned();

    InstanceSummary {
        instance_id: text(instance.instance_id()),
        state: state_name(instance.state()),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        launch_time: timestamp(instance.launch_time()),
        public_ip: non_empty(instance.public_ip_address()),
        private_ip: non_empty(instance.private_ip_address()),
        name,
        tags,
    }
}

fn state_name(state: Option<&InstanceState>) -> Option<String> {
    state
        .and_then(|s| s.name())
        .map(|name| name.as_str().to_string())
}

fn state_change(change: Option<&InstanceStateChange>) -> StateChange {
    StateChange {
        previous_state: state_name(change.and_then(|c| c.previous_state())),
        current_state: state_name(change.and_then(|c| c.current_state())),
    }
}
