use std::sync::Arc;

use crate::prelude::*;

use super::{DescribeInstancesRequest, Ec2Api, InstanceFilter, InstanceSummary};

#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListInstancesInput {
    /// Filter by instance state: running, stopped, pending, terminated
    #[serde(default)]
    pub state: Option<String>,
    /// Filter by tag key
    #[serde(default)]
    pub tag_key: Option<String>,
    /// Filter by tag value (requires tagKey)
    #[serde(default)]
    pub tag_value: Option<String>,
    /// Max results to return
    #[serde(default)]
    pub max_results: Option<i32>,
}

impl ListInstancesInput {
    /// Filters are only sent for non-empty values; the tag filter needs both
    /// key and value.
    fn into_request(self) -> DescribeInstancesRequest {
        let mut filters = Vec::new();
        if let Some(state) = self.state.filter(|s| !s.is_empty()) {
            filters.push(InstanceFilter {
                name: "instance-state-name".to_string(),
                values: vec![state],
            });
        }
        if let (Some(key), Some(value)) = (
            self.tag_key.filter(|k| !k.is_empty()),
            self.tag_value.filter(|v| !v.is_empty()),
        ) {
            filters.push(InstanceFilter {
                name: format!("tag:{}", key),
                values: vec![value],
            });
        }

        DescribeInstancesRequest {
            filters,
            max_results: self.max_results.filter(|n| *n > 0),
        }
    }
}

#[derive(Debug, Serialize)]
struct ListInstancesOutput {
    count: usize,
    instances: Vec<InstanceSummary>,
}

pub struct ListInstancesTool {
    client: Arc<dyn Ec2Api>,
}

impl ListInstancesTool {
    pub fn new(client: Arc<dyn Ec2Api>) -> Self {
        Self { client }
    }
}

impl Tool for ListInstancesTool {
    type Input = ListInstancesInput;

    fn name(&self) -> &str {
        "ec2_list_instances"
    }

    fn description(&self) -> &str {
        "List EC2 instances. Optionally filter by state (running, stopped, etc.) or by a tag name/value."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let instances = self.client.describe_instances(input.into_request()).await?;

        Ok(ToolResult::json(ListInstancesOutput {
            count: instances.len(),
            instances,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Timestamp;
    use crate::ec2::fake::FakeEc2;
    use serde_json::json;

    fn instance() -> InstanceSummary {
        InstanceSummary {
            instance_id: Some("i-0abc".into()),
            state: Some("running".into()),
            instance_type: Some("t3.micro".into()),
            launch_time: Timestamp::from_millis(1_704_067_200_000),
            public_ip: None,
            private_ip: Some("10.0.0.4".into()),
            name: Some("web-1".into()),
            tags: [("Name".to_string(), "web-1".to_string()), ("env".to_string(), "prod".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_request_filters() {
        let request = ListInstancesInput {
            state: Some("stopped".into()),
            tag_key: Some("env".into()),
            tag_value: Some("prod".into()),
            max_results: Some(10),
        }
        .into_request();

        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.filters[0].name, "instance-state-name");
        assert_eq!(request.filters[0].values, vec!["stopped"]);
        assert_eq!(request.filters[1].name, "tag:env");
        assert_eq!(request.max_results, Some(10));
    }

    #[test]
    fn test_tag_value_without_key_is_ignored() {
        let request = ListInstancesInput {
            tag_value: Some("prod".into()),
            ..Default::default()
        }
        .into_request();

        assert!(request.filters.is_empty());
        assert_eq!(request.max_results, None);
    }

    #[tokio::test]
    async fn test_payload_shape() {
        let fake = Arc::new(FakeEc2 {
            instances: vec![instance()],
            ..Default::default()
        });
        let tool = ListInstancesTool::new(fake.clone());

        let result = tool.execute(ListInstancesInput::default()).await.unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({
                "count": 1,
                "instances": [{
                    "InstanceId": "i-0abc",
                    "State": "running",
                    "Type": "t3.micro",
                    "LaunchTime": "2024-01-01T00:00:00.000Z",
                    "PublicIp": null,
                    "PrivateIp": "10.0.0.4",
                    "Name": "web-1",
                    "Tags": {"Name": "web-1", "env": "prod"},
                }]
            })
        );
        assert_eq!(fake.describe_requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let tool = ListInstancesTool::new(Arc::new(FakeEc2::default()));
        let result = tool.execute(ListInstancesInput::default()).await.unwrap();

        assert_eq!(result.as_json().unwrap(), &json!({"count": 0, "instances": []}));
    }
}
