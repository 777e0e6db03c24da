use std::sync::Arc;

use crate::prelude::*;

use super::EcsApi;

#[derive(Debug, Serialize)]
struct ClusterRef {
    arn: String,
    name: String,
}

impl ClusterRef {
    fn from_arn(arn: String) -> Self {
        let name = arn.rsplit('/').next().unwrap_or_default().to_string();
        Self { arn, name }
    }
}

#[derive(Debug, Serialize)]
struct ListClustersOutput {
    count: usize,
    clusters: Vec<ClusterRef>,
}

pub struct ListClustersTool {
    client: Arc<dyn EcsApi>,
}

impl ListClustersTool {
    pub fn new(client: Arc<dyn EcsApi>) -> Self {
        Self { client }
    }
}

impl Tool for ListClustersTool {
    type Input = NoInput;

    fn name(&self) -> &str {
        "ecs_list_clusters"
    }

    fn description(&self) -> &str {
        "List ECS clusters in the account."
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        let clusters: Vec<ClusterRef> = self
            .client
            .list_clusters()
            .await?
            .into_iter()
            .map(ClusterRef::from_arn)
            .collect();

        Ok(ToolResult::json(ListClustersOutput {
            count: clusters.len(),
            clusters,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::fake::FakeEcs;
    use serde_json::json;

    #[tokio::test]
    async fn test_cluster_name_is_last_arn_segment() {
        let fake = Arc::new(FakeEcs {
            clusters: vec![
                "arn:aws:ecs:us-east-1:123456789012:cluster/prod".into(),
                "arn:aws:ecs:us-east-1:123456789012:cluster/team/staging".into(),
            ],
            ..Default::default()
        });
        let tool = ListClustersTool::new(fake);

        let result = tool.execute(NoInput::default()).await.unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({
                "count": 2,
                "clusters": [
                    {"arn": "arn:aws:ecs:us-east-1:123456789012:cluster/prod", "name": "prod"},
                    {"arn": "arn:aws:ecs:us-east-1:123456789012:cluster/team/staging", "name": "staging"},
                ]
            })
        );
    }

    #[test]
    fn test_arn_without_slash_is_its_own_name() {
        let cluster = ClusterRef::from_arn("default".into());
        assert_eq!(cluster.name, "default");
    }
}
