use std::sync::Arc;

use crate::prelude::*;

use super::{BucketSummary, S3Api};

#[derive(Debug, Serialize)]
struct ListBucketsOutput {
    count: usize,
    buckets: Vec<BucketSummary>,
}

pub struct ListBucketsTool {
    client: Arc<dyn S3Api>,
}

impl ListBucketsTool {
    pub fn new(client: Arc<dyn S3Api>) -> Self {
        Self { client }
    }
}

impl Tool for ListBucketsTool {
    type Input = NoInput;

    fn name(&self) -> &str {
        "s3_list_buckets"
    }

    fn description(&self) -> &str {
        "List all S3 buckets in the account."
    }

    async fn execute(&self, _input: Self::Input) -> Result<ToolResult, ToolError> {
        let buckets = self.client.list_buckets().await?;

        Ok(ToolResult::json(ListBucketsOutput {
            count: buckets.len(),
            buckets,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Timestamp;
    use crate::s3::fake::FakeS3;
    use serde_json::json;

    #[tokio::test]
    async fn test_list_buckets() {
        let tool = ListBucketsTool::new(Arc::new(FakeS3 {
            buckets: vec![BucketSummary {
                name: Some("logs".into()),
                creation_date: Timestamp::from_millis(0),
            }],
            ..Default::default()
        }));

        let result = tool.execute(NoInput::default()).await.unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({
                "count": 1,
                "buckets": [{"Name": "logs", "CreationDate": "1970-01-01T00:00:00.000Z"}]
            })
        );
    }

    #[tokio::test]
    async fn test_no_buckets() {
        let tool = ListBucketsTool::new(Arc::new(FakeS3::default()));
        let result = tool.execute(NoInput::default()).await.unwrap();
        assert_eq!(result.as_json().unwrap(), &json!({"count": 0, "buckets": []}));
    }
}
