use std::sync::Arc;

use crate::prelude::*;

use super::{ListObjectsRequest, ObjectSummary, S3Api};

const DEFAULT_MAX_KEYS: i32 = 100;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsInput {
    /// S3 bucket name
    pub bucket: String,
    /// Key prefix to filter by
    #[serde(default)]
    pub prefix: Option<String>,
    /// Max keys to return (default 100)
    #[serde(default)]
    pub max_keys: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ListObjectsOutput {
    bucket: String,
    prefix: String,
    count: usize,
    truncated: bool,
    objects: Vec<ObjectSummary>,
}

pub struct ListObjectsTool {
    client: Arc<dyn S3Api>,
}

impl ListObjectsTool {
    pub fn new(client: Arc<dyn S3Api>) -> Self {
        Self { client }
    }
}

impl Tool for ListObjectsTool {
    type Input = ListObjectsInput;

    fn name(&self) -> &str {
        "s3_list_objects"
    }

    fn description(&self) -> &str {
        "List objects in an S3 bucket, optionally filtered by prefix."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let prefix = input.prefix.filter(|p| !p.is_empty());
        let listing = self
            .client
            .list_objects(ListObjectsRequest {
                bucket: input.bucket.clone(),
                prefix: prefix.clone(),
                max_keys: input.max_keys.filter(|n| *n > 0).unwrap_or(DEFAULT_MAX_KEYS),
            })
            .await?;

        Ok(ToolResult::json(ListObjectsOutput {
            bucket: input.bucket,
            prefix: prefix.unwrap_or_default(),
            count: listing.objects.len(),
            truncated: listing.truncated,
            objects: listing.objects,
        })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::fake::FakeS3;
    use crate::s3::ObjectListing;
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults() {
        let fake = Arc::new(FakeS3::default());
        let tool = ListObjectsTool::new(fake.clone());

        let result = tool
            .execute(ListObjectsInput {
                bucket: "logs".into(),
                prefix: None,
                max_keys: None,
            })
            .await
            .unwrap();

        assert_eq!(
            result.as_json().unwrap(),
            &json!({"bucket": "logs", "prefix": "", "count": 0, "truncated": false, "objects": []})
        );
        let requests = fake.list_requests.lock().unwrap();
        assert_eq!(
            requests[0],
            ListObjectsRequest {
                bucket: "logs".into(),
                prefix: None,
                max_keys: 100,
            }
        );
    }

    #[tokio::test]
    async fn test_prefix_and_truncation() {
        let fake = Arc::new(FakeS3 {
            listing: ObjectListing {
                objects: vec![ObjectSummary {
                    key: Some("2024/app.log".into()),
                    size: Some(2048),
                    last_modified: None,
                }],
                truncated: true,
            },
            ..Default::default()
        });
        let tool = ListObjectsTool::new(fake.clone());

        let result = tool
            .execute(ListObjectsInput {
                bucket: "logs".into(),
                prefix: Some("2024/".into()),
                max_keys: Some(1),
            })
            .await
            .unwrap();

        let payload = result.as_json().unwrap();
        assert_eq!(payload["prefix"], "2024/");
        assert_eq!(payload["truncated"], true);
        assert_eq!(payload["objects"][0], json!({"Key": "2024/app.log", "Size": 2048}));
        assert_eq!(fake.list_requests.lock().unwrap()[0].max_keys, 1);
    }
}
