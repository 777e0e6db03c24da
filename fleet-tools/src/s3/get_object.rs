use std::sync::Arc;

use crate::convert::Timestamp;
use crate::prelude::*;

use super::S3Api;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetObjectInput {
    /// S3 bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetObjectOutput {
    bucket: String,
    key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<Timestamp>,
    body: String,
}

/// Reads a whole object and returns it as text.
pub struct GetObjectTool {
    client: Arc<dyn S3Api>,
}

impl GetObjectTool {
    pub fn new(client: Arc<dyn S3Api>) -> Self {
        Self { client }
    }
}

impl Tool for GetObjectTool {
    type Input = GetObjectInput;

    fn name(&self) -> &str {
        "s3_get_object"
    }

    fn description(&self) -> &str {
        "Read the contents of a text object from S3. Returns the body as a string."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        let object = self.client.get_object(&input.bucket, &input.key).await?;

        Ok(ToolResult::json(GetObjectOutput {
            bucket: input.bucket,
            key: input.key,
            content_type: object.content_type,
            content_length: object.content_length,
            last_modified: object.last_modified,
            body: object.body,
        })?)
    }
}
