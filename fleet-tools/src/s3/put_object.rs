use std::sync::Arc;

use crate::prelude::*;

use super::{PutObjectRequest, S3Api};

const DEFAULT_CONTENT_TYPE: &str = "text/plain";

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PutObjectInput {
    /// S3 bucket name
    pub bucket: String,
    /// Object key
    pub key: String,
    /// Text content to write
    pub body: String,
    /// Content-Type (default text/plain)
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutObjectOutput {
    bucket: String,
    key: String,
    status: &'static str,
    size: usize,
}

pub struct PutObjectTool {
    client: Arc<dyn S3Api>,
}

impl PutObjectTool {
    pub fn new(client: Arc<dyn S3Api>) -> Self {
        Self { client }
    }
}

impl Tool for PutObjectTool {
    type Input = PutObjectInput;

    fn name(&self) -> &str {
        "s3_put_object"
    }

    fn description(&self) -> &str {
        "Write text content to an S3 object."
    }

    async fn execute(&self, input: Self::Input) -> Result<ToolResult, ToolError> {
        // Byte length, not character count.
        let size = input.body.len();
        let content_type = input
            .content_type
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

        self.client
            .put_object(PutObjectRequest {
                bucket: input.bucket.clone(),
                key: input.key.clone(),
                body: input.body,
                content_type,
            })
            .await?;

        Ok(ToolResult::json(PutObjectOutput {
            bucket: input.bucket,
            key: input.key,
            status: "written",
            size,
        })?)
    }
}
