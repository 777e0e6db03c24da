use aws_config::SdkConfig;
use aws_sdk_s3::primitives::ByteStream;
use fleet_core::ProviderError;

use super::{
    BucketSummary, ListObjectsRequest, ObjectContent, ObjectListing, ObjectSummary,
    PutObjectRequest, S3Api,
};
use crate::convert::{text, timestamp, IntoOption};
use crate::error::classify_sdk_error;

/// [`S3Api`] over the AWS SDK.
pub struct SdkS3Client {
    client: aws_sdk_s3::Client,
}

impl SdkS3Client {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
        }
    }
}

#[async_trait::async_trait]
impl S3Api for SdkS3Client {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, ProviderError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .buckets()
            .iter()
            .map(|b| BucketSummary {
                name: text(b.name()),
                creation_date: timestamp(b.creation_date()),
            })
            .collect())
    }

    async fn list_objects(
        &self,
        request: ListObjectsRequest,
    ) -> Result<ObjectListing, ProviderError> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(request.bucket)
            .set_prefix(request.prefix)
            .max_keys(request.max_keys)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let objects = output
            .contents()
            .iter()
            .map(|o| ObjectSummary {
                key: text(o.key()),
                size: o.size().into_option(),
                last_modified: timestamp(o.last_modified()),
            })
            .collect();

        Ok(ObjectListing {
            objects,
            truncated: output.is_truncated().into_option().unwrap_or(false),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectContent, ProviderError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let content_type = text(output.content_type());
        let content_length = output.content_length().into_option();
        let last_modified = timestamp(output.last_modified());

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to read object body: {}", e)))?
            .into_bytes();

        Ok(ObjectContent {
            content_type,
            content_length,
            last_modified,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    async fn put_object(&self, request: PutObjectRequest) -> Result<(), ProviderError> {
        self.client
            .put_object()
            .bucket(request.bucket)
            .key(request.key)
            .content_type(request.content_type)
            .body(ByteStream::from(request.body.into_bytes()))
            .send()
            .await
            .map_err(classify_sdk_error)?;
        Ok(())
    }
}
