//! S3 buckets and text objects.

mod client;
mod get_object;
mod list_buckets;
mod list_objects;
mod put_object;

pub use client::SdkS3Client;
pub use get_object::GetObjectTool;
pub use list_buckets::ListBucketsTool;
pub use list_objects::ListObjectsTool;
pub use put_object::PutObjectTool;

use std::sync::Arc;

use aws_config::SdkConfig;
use fleet_core::{ProviderError, RegistryError, ToolRegistryBuilder};
use serde::Serialize;

use crate::config::FleetConfig;
use crate::convert::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BucketSummary {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "CreationDate", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListObjectsRequest {
    pub bucket: String,
    pub prefix: Option<String>,
    pub max_keys: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectSummary {
    #[serde(rename = "Key", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "Size", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "LastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectListing {
    pub objects: Vec<ObjectSummary>,
    pub truncated: bool,
}

/// A fetched object with its body decoded as UTF-8.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectContent {
    pub content_type: Option<String>,
    pub content_length: Option<i64>,
    pub last_modified: Option<Timestamp>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: String,
    pub content_type: String,
}

#[async_trait::async_trait]
pub trait S3Api: Send + Sync {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, ProviderError>;

    async fn list_objects(&self, request: ListObjectsRequest)
        -> Result<ObjectListing, ProviderError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectContent, ProviderError>;

    async fn put_object(&self, request: PutObjectRequest) -> Result<(), ProviderError>;
}

pub fn register(
    builder: &mut ToolRegistryBuilder,
    _config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    register_with(builder, Arc::new(SdkS3Client::new(sdk_config)))
}

pub fn register_with(
    builder: &mut ToolRegistryBuilder,
    client: Arc<dyn S3Api>,
) -> Result<(), RegistryError> {
    builder
        .add(ListBucketsTool::new(client.clone()))?
        .add(ListObjectsTool::new(client.clone()))?
        .add(GetObjectTool::new(client.clone()))?
        .add(PutObjectTool::new(client))?;
    Ok(())
}
