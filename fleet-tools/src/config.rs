//! Startup configuration: region and the set of enabled service modules.

use std::fmt;
use std::str::FromStr;

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_types::region::Region;

pub const DEFAULT_REGION: &str = "us-east-1";

/// A service module that can be enabled or disabled at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Sts,
    Ec2,
    S3,
    CloudWatch,
    Lambda,
    Ecs,
    CloudFormation,
}

impl Service {
    /// Every service, in registration order.
    pub const ALL: [Service; 7] = [
        Service::Sts,
        Service::Ec2,
        Service::S3,
        Service::CloudWatch,
        Service::Lambda,
        Service::Ecs,
        Service::CloudFormation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Sts => "sts",
            Service::Ec2 => "ec2",
            Service::S3 => "s3",
            Service::CloudWatch => "cloudwatch",
            Service::Lambda => "lambda",
            Service::Ecs => "ecs",
            Service::CloudFormation => "cloudformation",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown service '{0}'")]
pub struct UnknownService(pub String);

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Service::ALL
            .into_iter()
            .find(|service| service.as_str() == normalized)
            .ok_or(UnknownService(normalized))
    }
}

/// Resolved once at startup and passed to each service module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetConfig {
    pub region: String,
    /// Enabled services, always in registration order.
    pub services: Vec<Service>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            services: Service::ALL.to_vec(),
        }
    }
}

impl FleetConfig {
    /// Read `AWS_REGION` / `AWS_DEFAULT_REGION` and `FLEET_SERVICES`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let region = ["AWS_REGION", "AWS_DEFAULT_REGION"]
            .into_iter()
            .filter_map(&lookup)
            .map(|r| r.trim().to_string())
            .find(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let services = lookup("FLEET_SERVICES")
            .map(|list| parse_services(&list))
            .unwrap_or_else(|| Service::ALL.to_vec());

        Self { region, services }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Replace the enabled set from a comma-separated list.
    pub fn with_services(mut self, list: &str) -> Self {
        self.services = parse_services(list);
        self
    }

    pub fn is_enabled(&self, service: Service) -> bool {
        self.services.contains(&service)
    }

    /// Shared SDK configuration for every service client.
    ///
    /// Credentials come from the default provider chain. SDK retries are
    /// disabled so a transient fault surfaces once.
    pub async fn load_sdk_config(&self) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .retry_config(RetryConfig::disabled())
            .load()
            .await
    }
}

/// Parse a comma-separated service list.
///
/// Unknown names are dropped with a warning. An empty list enables every
/// service. The result follows registration order without duplicates.
pub fn parse_services(list: &str) -> Vec<Service> {
    let mut requested = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match name.parse::<Service>() {
            Ok(service) => requested.push(service),
            Err(err) => log::warn!("{}; ignoring", err),
        }
    }

    if list.trim().is_empty() {
        return Service::ALL.to_vec();
    }

    Service::ALL
        .into_iter()
        .filter(|s| requested.contains(s))
        .collect()
}
