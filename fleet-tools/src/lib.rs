//! AWS tools for fleet.
//!
//! Each service module owns a client trait, an SDK-backed implementation of
//! it and the tools built on top. [`register_all`] adds the tools of every
//! enabled module to a registry builder in a fixed order.

pub mod cloudformation;
pub mod cloudwatch;
pub mod config;
pub mod convert;
pub(crate) mod error;
pub mod ec2;
pub mod ecs;
pub mod lambda;
pub mod s3;
pub mod sts;

use aws_config::SdkConfig;
use fleet_core::{RegistryError, ToolRegistryBuilder};
use schemars::JsonSchema;
use serde::Deserialize;

pub use config::{FleetConfig, Service};

/// Input of tools that take no arguments.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoInput {}

/// Register the tools of every enabled service, in [`Service::ALL`] order.
pub fn register_all(
    builder: &mut ToolRegistryBuilder,
    config: &FleetConfig,
    sdk_config: &SdkConfig,
) -> Result<(), RegistryError> {
    for service in Service::ALL {
        if !config.is_enabled(service) {
            continue;
        }
        log::debug!("Registering {} tools", service);
        match service {
            Service::Sts => sts::register(builder, config, sdk_config)?,
            Service::Ec2 => ec2::register(builder, config, sdk_config)?,
            Service::S3 => s3::register(builder, config, sdk_config)?,
            Service::CloudWatch => cloudwatch::register(builder, config, sdk_config)?,
            Service::Lambda => lambda::register(builder, config, sdk_config)?,
            Service::Ecs => ecs::register(builder, config, sdk_config)?,
            Service::CloudFormation => cloudformation::register(builder, config, sdk_config)?,
        }
    }
    Ok(())
}

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::NoInput;
    pub use fleet_core::{ProviderError, Tool, ToolError, ToolResult};
    pub use schemars::JsonSchema;
    pub use serde::{Deserialize, Serialize};
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_config::retry::RetryConfig;
    use aws_config::BehaviorVersion;
    use aws_types::region::Region;
    use fleet_core::ToolRegistry;

    fn offline_sdk_config() -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .retry_config(RetryConfig::disabled())
            .build()
    }

    fn names(registry: &ToolRegistry) -> Vec<String> {
        registry.list().map(|t| t.name().to_string()).collect()
    }

    #[test]
    fn test_register_all_in_order() {
        let mut builder = ToolRegistry::builder();
        register_all(&mut builder, &FleetConfig::default(), &offline_sdk_config()).unwrap();
        let registry = builder.build();

        assert_eq!(
            names(&registry),
            vec![
                "aws_whoami",
                "ec2_list_instances",
                "ec2_manage_instance",
                "s3_list_buckets",
                "s3_list_objects",
                "s3_get_object",
                "s3_put_object",
                "cloudwatch_list_alarms",
                "cloudwatch_get_metric",
                "cloudwatch_list_log_groups",
                "cloudwatch_get_logs",
                "lambda_list_functions",
                "lambda_get_function",
                "lambda_invoke",
                "ecs_list_clusters",
                "ecs_list_services",
                "ecs_list_tasks",
                "cfn_list_stacks",
                "cfn_describe_stack",
                "cfn_stack_events",
            ]
        );
    }

    #[test]
    fn test_disabled_services_are_skipped() {
        let config = FleetConfig::default().with_services("ecs, STS");
        let mut builder = ToolRegistry::builder();
        register_all(&mut builder, &config, &offline_sdk_config()).unwrap();

        assert_eq!(
            names(&builder.build()),
            vec![
                "aws_whoami",
                "ecs_list_clusters",
                "ecs_list_services",
                "ecs_list_tasks"
            ]
        );
    }

    #[test]
    fn test_registering_twice_is_a_duplicate() {
        let config = FleetConfig::default().with_services("sts");
        let sdk_config = offline_sdk_config();
        let mut builder = ToolRegistry::builder();
        register_all(&mut builder, &config, &sdk_config).unwrap();

        let err = register_all(&mut builder, &config, &sdk_config).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("aws_whoami".into()));
        assert_eq!(builder.len(), 1);
    }
}
