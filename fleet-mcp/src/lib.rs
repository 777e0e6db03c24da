//! MCP server for fleet's AWS tools.
//!
//! The binary resolves a [`FleetConfig`], registers every enabled service's
//! tools and serves them over stdio with [`FleetServer`].

pub mod server;

pub use server::FleetServer;

use fleet_core::{Dispatcher, RegistryError, ToolRegistry};
use fleet_tools::FleetConfig;

/// Load SDK configuration for `config` and build a dispatcher over every
/// enabled service's tools.
pub async fn build_dispatcher(config: &FleetConfig) -> Result<Dispatcher, RegistryError> {
    let sdk_config = config.load_sdk_config().await;
    let mut builder = ToolRegistry::builder();
    fleet_tools::register_all(&mut builder, config, &sdk_config)?;
    Ok(Dispatcher::new(builder.build()))
}
