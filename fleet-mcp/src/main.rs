use anyhow::Context;
use clap::{Parser, Subcommand};
use fleet_mcp::{build_dispatcher, FleetServer};
use fleet_tools::FleetConfig;
use rmcp::ServiceExt;
use tracing_subscriber::{fmt, EnvFilter};

/// AWS account inspection and management tools over MCP
#[derive(Parser)]
#[command(name = "fleet")]
#[command(version)]
#[command(about = "Serve AWS inspection and management tools over MCP")]
struct Cli {
    /// AWS region (overrides AWS_REGION / AWS_DEFAULT_REGION)
    #[arg(long, global = true)]
    region: Option<String>,

    /// Comma-separated services to enable (overrides FLEET_SERVICES)
    #[arg(long, global = true)]
    services: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (default)
    Mcp,
}

impl Cli {
    fn config(&self) -> FleetConfig {
        let mut config = FleetConfig::from_env();
        if let Some(region) = &self.region {
            config = config.with_region(region.trim());
        }
        if let Some(services) = &self.services {
            config = config.with_services(services);
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries protocol frames
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = cli.config();
    match cli.command.unwrap_or(Commands::Mcp) {
        Commands::Mcp => serve(config).await,
    }
}

async fn serve(config: FleetConfig) -> anyhow::Result<()> {
    let dispatcher = build_dispatcher(&config)
        .await
        .context("Failed to register tools")?;
    log::info!(
        "fleet serving {} tools (region {}, services {})",
        dispatcher.registry().len(),
        config.region,
        config
            .services
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    );

    let service = FleetServer::new(dispatcher)
        .serve(rmcp::transport::stdio())
        .await
        .context("Failed to start MCP server")?;
    service.waiting().await?;
    Ok(())
}
