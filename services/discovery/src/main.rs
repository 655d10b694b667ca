//! ecs-disco
//!
//! Discovers running ECS tasks and republishes them as Prometheus
//! file-based service discovery targets on a fixed schedule.
//!
//! Exit codes: 10 when the orchestration API denies access, 20 for any
//! other unrecoverable error. The process never exits 0 on its own; it
//! runs until terminated or until a cycle fails.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use disco_discovery::client::EcsClient;
use disco_discovery::config::{Cli, Config};
use disco_discovery::poll;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    // Initialize tracing (RUST_LOG overrides the verbosity flag)
    let default_filter = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!(
        endpoint = %config.endpoint,
        output_file = %config.output_file.display(),
        default_port = config.default_port,
        interval_secs = config.poll_interval.as_secs(),
        "Starting ecs-disco"
    );

    let client = EcsClient::new(&config);

    if let Err(e) = poll::run(&client, &config).await {
        error!(error = %e, "Discovery failed");
        std::process::exit(e.exit_code());
    }
}
