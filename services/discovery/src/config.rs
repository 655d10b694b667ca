//! Service configuration.
//!
//! CLI flags carry the knobs an operator tunes per deployment; the API
//! endpoint comes from the environment the way the rest of the AWS tooling
//! resolves it. Precedence for the default metrics port: flag beats
//! `DEFAULT_METRICS_PORT` beats the built-in 80.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// ECS task discovery for Prometheus file-based service discovery.
#[derive(Debug, Parser)]
#[command(name = "ecs-disco", version, about)]
pub struct Cli {
    /// Log at info level instead of warn.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Output file to write Prometheus file_sd configs to.
    #[arg(short = 'f', long = "file", default_value = "ecs-tasks.json")]
    pub file: PathBuf,

    /// Default metrics port.
    #[arg(
        short = 'p',
        long = "port",
        env = "DEFAULT_METRICS_PORT",
        default_value_t = 80
    )]
    pub port: u16,

    /// Poll interval, seconds.
    #[arg(short = 'i', long = "interval", default_value_t = 60)]
    pub interval: u64,

    /// Per-request timeout for orchestration API calls, seconds.
    #[arg(long = "request-timeout", default_value_t = 30)]
    pub request_timeout: u64,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Orchestration API endpoint.
    pub endpoint: String,

    /// Path the discovery file is published to.
    pub output_file: PathBuf,

    /// Port appended to every discovered address.
    pub default_port: u16,

    /// Sleep between discovery cycles.
    pub poll_interval: Duration,

    /// Timeout applied to every API call.
    pub request_timeout: Duration,
}

impl Config {
    /// Merge CLI flags with the environment.
    ///
    /// Endpoint resolution: `ECS_ENDPOINT_URL` wins (emulators, signing
    /// proxies), otherwise the regional endpoint for `AWS_REGION`
    /// (default `us-east-1`).
    pub fn from_cli(cli: &Cli) -> Self {
        let endpoint = std::env::var("ECS_ENDPOINT_URL").unwrap_or_else(|_| {
            let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
            format!("https://ecs.{region}.amazonaws.com")
        });

        Self {
            endpoint,
            output_file: cli.file.clone(),
            default_port: cli.port,
            poll_interval: Duration::from_secs(cli.interval),
            request_timeout: Duration::from_secs(cli.request_timeout),
        }
    }
}
