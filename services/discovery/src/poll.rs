//! The poll loop: one discovery cycle per tick.
//!
//! Fail-fast by design: any error ends the loop immediately and the
//! process exits with a classified status. No retry, no backoff — the
//! supervisor restarts the whole program and the next cycle rebuilds
//! everything from the API. A failed cycle never touches the previously
//! published file because the writer only runs after extraction succeeds.

use tracing::{debug, info};

use crate::client::EcsApi;
use crate::config::Config;
use crate::error::DiscoveryError;
use crate::{discovery, extract, persistence};

/// Run discovery cycles forever, sleeping `poll_interval` between them.
pub async fn run(api: &dyn EcsApi, config: &Config) -> Result<(), DiscoveryError> {
    loop {
        run_cycle(api, config).await?;
        debug!(
            seconds = config.poll_interval.as_secs(),
            "Sleeping before next run"
        );
        tokio::time::sleep(config.poll_interval).await;
    }
}

/// One discovery cycle: enumerate, transform, publish.
pub async fn run_cycle(api: &dyn EcsApi, config: &Config) -> Result<(), DiscoveryError> {
    let cluster_tasks = discovery::list_cluster_tasks(api).await?;
    let items = extract::to_config_items(&cluster_tasks, config.default_port);
    persistence::write_targets(&config.output_file, &items)?;

    info!(
        cluster_count = cluster_tasks.len(),
        target_count = items.len(),
        "Published discovery targets"
    );

    Ok(())
}
