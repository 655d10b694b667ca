//! Cluster and task enumeration.
//!
//! Everything here is rebuilt from the API on every cycle; nothing is
//! cached. Any failed call aborts the whole enumeration.

use std::collections::BTreeMap;

use tracing::{debug, info};

use disco_model::Task;

use crate::client::{EcsApi, DESCRIBE_BATCH_LIMIT};
use crate::error::DiscoveryError;

/// Enumerate every cluster and fully describe every task in it.
///
/// The map is keyed by cluster ARN (BTreeMap keeps iteration
/// deterministic); each value holds the cluster's tasks in listing order,
/// possibly empty.
pub async fn list_cluster_tasks(
    api: &dyn EcsApi,
) -> Result<BTreeMap<String, Vec<Task>>, DiscoveryError> {
    let cluster_arns = list_all_clusters(api).await?;

    let mut cluster_tasks = BTreeMap::new();
    for cluster_arn in cluster_arns {
        info!(cluster_arn = %cluster_arn, "Enumerating cluster");
        let tasks = list_and_describe_tasks(api, &cluster_arn).await?;
        cluster_tasks.insert(cluster_arn, tasks);
    }

    Ok(cluster_tasks)
}

async fn list_all_clusters(api: &dyn EcsApi) -> Result<Vec<String>, DiscoveryError> {
    let mut cluster_arns = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = api.list_clusters(next_token.as_deref()).await?;
        cluster_arns.extend(page.cluster_arns);
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }

    Ok(cluster_arns)
}

async fn list_and_describe_tasks(
    api: &dyn EcsApi,
    cluster_arn: &str,
) -> Result<Vec<Task>, DiscoveryError> {
    let mut tasks = Vec::new();
    let mut next_token: Option<String> = None;

    loop {
        let page = api.list_tasks(cluster_arn, next_token.as_deref()).await?;
        // The API rejects describe calls with zero IDs; an empty page
        // simply contributes nothing.
        if !page.task_arns.is_empty() {
            tasks.extend(describe_all(api, cluster_arn, &page.task_arns).await?);
        }
        next_token = page.next_token;
        if next_token.is_none() {
            break;
        }
    }

    Ok(tasks)
}

/// Describe `task_arns` in batches of at most [`DESCRIBE_BATCH_LIMIT`],
/// concatenating results in chunk order.
///
/// Chunking is enforced here regardless of input size; callers never need
/// to pre-split. A failed chunk aborts the whole describe with no partial
/// result.
pub async fn describe_all(
    api: &dyn EcsApi,
    cluster_arn: &str,
    task_arns: &[String],
) -> Result<Vec<Task>, DiscoveryError> {
    let mut tasks = Vec::with_capacity(task_arns.len());

    for chunk in task_arns.chunks(DESCRIBE_BATCH_LIMIT) {
        let described = api.describe_tasks(cluster_arn, chunk).await?;
        debug!(
            cluster_arn = %cluster_arn,
            requested = chunk.len(),
            described = described.len(),
            "Described task batch"
        );
        tasks.extend(described);
    }

    Ok(tasks)
}
