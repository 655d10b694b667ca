//! Task-to-target transformation.
//!
//! Pure: all I/O stays in the callers, so every property here is testable
//! on plain values.

use std::collections::BTreeMap;

use tracing::debug;

use disco_model::{ConfigItem, Task, TargetLabels};

/// Convert described tasks into file_sd config items.
///
/// Tasks without a private IPv4 address are skipped with a diagnostic; a
/// task with several addressed interfaces takes the last one in
/// container-then-interface order. No deduplication across tasks: two
/// tasks resolving to the same address produce two items.
pub fn to_config_items(
    cluster_tasks: &BTreeMap<String, Vec<Task>>,
    default_port: u16,
) -> Vec<ConfigItem> {
    let mut items = Vec::new();

    for tasks in cluster_tasks.values() {
        for task in tasks {
            let labels = TargetLabels::for_task(task);
            match task.last_private_ipv4() {
                Some(address) => items.push(ConfigItem::new(address, default_port, labels)),
                None => {
                    debug!(
                        task_arn = %labels.task_arn,
                        "Skipping task: no private IPv4 address"
                    );
                }
            }
        }
    }

    items
}
