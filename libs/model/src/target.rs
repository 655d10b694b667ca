//! Output types for the Prometheus file_sd discovery file.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// One element of the published discovery file.
///
/// `targets` always holds exactly one `"ip:port"` entry; file_sd allows more
/// but this tool maps one task to one scrape target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigItem {
    pub targets: Vec<String>,
    pub labels: TargetLabels,
}

impl ConfigItem {
    pub fn new(address: &str, port: u16, labels: TargetLabels) -> Self {
        Self {
            targets: vec![format!("{address}:{port}")],
            labels,
        }
    }
}

/// The fixed label set attached to every target.
///
/// The key set is part of the published file format and never shrinks: a
/// field the API omitted is published as `""` rather than dropped, so
/// downstream relabeling rules can rely on every key being present. The
/// `launchtype` key (no capital T) is likewise frozen by the format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetLabels {
    pub cluster_arn: String,
    pub task_arn: String,
    pub task_definition_arn: String,
    pub last_status: String,
    pub cpu: String,
    pub memory: String,
    pub started_by: String,
    pub group: String,
    #[serde(rename = "launchtype")]
    pub launch_type: String,
}

impl TargetLabels {
    /// Project a task's attributes into the label set, substituting the
    /// empty string for anything absent.
    pub fn for_task(task: &Task) -> Self {
        fn label(value: &Option<String>) -> String {
            value.clone().unwrap_or_default()
        }

        Self {
            cluster_arn: label(&task.cluster_arn),
            task_arn: label(&task.task_arn),
            task_definition_arn: label(&task.task_definition_arn),
            last_status: label(&task.last_status),
            cpu: label(&task.cpu),
            memory: label(&task.memory),
            started_by: label(&task.started_by),
            group: label(&task.group),
            launch_type: label(&task.launch_type),
        }
    }
}
