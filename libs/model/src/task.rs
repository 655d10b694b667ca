//! Wire types for task records returned by the orchestration API.

use serde::Deserialize;

/// One running task, as returned by a describe call.
///
/// All scalar attributes are optional: the API omits fields depending on
/// launch type and task state, and an absent attribute becomes an empty
/// string when projected into labels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    pub cluster_arn: Option<String>,
    pub task_arn: Option<String>,
    pub task_definition_arn: Option<String>,
    pub last_status: Option<String>,
    pub cpu: Option<String>,
    pub memory: Option<String>,
    pub started_by: Option<String>,
    pub group: Option<String>,
    pub launch_type: Option<String>,
    pub containers: Vec<Container>,
}

impl Task {
    /// The task's scrape address: the private IPv4 of the *last* network
    /// interface that carries one, scanning containers in order and each
    /// container's interfaces in order.
    ///
    /// Last-writer-wins is the documented tie-break for multi-interface
    /// tasks, not a precedence rule. Returns `None` when no interface has a
    /// private IPv4 address.
    pub fn last_private_ipv4(&self) -> Option<&str> {
        let mut address = None;
        for container in &self.containers {
            for interface in &container.network_interfaces {
                if let Some(ip) = &interface.private_ipv4_address {
                    address = Some(ip.as_str());
                }
            }
        }
        address
    }
}

/// One container within a task.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    pub network_interfaces: Vec<NetworkInterface>,
}

/// An attached network interface. The private IPv4 address is absent for
/// interfaces that only carry IPv6 or are still provisioning.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    pub private_ipv4_address: Option<String>,
}
