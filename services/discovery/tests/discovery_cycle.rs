//! Full-cycle tests against an in-memory orchestration API.
//!
//! Covers enumeration, describe batching, extraction, and the published
//! file, without any network involvement.

use std::collections::BTreeMap;
use std::env::temp_dir;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use disco_discovery::client::{ClusterPage, EcsApi, TaskArnPage, DESCRIBE_BATCH_LIMIT};
use disco_discovery::config::Config;
use disco_discovery::error::DiscoveryError;
use disco_discovery::{discovery, poll};
use disco_model::{ConfigItem, Container, NetworkInterface, Task};

/// In-memory orchestration API with configurable page size.
struct FakeApi {
    clusters: BTreeMap<String, Vec<Task>>,
    page_size: usize,
    describe_batch_sizes: Mutex<Vec<usize>>,
    deny_list_clusters: bool,
}

impl FakeApi {
    fn new(clusters: BTreeMap<String, Vec<Task>>) -> Self {
        Self {
            clusters,
            page_size: 100,
            describe_batch_sizes: Mutex::new(Vec::new()),
            deny_list_clusters: false,
        }
    }

    fn describe_batch_sizes(&self) -> Vec<usize> {
        self.describe_batch_sizes.lock().unwrap().clone()
    }

    fn paginate(&self, items: &[String], next_token: Option<&str>) -> (Vec<String>, Option<String>) {
        let start: usize = next_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + self.page_size).min(items.len());
        let token = (end < items.len()).then(|| end.to_string());
        (items[start..end].to_vec(), token)
    }
}

#[async_trait]
impl EcsApi for FakeApi {
    async fn list_clusters(
        &self,
        next_token: Option<&str>,
    ) -> Result<ClusterPage, DiscoveryError> {
        if self.deny_list_clusters {
            return Err(DiscoveryError::AccessDenied {
                message: "not authorized to perform ecs:ListClusters".to_string(),
            });
        }

        let arns: Vec<String> = self.clusters.keys().cloned().collect();
        let (cluster_arns, next_token) = self.paginate(&arns, next_token);
        Ok(ClusterPage {
            cluster_arns,
            next_token,
        })
    }

    async fn list_tasks(
        &self,
        cluster_arn: &str,
        next_token: Option<&str>,
    ) -> Result<TaskArnPage, DiscoveryError> {
        let tasks = self.clusters.get(cluster_arn).ok_or_else(|| {
            DiscoveryError::Api {
                message: format!("unknown cluster {cluster_arn}"),
            }
        })?;
        let arns: Vec<String> = tasks
            .iter()
            .map(|t| t.task_arn.clone().unwrap())
            .collect();

        let (task_arns, next_token) = self.paginate(&arns, next_token);
        Ok(TaskArnPage {
            task_arns,
            next_token,
        })
    }

    async fn describe_tasks(
        &self,
        cluster_arn: &str,
        task_arns: &[String],
    ) -> Result<Vec<Task>, DiscoveryError> {
        assert!(!task_arns.is_empty(), "describe called with zero IDs");
        self.describe_batch_sizes
            .lock()
            .unwrap()
            .push(task_arns.len());

        let tasks = &self.clusters[cluster_arn];
        Ok(task_arns
            .iter()
            .map(|arn| {
                tasks
                    .iter()
                    .find(|t| t.task_arn.as_deref() == Some(arn))
                    .cloned()
                    .unwrap()
            })
            .collect())
    }
}

fn task(arn: &str, ip: Option<&str>) -> Task {
    Task {
        task_arn: Some(arn.to_string()),
        containers: ip
            .map(|ip| {
                vec![Container {
                    network_interfaces: vec![NetworkInterface {
                        private_ipv4_address: Some(ip.to_string()),
                    }],
                }]
            })
            .unwrap_or_default(),
        ..Task::default()
    }
}

fn test_config(name: &str) -> Config {
    Config {
        endpoint: "http://unused.invalid".to_string(),
        output_file: temp_dir().join(format!("ecs-disco-{}-{}.json", name, std::process::id())),
        default_port: 80,
        poll_interval: Duration::from_secs(60),
        request_timeout: Duration::from_secs(5),
    }
}

fn read_items(path: &PathBuf) -> Vec<ConfigItem> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_cycle_publishes_addressed_tasks_and_skips_the_rest() {
    let api = FakeApi::new(BTreeMap::from([(
        "cluster/web".to_string(),
        vec![task("t1", Some("10.0.0.5")), task("t2", None)],
    )]));
    let config = test_config("cycle");

    poll::run_cycle(&api, &config).await.unwrap();

    let items = read_items(&config.output_file);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].targets, vec!["10.0.0.5:80"]);
    assert_eq!(items[0].labels.task_arn, "t1");
    assert_eq!(items[0].labels.cluster_arn, "");

    let _ = fs::remove_file(&config.output_file);
}

#[tokio::test]
async fn test_cycle_is_idempotent() {
    let api = FakeApi::new(BTreeMap::from([(
        "cluster/web".to_string(),
        vec![task("t1", Some("10.0.0.5"))],
    )]));
    let config = test_config("idempotent");

    poll::run_cycle(&api, &config).await.unwrap();
    let first = fs::read(&config.output_file).unwrap();

    poll::run_cycle(&api, &config).await.unwrap();
    let second = fs::read(&config.output_file).unwrap();

    assert_eq!(first, second);
    let _ = fs::remove_file(&config.output_file);
}

#[tokio::test]
async fn test_no_clusters_publishes_empty_array() {
    let api = FakeApi::new(BTreeMap::new());
    let config = test_config("no-clusters");

    poll::run_cycle(&api, &config).await.unwrap();

    assert_eq!(fs::read_to_string(&config.output_file).unwrap(), "[]");
    let _ = fs::remove_file(&config.output_file);
}

#[tokio::test]
async fn test_empty_task_page_never_reaches_describe() {
    let api = FakeApi::new(BTreeMap::from([("cluster/idle".to_string(), vec![])]));
    let config = test_config("idle");

    poll::run_cycle(&api, &config).await.unwrap();

    assert!(api.describe_batch_sizes().is_empty());
    assert_eq!(fs::read_to_string(&config.output_file).unwrap(), "[]");
    let _ = fs::remove_file(&config.output_file);
}

#[tokio::test]
async fn test_cluster_pagination_is_fully_drained() {
    let clusters: BTreeMap<String, Vec<Task>> = (0..5)
        .map(|i| {
            let arn = format!("cluster/c{i}");
            let t = task(&format!("{arn}/task"), Some("10.0.0.1"));
            (arn, vec![t])
        })
        .collect();

    let mut api = FakeApi::new(clusters);
    api.page_size = 2;

    let cluster_tasks = discovery::list_cluster_tasks(&api).await.unwrap();
    assert_eq!(cluster_tasks.len(), 5);
    assert!(cluster_tasks.values().all(|tasks| tasks.len() == 1));
}

#[tokio::test]
async fn test_describe_batches_never_exceed_the_limit() {
    let arns: Vec<String> = (0..250).map(|i| format!("task/t{i:03}")).collect();
    let tasks: Vec<Task> = arns
        .iter()
        .enumerate()
        .map(|(i, arn)| task(arn, Some(&format!("10.0.{}.{}", i / 250, i % 250))))
        .collect();

    let api = FakeApi::new(BTreeMap::from([("cluster/big".to_string(), tasks)]));

    let described = discovery::describe_all(&api, "cluster/big", &arns)
        .await
        .unwrap();

    assert_eq!(api.describe_batch_sizes(), vec![100, 100, 50]);
    assert!(api
        .describe_batch_sizes()
        .iter()
        .all(|&len| len <= DESCRIBE_BATCH_LIMIT));

    // Complete and in listing order.
    let described_arns: Vec<&str> = described
        .iter()
        .map(|t| t.task_arn.as_deref().unwrap())
        .collect();
    assert_eq!(described_arns, arns.iter().map(String::as_str).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_access_denied_leaves_previous_file_untouched() {
    let config = test_config("denied");

    // A prior successful cycle published this file.
    let good_api = FakeApi::new(BTreeMap::from([(
        "cluster/web".to_string(),
        vec![task("t1", Some("10.0.0.5"))],
    )]));
    poll::run_cycle(&good_api, &config).await.unwrap();
    let published = fs::read(&config.output_file).unwrap();

    let mut denied_api = FakeApi::new(BTreeMap::new());
    denied_api.deny_list_clusters = true;

    let err = poll::run_cycle(&denied_api, &config).await.unwrap_err();
    assert_eq!(err.exit_code(), 10);
    assert_eq!(fs::read(&config.output_file).unwrap(), published);

    let _ = fs::remove_file(&config.output_file);
}
