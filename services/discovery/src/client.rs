//! Orchestration API capability and its HTTP implementation.
//!
//! The discovery core only ever calls the [`EcsApi`] trait: list clusters,
//! list tasks, describe tasks. [`EcsClient`] is the concrete
//! JSON-over-HTTP implementation against an ECS-shaped endpoint. Request
//! signing and credentials are the deployment's concern (an emulator
//! endpoint or a signing egress proxy), not this client's.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use disco_model::Task;

use crate::config::Config;
use crate::error::DiscoveryError;

/// Documented per-call ceiling on describe-task batches.
pub const DESCRIBE_BATCH_LIMIT: usize = 100;

/// The three read-only operations the discovery cycle needs.
#[async_trait]
pub trait EcsApi: Send + Sync {
    /// One page of cluster ARNs.
    async fn list_clusters(
        &self,
        next_token: Option<&str>,
    ) -> Result<ClusterPage, DiscoveryError>;

    /// One page of task ARNs for a cluster.
    async fn list_tasks(
        &self,
        cluster_arn: &str,
        next_token: Option<&str>,
    ) -> Result<TaskArnPage, DiscoveryError>;

    /// Full task records for a batch of ARNs.
    ///
    /// Callers must keep `task_arns` non-empty and within
    /// [`DESCRIBE_BATCH_LIMIT`]; the API rejects empty and oversized calls.
    async fn describe_tasks(
        &self,
        cluster_arn: &str,
        task_arns: &[String],
    ) -> Result<Vec<Task>, DiscoveryError>;
}

/// One page of a ListClusters result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterPage {
    pub cluster_arns: Vec<String>,
    pub next_token: Option<String>,
}

/// One page of a ListTasks result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskArnPage {
    pub task_arns: Vec<String>,
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListClustersRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListTasksRequest<'a> {
    cluster: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_token: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DescribeTasksRequest<'a> {
    cluster: &'a str,
    tasks: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DescribeTasksResponse {
    tasks: Vec<Task>,
}

/// Error body shape the API returns on failed calls.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    #[serde(rename = "__type")]
    kind: String,
    message: String,
}

/// HTTP client for the orchestration API.
pub struct EcsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl EcsClient {
    const TARGET_PREFIX: &'static str = "AmazonEC2ContainerServiceV20141113";

    /// Create a new API client with the configured endpoint and timeout.
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        }
    }

    async fn call<Req, Resp>(&self, operation: &str, request: &Req) -> Result<Resp, DiscoveryError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        debug!(operation, "Calling orchestration API");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{}.{operation}", Self::TARGET_PREFIX))
            .header(CONTENT_TYPE, "application/x-amz-json-1.1")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(operation, status, &body));
        }

        Ok(response.json().await?)
    }
}

/// Map a failed API response onto the error taxonomy. Authorization
/// failures are the one class with their own exit code, so they are
/// detected here at the point of occurrence.
fn classify_api_error(operation: &str, status: StatusCode, body: &str) -> DiscoveryError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    error!(
        operation,
        status = %status,
        kind = %parsed.kind,
        "Orchestration API call failed"
    );

    if parsed.kind.contains("AccessDenied") || status == StatusCode::FORBIDDEN {
        let message = if parsed.message.is_empty() {
            format!("{operation}: {status}")
        } else {
            parsed.message
        };
        return DiscoveryError::AccessDenied { message };
    }

    DiscoveryError::Api {
        message: format!("{operation} failed: {status} - {body}"),
    }
}

#[async_trait]
impl EcsApi for EcsClient {
    async fn list_clusters(
        &self,
        next_token: Option<&str>,
    ) -> Result<ClusterPage, DiscoveryError> {
        self.call("ListClusters", &ListClustersRequest { next_token })
            .await
    }

    async fn list_tasks(
        &self,
        cluster_arn: &str,
        next_token: Option<&str>,
    ) -> Result<TaskArnPage, DiscoveryError> {
        self.call(
            "ListTasks",
            &ListTasksRequest {
                cluster: cluster_arn,
                next_token,
            },
        )
        .await
    }

    async fn describe_tasks(
        &self,
        cluster_arn: &str,
        task_arns: &[String],
    ) -> Result<Vec<Task>, DiscoveryError> {
        let response: DescribeTasksResponse = self
            .call(
                "DescribeTasks",
                &DescribeTasksRequest {
                    cluster: cluster_arn,
                    tasks: task_arns,
                },
            )
            .await?;
        Ok(response.tasks)
    }
}
