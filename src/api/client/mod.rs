//! Endpoint dispatch for the task-creation and result APIs.
//!
//! The client facade here intentionally remains small:
//! - request/parse plumbing is delegated to `transport`.
//! - retry policy logic is delegated to `retry`.
//!
//! Both endpoints share one retry-wrapped send path, so callers see either a
//! parsed response or a propagated transport failure, never the retry
//! mechanics themselves.

mod retry;
mod transport;

use super::TaskService;
use crate::error::ApiError;
use crate::types::{ResultQuery, TaskCreationResult, TaskEnvelope, TaskResult};
use async_trait::async_trait;
use retry::RetryPolicy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

/// Path of the task-creation endpoint, relative to the base URL.
const CREATE_TASK_PATH: &str = "/createTask";
/// Path of the result endpoint, relative to the base URL.
const TASK_RESULT_PATH: &str = "/getTaskResult";

/// HTTP client bound to one service base URL.
///
/// Cheap to construct; the solve lifecycle builds one per solve operation so
/// the underlying network session never outlives the call that opened it.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    retry_policy: RetryPolicy,
}

impl ApiClient {
    /// Build a client for `base_url` with the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self::with_retry_policy(base_url, timeout, RetryPolicy::default())
    }

    fn with_retry_policy(base_url: &str, timeout: Duration, retry_policy: RetryPolicy) -> Self {
        Self {
            http: transport::build_http_client(timeout),
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_policy,
        }
    }

    /// Submit a task-creation envelope and parse the service verdict.
    pub async fn create_task(
        &self,
        envelope: &TaskEnvelope,
    ) -> Result<TaskCreationResult, ApiError> {
        self.post_with_retries(CREATE_TASK_PATH, envelope).await
    }

    /// Ask for the current result of a created task.
    pub async fn task_result(&self, query: &ResultQuery) -> Result<TaskResult, ApiError> {
        self.post_with_retries(TASK_RESULT_PATH, query).await
    }

    async fn post_with_retries<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut attempt: u32 = 0;
        loop {
            let result = transport::post_json(&self.http, &self.base_url, path, body).await;
            match result {
                Ok(parsed) => return Ok(parsed),
                Err(err) => {
                    if !self.retry_policy.should_retry(&err, attempt) {
                        return Err(err);
                    }
                    let delay = self.retry_policy.retry_delay_for(attempt, &err);
                    tracing::debug!(
                        path,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient transport failure, retrying"
                    );
                    attempt = attempt.saturating_add(1);
                    sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl TaskService for ApiClient {
    async fn create_task(&self, envelope: &TaskEnvelope) -> Result<TaskCreationResult, ApiError> {
        ApiClient::create_task(self, envelope).await
    }

    async fn task_result(&self, query: &ResultQuery) -> Result<TaskResult, ApiError> {
        ApiClient::task_result(self, query).await
    }
}
