//! The shared solve lifecycle: submit a task, then poll until terminal.
//!
//! Every captcha family runs through this one engine; task builders only
//! contribute the payload mapping. The flow is strictly sequential per
//! solve: one creation request, an initial wait, then ordered polls with a
//! fixed interval until the service reports something other than
//! `processing` or the attempt budget runs out. Independent solves share no
//! state and may run concurrently from separate tasks or threads.
//!
//! Cancellation is by composition: the returned future only suspends at
//! sleeps and request awaits, so dropping it (for example through
//! `tokio::time::timeout`) abandons the solve cleanly at the next
//! suspension point.

use crate::api::{ApiClient, TaskService};
use crate::config::Config;
use crate::error::ApiError;
use crate::tasks::CaptchaTask;
use crate::types::{ResultQuery, TaskCreationResult, TaskEnvelope, TaskResult};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

/// Attribution id assigned to this library by the service, attached to every
/// creation envelope.
const SOFT_ID: u32 = 1187;

// ---------------------------------------------------------------------------
// Request / outcome surface
// ---------------------------------------------------------------------------

/// One solve operation's inputs: the task mapping plus per-call overrides.
#[derive(Debug, Clone)]
pub struct SolveRequest {
    task: Value,
    callback_url: Option<String>,
    initial_wait: Option<Duration>,
}

impl SolveRequest {
    /// Wrap a raw task mapping. The mapping must already contain the wire
    /// `type` discriminator.
    pub fn new(task: Value) -> Self {
        Self {
            task,
            callback_url: None,
            initial_wait: None,
        }
    }

    /// Build a request from a typed task, adopting its first-poll delay.
    pub fn from_task<T: CaptchaTask>(task: &T) -> Self {
        Self {
            task: task.to_task_value(),
            callback_url: None,
            initial_wait: Some(task.initial_wait()),
        }
    }

    /// Ask the service to push the result to `url` instead of being polled.
    ///
    /// Callback mode changes the outcome shape: the solve returns
    /// [`SolveOutcome::Deferred`] right after creation succeeds.
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    /// Override the delay before the first result poll.
    pub fn with_initial_wait(mut self, wait: Duration) -> Self {
        self.initial_wait = Some(wait);
        self
    }
}

/// Terminal state of one solve operation.
///
/// The underlying lifecycle is `CREATED → SUBMITTING → {SUBMIT_FAILED |
/// AWAITING_INITIAL_DELAY} → POLLING → {READY | FAILED}`, with a shortcut
/// to `CALLBACK_DEFERRED` when a callback URL is attached. Each variant
/// maps onto the terminal states:
///
/// - [`Finished`](Self::Finished): `READY` or `FAILED`. The full result
///   payload, including service-reported errors, for the caller to inspect.
/// - [`Rejected`](Self::Rejected): `SUBMIT_FAILED`. The creation verdict
///   with its error fields, returned unchanged; no polls were issued.
/// - [`Deferred`](Self::Deferred): `CALLBACK_DEFERRED`. The service will
///   push the result out-of-band; the query handle is returned so the
///   caller can still correlate or poll manually later.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Finished(TaskResult),
    Rejected(TaskCreationResult),
    Deferred(ResultQuery),
}

impl SolveOutcome {
    /// The polled result, when the lifecycle ran to completion.
    pub fn finished(self) -> Option<TaskResult> {
        match self {
            Self::Finished(result) => Some(result),
            Self::Rejected(_) | Self::Deferred(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Asynchronous solve engine bound to one account configuration.
///
/// Construction is cheap and the solver is immutable; clone the config into
/// as many solvers (or share one behind a reference) as needed.
pub struct Solver {
    config: Config,
}

impl Solver {
    /// Build a solver from resolved configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build a solver with built-in defaults and the given credential.
    pub fn from_client_key(client_key: impl Into<String>) -> Self {
        Self::new(Config::with_client_key(client_key))
    }

    /// Solve a typed captcha task.
    pub async fn solve<T: CaptchaTask>(&self, task: &T) -> Result<SolveOutcome, ApiError> {
        self.solve_request(SolveRequest::from_task(task)).await
    }

    /// Run one full solve lifecycle for a prepared request.
    ///
    /// Transport failures surface as `Err` once retries are exhausted;
    /// every service-level verdict comes back inside the outcome.
    pub async fn solve_request(&self, request: SolveRequest) -> Result<SolveOutcome, ApiError> {
        // The network session lives exactly as long as this call; drop
        // releases it on every exit path.
        let client = ApiClient::new(&self.config.api.base_url, self.config.network.api_timeout());
        self.run(&client, request).await
    }

    async fn run(
        &self,
        service: &dyn TaskService,
        request: SolveRequest,
    ) -> Result<SolveOutcome, ApiError> {
        let envelope = TaskEnvelope {
            client_key: self.config.api.client_key.clone(),
            task: request.task,
            soft_id: SOFT_ID,
            callback_url: request.callback_url,
        };

        let created = service.create_task(&envelope).await?;
        if created.error_id != 0 {
            tracing::warn!(
                error_id = created.error_id,
                error_code = created.error_code.as_deref().unwrap_or(""),
                "task creation rejected by service"
            );
            return Ok(SolveOutcome::Rejected(created));
        }
        let Some(task_id) = created.task_id else {
            return Err(ApiError::InvalidResponse(
                "creation response accepted the task but carried no taskId".to_string(),
            ));
        };
        tracing::debug!(task_id, "task created");

        let query = ResultQuery {
            client_key: self.config.api.client_key.clone(),
            task_id,
        };

        // Callback mode: the service pushes the result out-of-band, so the
        // polling half of the lifecycle never runs.
        if envelope.callback_url.is_some() {
            return Ok(SolveOutcome::Deferred(query));
        }

        let initial_wait = request
            .initial_wait
            .unwrap_or_else(|| self.config.polling.initial_wait());
        let result = self.await_result(service, &query, initial_wait).await?;
        Ok(SolveOutcome::Finished(result))
    }

    /// Poll the result endpoint until the task leaves `processing`.
    ///
    /// The query is reused verbatim for every attempt, polls are strictly
    /// sequential, and a service-reported error ends the loop immediately.
    /// If the attempt budget runs out while the task is still processing,
    /// the last processing response is returned intact so the caller can
    /// decide whether that constitutes a timeout.
    async fn await_result(
        &self,
        service: &dyn TaskService,
        query: &ResultQuery,
        initial_wait: Duration,
    ) -> Result<TaskResult, ApiError> {
        // Solving is never instantaneous; polling immediately wastes a
        // round trip.
        sleep(initial_wait).await;

        let poll_interval = self.config.polling.poll_interval();
        let max_polls = self.config.polling.max_polls.max(1);
        let mut attempt: u32 = 1;
        loop {
            let mut result = service.task_result(query).await?;
            if result.task_id.is_none() {
                result.task_id = Some(query.task_id);
            }
            if !result.is_processing() {
                return Ok(result);
            }
            if attempt >= max_polls {
                tracing::warn!(
                    task_id = query.task_id,
                    attempts = max_polls,
                    "poll budget exhausted while task still processing"
                );
                return Ok(result);
            }
            tracing::debug!(task_id = query.task_id, attempt, "task still processing");
            attempt += 1;
            sleep(poll_interval).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
