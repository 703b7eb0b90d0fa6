//! Data model for the captcha-solving service wire protocol.
//!
//! These types serialize/deserialize directly to/from the flat JSON payloads
//! exchanged with the `createTask` / `getTaskResult` endpoints. Absent fields
//! decode to `None`/zero equivalents and are omitted again on encode, so a
//! decode/encode round trip preserves exactly what the service sent.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Task creation
// ---------------------------------------------------------------------------

/// Outbound body for `POST /createTask`.
///
/// Built fresh for every solve call and discarded once the call returns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskEnvelope {
    /// Account credential; opaque to this crate.
    pub client_key: String,

    /// Task-type-specific fields, including the `type` discriminator.
    pub task: Value,

    /// Attribution id of this client library.
    pub soft_id: u32,

    /// When set, the service pushes the result to this URL and the client
    /// never polls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Response body from `POST /createTask`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskCreationResult {
    /// `0` means the task was accepted; any other value is a service-reported
    /// failure described by `error_code`/`error_description`.
    #[serde(default)]
    pub error_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// Identifier assigned by the service. Present exactly when
    /// `error_id == 0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
}

impl TaskCreationResult {
    /// Whether the service accepted the task and issued a `task_id`.
    pub fn is_accepted(&self) -> bool {
        self.error_id == 0 && self.task_id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Result polling
// ---------------------------------------------------------------------------

/// Outbound body for `POST /getTaskResult`.
///
/// Constructed once per solve and reused verbatim for every poll attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultQuery {
    /// Account credential; opaque to this crate.
    pub client_key: String,
    /// Identifier returned by task creation.
    pub task_id: u64,
}

/// Task progress as reported by the result endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Still being solved; poll again later.
    Processing,
    /// Solved; `solution` carries the answer.
    Ready,
    /// Failed; details in the error fields.
    Error,
}

/// Response body from `POST /getTaskResult`.
///
/// The service may omit `status` entirely and imply failure through a
/// nonzero `error_id`. Bookkeeping fields (`cost`, `ip`, timestamps,
/// `solve_count`) pass through unmodified.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    #[serde(default)]
    pub error_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,

    /// Free-form solution mapping; shape depends on the captcha type and is
    /// meaningful only once `status` is `ready`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Value>,

    /// Price charged for the solve, as reported by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,

    /// Worker IP that produced the solution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solve_count: Option<u32>,

    /// Echoed task identifier. The polling loop stamps it from the query
    /// when the service leaves it out, so callers can always correlate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<u64>,
}

impl TaskResult {
    /// Whether the task is still being solved.
    ///
    /// The polling loop terminates exactly when this returns false: either
    /// the service reported an error or the status moved off `processing`.
    pub fn is_processing(&self) -> bool {
        self.error_id == 0 && self.status == Some(TaskStatus::Processing)
    }

    /// Fetch one field out of the solution mapping.
    pub fn solution_field(&self, key: &str) -> Option<&Value> {
        self.solution.as_ref().and_then(|s| s.get(key))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
