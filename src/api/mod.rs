//! HTTP client for the captcha-solving service API.
//!
//! The API layer is split into cohesive modules:
//! - `client`: endpoint dispatch plus transport-level retry orchestration.
//! - `client::transport`: raw POST-JSON-parse-JSON plumbing.
//! - `client::retry`: the bounded retry policy for transient failures.

use crate::error::ApiError;
use crate::types::{ResultQuery, TaskCreationResult, TaskEnvelope, TaskResult};
use async_trait::async_trait;

mod client;

pub use client::ApiClient;

/// Minimal service interface consumed by the solve lifecycle.
///
/// This trait lets tests drive the submit/poll engine with deterministic
/// scripted responses while the production path uses [`ApiClient`].
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Submit one task-creation request.
    async fn create_task(&self, envelope: &TaskEnvelope) -> Result<TaskCreationResult, ApiError>;

    /// Request the current result for a created task.
    async fn task_result(&self, query: &ResultQuery) -> Result<TaskResult, ApiError>;
}

/// Parse a `Retry-After` header into whole seconds.
///
/// Accepts both the delta-seconds and HTTP-date forms; a date already in the
/// past counts as zero.
pub(crate) fn parse_retry_after_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let raw = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(secs);
    }
    let when = httpdate::parse_http_date(raw).ok()?;
    Some(
        when.duration_since(std::time::SystemTime::now())
            .map(|delta| delta.as_secs())
            .unwrap_or(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn parses_delta_seconds_form() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("12"));
        assert_eq!(parse_retry_after_secs(&headers), Some(12));
    }

    #[test]
    fn parses_http_date_form() {
        let future = std::time::SystemTime::now() + std::time::Duration::from_secs(90);
        let formatted = httpdate::fmt_http_date(future);
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(&formatted).unwrap());
        let secs = parse_retry_after_secs(&headers).expect("parse");
        assert!((85..=90).contains(&secs), "got: {secs}");
    }

    #[test]
    fn past_http_date_clamps_to_zero() {
        let past = std::time::SystemTime::now() - std::time::Duration::from_secs(90);
        let formatted = httpdate::fmt_http_date(past);
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_str(&formatted).unwrap());
        assert_eq!(parse_retry_after_secs(&headers), Some(0));
    }

    #[test]
    fn missing_or_garbage_header_is_none() {
        assert_eq!(parse_retry_after_secs(&HeaderMap::new()), None);
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon-ish"));
        assert_eq!(parse_retry_after_secs(&headers), None);
    }
}
