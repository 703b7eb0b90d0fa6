//! Raw HTTP plumbing: one POST, one parsed JSON body.

use crate::api::parse_retry_after_secs;
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Build an HTTP client with the per-request timeout applied.
pub(super) fn build_http_client(timeout: Duration) -> reqwest::Client {
    // Fall back to reqwest defaults if builder creation fails for any reason.
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Send one JSON POST and parse the 200 body.
///
/// Any non-success status becomes `ApiError::Status` carrying the body text
/// and the parsed `Retry-After` header, so the retry policy can act on it.
pub(super) async fn post_json<B, R>(
    http: &reqwest::Client,
    base_url: &str,
    path: &str,
    body: &B,
) -> Result<R, ApiError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let url = format!("{base_url}{path}");
    let response = http.post(&url).json(body).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let retry_after_secs = parse_retry_after_secs(response.headers());
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::status(status, body, retry_after_secs));
    }

    response.json::<R>().await.map_err(ApiError::from)
}
