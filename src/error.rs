//! Unified error types for the solver client.

use std::fmt;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or parsing configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Toml(e) => write!(f, "toml: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml(e)
    }
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Transport-level errors from the HTTP API layer.
///
/// Service-reported failures (`errorId != 0`) are not errors at this level;
/// they travel back to callers inside the parsed response types so the
/// service diagnostic stays inspectable.
#[derive(Debug)]
pub enum ApiError {
    /// Network / reqwest-level error (connect, timeout, body decode).
    Http(reqwest::Error),
    /// Non-2xx status from the API.
    Status {
        code: u16,
        body: String,
        /// Parsed `Retry-After` header, when the service sent one.
        retry_after_secs: Option<u64>,
    },
    /// A 200 response whose body didn't match the expected shape.
    InvalidResponse(String),
}

impl ApiError {
    /// Build a `Status` error from response parts.
    pub fn status(code: u16, body: String, retry_after_secs: Option<u64>) -> Self {
        Self::Status {
            code,
            body,
            retry_after_secs,
        }
    }

    /// HTTP status code for `Status` errors.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Http(_) | Self::InvalidResponse(_) => None,
        }
    }

    /// Server-requested retry delay, when one accompanied the error.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Status {
                retry_after_secs, ..
            } => *retry_after_secs,
            Self::Http(_) | Self::InvalidResponse(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "http: {e}"),
            Self::Status { code, body, .. } => write!(f, "status {code}: {body}"),
            Self::InvalidResponse(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let e = ConfigError::from(io_err);
        let s = e.to_string();
        assert!(s.starts_with("io:"), "got: {s}");
        assert!(s.contains("file not found"));
    }

    #[test]
    fn config_error_from_toml() {
        let toml_err: toml::de::Error = toml::from_str::<toml::Value>("x = [unclosed").unwrap_err();
        let e = ConfigError::from(toml_err);
        assert!(e.to_string().starts_with("toml:"));
    }

    #[test]
    fn config_error_invalid_message() {
        let e = ConfigError::Invalid("client key missing".into());
        assert_eq!(e.to_string(), "invalid config: client key missing");
    }

    #[test]
    fn status_error_accessors() {
        let e = ApiError::status(503, "overloaded".into(), Some(7));
        assert_eq!(e.status_code(), Some(503));
        assert_eq!(e.retry_after_secs(), Some(7));
        assert_eq!(e.to_string(), "status 503: overloaded");
    }

    #[test]
    fn invalid_response_has_no_status() {
        let e = ApiError::InvalidResponse("truncated body".into());
        assert_eq!(e.status_code(), None);
        assert_eq!(e.retry_after_secs(), None);
        assert_eq!(e.to_string(), "invalid response: truncated body");
    }
}
