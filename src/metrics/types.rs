use std::time::Duration;

/// Outcome of one request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    /// HTTP status, or 0 when the attempt failed before a response.
    pub status_code: u16,
    pub elapsed: Duration,
    pub content_length: u64,
    /// Failure description; also the key of the error distribution.
    pub error: Option<String>,
}

impl RequestResult {
    #[must_use]
    pub const fn success(status_code: u16, elapsed: Duration, content_length: u64) -> Self {
        Self {
            status_code,
            elapsed,
            content_length,
            error: None,
        }
    }

    #[must_use]
    pub const fn failure(elapsed: Duration, error: String) -> Self {
        Self {
            status_code: 0,
            elapsed,
            content_length: 0,
            error: Some(error),
        }
    }
}
