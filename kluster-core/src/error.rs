use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Possible errors from request construction and body encoding
#[derive(Debug, ThisError)]
pub enum Error {
    /// The caller supplied an invalid argument combination
    ///
    /// Detected before any network call, e.g. an empty name for a get, or a
    /// wildcard cluster on a mutating request.
    #[error("request validation failed: {0}")]
    Validation(String),

    /// Http library failed to build the request
    #[error("failed to build request: {0}")]
    BuildRequest(#[source] http::Error),

    /// Failed to serialize a request body
    #[error("failed to serialize body: {0}")]
    SerializeBody(#[source] serde_json::Error),
}

/// An error response from the API.
///
/// This is the schema of the `Status` object the server returns on failures,
/// and the payload of [`WatchEvent::Error`](crate::WatchEvent::Error).
#[derive(ThisError, Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[error("{message}: {reason}")]
pub struct ErrorResponse {
    /// The status
    pub status: String,
    /// A message about the error
    #[serde(default)]
    pub message: String,
    /// The reason for the error
    #[serde(default)]
    pub reason: String,
    /// The error code
    pub code: u16,
}

#[cfg(test)]
mod tests {
    use super::ErrorResponse;

    const STATUS: &str = r#"
    {
      "kind": "Status",
      "apiVersion": "v1",
      "metadata": {},
      "status": "Failure",
      "message": "rtest.gtest \"missing\" not found",
      "reason": "NotFound",
      "code": 404
    }
    "#;

    #[test]
    fn error_response_parses_status_objects() {
        let e: ErrorResponse = serde_json::from_str(STATUS).unwrap();
        assert_eq!(e.code, 404);
        assert_eq!(e.reason, "NotFound");
    }
}
