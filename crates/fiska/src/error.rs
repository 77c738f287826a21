//! Error types for the Fiska client
//!
//! The taxonomy separates transport-level failures (network, timeout,
//! non-2xx), decode failures (response shape mismatch), and trackable-job
//! failures (terminal `error` state, poll deadline), following Rust idioms
//! with the `thiserror` crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::jobs::{Job, JobStatus};

/// Result type alias for operations that can fail with a Fiska client error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Fiska client.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-2xx status.
    ///
    /// When the server returned a structured JSON:API error document it is
    /// carried verbatim in `document` so callers can render diagnostics.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Parsed JSON:API error document, if the body contained one
        document: Option<ErrorDocument>,
        /// Human-readable summary (first error detail, or the raw body)
        message: String,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timed out before a response arrived.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Response shape did not match expectation.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP header name or value.
    #[error("Invalid HTTP header: {0}")]
    InvalidHeader(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// A trackable job reached the `error` terminal state.
    #[error("trackable job {} failed: {}", job.id, job.errors.join("; "))]
    JobFailed {
        /// The job in its terminal state, including the server error list
        job: Job,
    },

    /// A trackable job did not reach a terminal state within the deadline.
    #[error("trackable job {id} timed out after {elapsed:?} (last status: {last_status})")]
    JobTimeout {
        /// Job id that was being polled
        id: String,
        /// Last observed non-terminal status
        last_status: JobStatus,
        /// Time spent polling before giving up
        elapsed: Duration,
    },
}

/// A JSON:API error document: `{"errors": [...]}`.
///
/// Carried verbatim on [`Error::Api`] so the adapter layer can render the
/// server's diagnostics without re-parsing the response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorDocument {
    /// The server-reported error objects.
    pub errors: Vec<ErrorObject>,
}

/// A single member of a JSON:API error document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    /// HTTP status code as a string, per JSON:API convention.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Short, human-readable summary of the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Reference to the offending part of the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

/// The `source` member of a JSON:API error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorSource {
    /// JSON pointer to the offending attribute in the request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    /// Name of the offending query parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl Error {
    /// Build the typed error for a non-2xx response.
    ///
    /// The body is parsed as a JSON:API error document when possible; a
    /// non-conforming body falls back to a plain message.
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorDocument>(body) {
            Ok(document) if !document.errors.is_empty() => {
                let message = document.errors[0]
                    .detail
                    .clone()
                    .or_else(|| document.errors[0].title.clone())
                    .unwrap_or_else(|| format!("HTTP {status}"));
                Error::Api {
                    status,
                    document: Some(document),
                    message,
                }
            }
            _ => Error::Api {
                status,
                document: None,
                message: if body.trim().is_empty() {
                    format!("HTTP {status}")
                } else {
                    body.trim().to_string()
                },
            },
        }
    }

    /// HTTP status code, when this error came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a 404 response.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// True for a 401 response, the trigger for auth-refresh interceptors.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The JSON:API error document from the server, when one was returned.
    pub fn error_document(&self) -> Option<&ErrorDocument> {
        match self {
            Error::Api { document, .. } => document.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_jsonapi_document() {
        let body = r#"{"errors":[{"status":"422","title":"Validation failed","detail":"name can't be blank","source":{"pointer":"/data/attributes/name"}}]}"#;

        let error = Error::from_response(422, body);
        match &error {
            Error::Api {
                status,
                document,
                message,
            } => {
                assert_eq!(*status, 422);
                assert_eq!(message, "name can't be blank");
                let doc = document.as_ref().expect("document should be carried");
                assert_eq!(doc.errors.len(), 1);
                assert_eq!(
                    doc.errors[0].source.as_ref().unwrap().pointer.as_deref(),
                    Some("/data/attributes/name")
                );
            }
            other => panic!("expected Api variant, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_plain_body_fallback() {
        let error = Error::from_response(500, "Internal Server Error");
        match error {
            Error::Api {
                status,
                document,
                message,
            } => {
                assert_eq!(status, 500);
                assert!(document.is_none());
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Api variant, got {other:?}"),
        }
    }

    #[test]
    fn test_from_response_empty_body() {
        let error = Error::from_response(404, "");
        assert_eq!(error.status(), Some(404));
        assert!(error.is_not_found());
        assert!(error.to_string().contains("HTTP 404"));
    }

    #[test]
    fn test_status_helpers() {
        assert!(Error::from_response(401, "").is_unauthorized());
        assert!(!Error::from_response(403, "").is_unauthorized());
        assert_eq!(Error::Connection("reset".into()).status(), None);
        assert_eq!(
            Error::Timeout(Duration::from_secs(30)).status(),
            None
        );
    }

    #[test]
    fn test_job_failed_display() {
        let error = Error::JobFailed {
            job: Job {
                id: "job-9".into(),
                status: JobStatus::Error,
                errors: vec!["template missing".into(), "retry later".into()],
            },
        };
        let rendered = error.to_string();
        assert!(rendered.contains("job-9"));
        assert!(rendered.contains("template missing; retry later"));
    }
}
