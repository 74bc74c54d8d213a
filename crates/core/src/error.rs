//! Core Error Types
//!
//! Error types shared by every crate in the workspace. The two collaborator
//! seams each get their own enum so the pipeline can tell a failed request
//! apart from an empty answer:
//!
//! - `StoreError` - anything the issue tracker (or the way to reach it) reports
//! - `CompletionError` - anything the language-model service reports
//!
//! `CoreError` remains the catch-all for configuration, I/O and validation.

use thiserror::Error;

/// General-purpose error for configuration, I/O and validation failures.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

/// Failure reported by an issue store.
///
/// Every variant is a hard failure. An empty search result is never an
/// error; it is an `Ok(vec![])`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (DNS, TLS, connection reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials were rejected (401/403)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The addressed resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status, including query syntax errors
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A success response whose body could not be decoded
    #[error("Unexpected response: {0}")]
    Parse(String),
}

/// Result type alias for issue store calls
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: msg.into(),
        }
    }

    /// Map a non-success HTTP status and body to the matching variant.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {}", status)
        } else {
            body.trim().to_string()
        };
        match status {
            401 | 403 => Self::Authentication(message),
            404 => Self::NotFound(message),
            _ => Self::Rejected { status, message },
        }
    }
}

/// Failure reported by a completion service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// The service could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API key was missing or rejected
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The service asked us to slow down
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Any other error reported by the service
    #[error("API error: {0}")]
    Api(String),

    /// The service answered with no text
    #[error("Empty response from model")]
    EmptyResponse,
}

/// Result type alias for completion calls
pub type CompletionResult<T> = Result<T, CompletionError>;
