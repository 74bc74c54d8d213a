//! HTTP Client Factory
//!
//! Builds the `reqwest::Client` shared by providers.

use super::types::{LlmError, LlmResult};

const USER_AGENT: &str = concat!("jira-assistant/", env!("CARGO_PKG_VERSION"));

/// Build a `reqwest::Client` for provider calls.
///
/// No request timeout is set; calls wait as long as the transport allows.
pub fn build_http_client() -> LlmResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| LlmError::Other {
            message: format!("failed to build HTTP client: {}", e),
        })
}
