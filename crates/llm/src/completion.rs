//! Completion Service Adapter
//!
//! Exposes any `LlmProvider` as the text-in, text-out `CompletionService`
//! the assistant pipeline consumes.

use std::sync::Arc;

use async_trait::async_trait;
use jira_assistant_core::{CompletionError, CompletionResult, CompletionService};
use tracing::warn;

use crate::provider::LlmProvider;
use crate::types::{LlmError, Message, StopReason};

pub struct LlmCompletionService {
    provider: Arc<dyn LlmProvider>,
}

impl LlmCompletionService {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

impl From<LlmError> for CompletionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::AuthenticationFailed { message } => CompletionError::Authentication(message),
            LlmError::RateLimited { message, .. } => CompletionError::RateLimited(message),
            LlmError::NetworkError { message } => CompletionError::Transport(message),
            other => CompletionError::Api(other.to_string()),
        }
    }
}

#[async_trait]
impl CompletionService for LlmCompletionService {
    async fn complete(&self, system: Option<&str>, user: &str) -> CompletionResult<String> {
        let response = self
            .provider
            .send_message(vec![Message::user(user)], system.map(str::to_string))
            .await?;

        if response.stop_reason == StopReason::MaxTokens {
            warn!(model = %response.model, "completion truncated at max_tokens");
        }

        response
            .text()
            .map(str::to_string)
            .ok_or(CompletionError::EmptyResponse)
    }

    async fn health_check(&self) -> CompletionResult<()> {
        self.provider.health_check().await.map_err(Into::into)
    }

    fn model(&self) -> &str {
        self.provider.model()
    }
}
