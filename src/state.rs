//! Application State
//!
//! The configured collaborators shared by every command: the issue store and
//! the completion service, built once from `AppConfig`.

use std::sync::Arc;

use jira_assistant_core::{CompletionService, IssueStore};
use jira_assistant_jira::JiraClient;
use jira_assistant_llm::{LlmCompletionService, OpenAIProvider};
use tracing::debug;

use crate::models::settings::AppConfig;
use crate::services::{Assistant, AssistantOptions, IssueInsights};
use crate::utils::error::{AppError, AppResult};

pub struct AppState {
    config: AppConfig,
    store: Arc<dyn IssueStore>,
    completion: Arc<dyn CompletionService>,
}

impl AppState {
    /// Build the HTTP-backed collaborators from configuration.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let store = JiraClient::new(&config.jira.client_config())?;
        debug!(api = %store.api_base(), "issue store ready");

        let provider = OpenAIProvider::new(config.llm.provider_config())
            .map_err(|e| AppError::config(format!("language model: {}", e)))?;
        let completion = LlmCompletionService::new(Arc::new(provider));

        Ok(Self::with_services(config, Arc::new(store), Arc::new(completion)))
    }

    /// Assemble state from already-built collaborators.
    pub fn with_services(
        config: AppConfig,
        store: Arc<dyn IssueStore>,
        completion: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            config,
            store,
            completion,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn IssueStore> {
        self.store.clone()
    }

    pub fn completion(&self) -> Arc<dyn CompletionService> {
        self.completion.clone()
    }

    /// Start a session; this fetches the tracker schema.
    pub async fn assistant(&self) -> Assistant {
        Assistant::start(
            self.store(),
            self.completion(),
            AssistantOptions::from_config(&self.config),
        )
        .await
    }

    pub fn insights(&self) -> IssueInsights {
        IssueInsights::new(self.completion())
    }
}
