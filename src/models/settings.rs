//! Settings Models
//!
//! Application configuration: tracker connection, language model, and
//! assistant behaviour. Loaded from an optional JSON file and overlaid with
//! environment variables (see `storage::config`).

use jira_assistant_jira::{JiraConfig, DEFAULT_PAGE_SIZE};
use jira_assistant_llm::ProviderConfig;
use serde::{Deserialize, Serialize};

pub const ENV_JIRA_BASE_URL: &str = "JIRA_BASE_URL";
pub const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
pub const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
pub const ENV_JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub jira: JiraSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub api_token: String,
    /// Every generated filter is scoped to this project
    #[serde(default = "default_project_key")]
    pub project_key: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_project_key() -> String {
    "SCRUM".to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for JiraSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: String::new(),
            api_token: String::new(),
            project_key: default_project_key(),
            page_size: default_page_size(),
        }
    }
}

impl JiraSettings {
    pub fn client_config(&self) -> JiraConfig {
        JiraConfig {
            base_url: self.base_url.clone(),
            email: self.email.clone(),
            api_token: self.api_token.clone(),
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_model() -> String {
    jira_assistant_llm::DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl LlmSettings {
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: Some(self.api_key.clone()),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Issue type used when a creation request does not name one
    #[serde(default = "default_issue_type")]
    pub default_issue_type: String,
    /// Maximum issues handed to the model when answering a question
    #[serde(default = "default_context_issue_limit")]
    pub context_issue_limit: usize,
    /// Filter selecting issues for bulk assignment
    #[serde(default = "default_bulk_assign_filter")]
    pub bulk_assign_filter: String,
    /// Start with info-level logging
    #[serde(default)]
    pub verbose: bool,
}

fn default_issue_type() -> String {
    "Task".to_string()
}

fn default_context_issue_limit() -> usize {
    20
}

fn default_bulk_assign_filter() -> String {
    "assignee is EMPTY".to_string()
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            default_issue_type: default_issue_type(),
            context_issue_limit: default_context_issue_limit(),
            bulk_assign_filter: default_bulk_assign_filter(),
            verbose: false,
        }
    }
}

/// Partial update, typically read from environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub jira_base_url: Option<String>,
    pub jira_email: Option<String>,
    pub jira_api_token: Option<String>,
    pub jira_project_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_base_url: Option<String>,
}

impl SettingsUpdate {
    /// Collect overrides through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            jira_base_url: get(ENV_JIRA_BASE_URL),
            jira_email: get(ENV_JIRA_EMAIL),
            jira_api_token: get(ENV_JIRA_API_TOKEN),
            jira_project_key: get(ENV_JIRA_PROJECT_KEY),
            openai_api_key: get(ENV_OPENAI_API_KEY),
            openai_model: get(ENV_OPENAI_MODEL),
            openai_base_url: get(ENV_OPENAI_BASE_URL),
        }
    }
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(url) = update.jira_base_url {
            self.jira.base_url = url;
        }
        if let Some(email) = update.jira_email {
            self.jira.email = email;
        }
        if let Some(token) = update.jira_api_token {
            self.jira.api_token = token;
        }
        if let Some(key) = update.jira_project_key {
            self.jira.project_key = key;
        }
        if let Some(key) = update.openai_api_key {
            self.llm.api_key = key;
        }
        if let Some(model) = update.openai_model {
            self.llm.model = model;
        }
        if let Some(url) = update.openai_base_url {
            self.llm.base_url = Some(url);
        }
    }

    /// Check that every required setting is present.
    ///
    /// Missing settings are reported together, named by their environment
    /// variable.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            (ENV_JIRA_BASE_URL, &self.jira.base_url),
            (ENV_JIRA_EMAIL, &self.jira.email),
            (ENV_JIRA_API_TOKEN, &self.jira.api_token),
            (ENV_OPENAI_API_KEY, &self.llm.api_key),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(format!(
                "Missing required settings: {}",
                missing.join(", ")
            ));
        }

        if self.jira.project_key.trim().is_empty() {
            return Err("project_key cannot be empty".to_string());
        }
        if self.jira.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }
        if self.assistant.context_issue_limit == 0 {
            return Err("context_issue_limit must be at least 1".to_string());
        }

        Ok(())
    }
}
