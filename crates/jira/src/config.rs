//! Jira connection settings.

use serde::{Deserialize, Serialize};

/// REST API path appended to the site URL
pub const REST_API_PATH: &str = "/rest/api/2";

/// Issues requested per search page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraConfig {
    /// Site URL, with or without scheme and REST path
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl JiraConfig {
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            email: email.into(),
            api_token: api_token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Normalized REST root: `https://` is added when no scheme is given and
    /// `/rest/api/2` is appended unless already present.
    pub fn api_base(&self) -> String {
        normalize_api_base(&self.base_url)
    }
}

pub fn normalize_api_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    if with_scheme.ends_with(REST_API_PATH) {
        with_scheme
    } else {
        format!("{}{}", with_scheme, REST_API_PATH)
    }
}
