//! Jira Assistant Jira
//!
//! REST client for Jira Cloud, exposed through the core `IssueStore` trait.
//!
//! - `config` - connection settings and site URL normalization
//! - `client` - `JiraClient`, the `IssueStore` implementation

pub mod client;
pub mod config;

pub use client::JiraClient;
pub use config::{normalize_api_base, JiraConfig, DEFAULT_PAGE_SIZE, REST_API_PATH};
