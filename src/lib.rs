//! Jira Assistant
//!
//! Natural-language access to a Jira project. It includes:
//! - the question pipeline (classify, translate, retrieve, synthesize)
//! - write actions (issue creation, bulk assignment)
//! - configuration loading and logging control
//! - the CLI commands built on top

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

pub use models::settings::{AppConfig, SettingsUpdate};
pub use services::{Assistant, AssistantOptions, IssueInsights};
pub use state::AppState;
pub use storage::ConfigService;
pub use utils::error::{AppError, AppResult};
