//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod assistant;
pub mod insights;

pub use assistant::{Assistant, AssistantOptions};
pub use insights::IssueInsights;
