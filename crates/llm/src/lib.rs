//! Jira Assistant LLM
//!
//! Chat-completion access for the assistant:
//! - `LlmProvider` trait with an OpenAI-compatible implementation
//! - `LlmCompletionService`, which adapts a provider to the core
//!   `CompletionService` seam
//! - the HTTP client factory

pub mod completion;
pub mod http_client;
pub mod openai;
pub mod provider;
pub mod types;

// Re-export main types
pub use completion::LlmCompletionService;
pub use http_client::build_http_client;
pub use openai::OpenAIProvider;
pub use provider::LlmProvider;
pub use types::*;
