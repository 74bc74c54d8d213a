//! Completion Service Trait
//!
//! Text-in, text-out access to a language model. No streaming, no tools.

use async_trait::async_trait;

use crate::error::CompletionResult;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Generate a reply to `user`, optionally steered by a `system` instruction.
    async fn complete(&self, system: Option<&str>, user: &str) -> CompletionResult<String>;

    /// Check that the service is reachable. The default sends a trivial prompt.
    async fn health_check(&self) -> CompletionResult<()> {
        self.complete(None, "Reply with OK.").await.map(|_| ())
    }

    /// Model name, for display only.
    fn model(&self) -> &str {
        "unknown"
    }
}
