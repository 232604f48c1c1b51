//! Chat model provider trait.

use crate::error::PipelineError;
use crate::prompt::PromptRequest;
use async_trait::async_trait;
use std::time::Duration;

/// Trait implemented by hosted chat model providers.
///
/// Calls are single-turn and stateless: one system instruction, one human
/// message, no conversation history. Uses `async_trait` because native
/// async fn in trait is not object-safe (the client holds a
/// `Box<dyn ChatModel>` for dynamic dispatch).
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Run a single-turn completion and return the raw generated text.
    async fn complete(&self, prompt: &PromptRequest) -> Result<String, PipelineError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}
