//! Fail-soft wrapper around a chat model provider.

use super::provider::ChatModel;
use crate::prompt::{FeatureKind, PromptRequest};
use std::sync::Arc;
use tokio::time::timeout;

/// The model client the orchestrator talks to.
///
/// `complete` never fails outward: transport, auth, provider, and timeout
/// errors are logged and replaced with the fixed per-feature fallback
/// string. Successful completions are whitespace-trimmed.
pub struct ModelClient {
    provider: Arc<dyn ChatModel>,
}

impl ModelClient {
    pub fn new(provider: Box<dyn ChatModel>) -> Self {
        Self {
            provider: Arc::from(provider),
        }
    }

    /// Run the prompt against the provider, applying the fail-soft policy.
    pub async fn complete(&self, kind: FeatureKind, prompt: &PromptRequest) -> String {
        let call = self.provider.complete(prompt);

        match timeout(self.provider.timeout(), call).await {
            Ok(Ok(text)) => {
                let text = text.trim().to_string();
                if text.is_empty() {
                    tracing::error!(
                        provider = self.provider.name(),
                        "Model returned empty completion, using fallback"
                    );
                    kind.fallback_message().to_string()
                } else {
                    text
                }
            }
            Ok(Err(e)) => {
                tracing::error!(provider = self.provider.name(), "Model call failed: {e}");
                kind.fallback_message().to_string()
            }
            Err(_) => {
                tracing::error!(
                    provider = self.provider.name(),
                    timeout_ms = self.provider.timeout().as_millis() as u64,
                    "Model call timed out"
                );
                kind.fallback_message().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::prompt;
    use crate::types::Extraction;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedModel(&'static str);

    #[async_trait]
    impl ChatModel for FixedModel {
        fn name(&self) -> &str {
            "fixed"
        }
        async fn complete(&self, _prompt: &PromptRequest) -> Result<String, PipelineError> {
            Ok(self.0.to_string())
        }
        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatModel for FailingModel {
        fn name(&self) -> &str {
            "failing"
        }
        async fn complete(&self, _prompt: &PromptRequest) -> Result<String, PipelineError> {
            Err(PipelineError::Model {
                message: "HTTP 503: overloaded".to_string(),
                status_code: Some(503),
            })
        }
        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    struct HangingModel;

    #[async_trait]
    impl ChatModel for HangingModel {
        fn name(&self) -> &str {
            "hanging"
        }
        async fn complete(&self, _prompt: &PromptRequest) -> Result<String, PipelineError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
        fn timeout(&self) -> Duration {
            Duration::from_millis(20)
        }
    }

    fn scene_prompt() -> PromptRequest {
        prompt::build(FeatureKind::SceneUnderstanding, &Extraction::empty())
    }

    #[tokio::test]
    async fn test_completion_is_trimmed() {
        let client = ModelClient::new(Box::new(FixedModel("  A park bench under a tree.  \n")));
        let text = client
            .complete(FeatureKind::SceneUnderstanding, &scene_prompt())
            .await;
        assert_eq!(text, "A park bench under a tree.");
    }

    #[tokio::test]
    async fn test_provider_error_yields_fallback() {
        let client = ModelClient::new(Box::new(FailingModel));
        let text = client
            .complete(FeatureKind::SceneUnderstanding, &scene_prompt())
            .await;
        assert_eq!(
            text,
            FeatureKind::SceneUnderstanding.fallback_message()
        );

        let text = client
            .complete(
                FeatureKind::PersonalizedAssistance,
                &prompt::build(FeatureKind::PersonalizedAssistance, &Extraction::empty()),
            )
            .await;
        assert_eq!(
            text,
            FeatureKind::PersonalizedAssistance.fallback_message()
        );
    }

    #[tokio::test]
    async fn test_timeout_yields_fallback() {
        let client = ModelClient::new(Box::new(HangingModel));
        let text = client
            .complete(FeatureKind::SceneUnderstanding, &scene_prompt())
            .await;
        assert_eq!(
            text,
            FeatureKind::SceneUnderstanding.fallback_message()
        );
    }

    #[tokio::test]
    async fn test_empty_completion_yields_fallback() {
        let client = ModelClient::new(Box::new(FixedModel("   ")));
        let text = client
            .complete(FeatureKind::PersonalizedAssistance, &scene_prompt())
            .await;
        assert_eq!(
            text,
            FeatureKind::PersonalizedAssistance.fallback_message()
        );
    }
}
