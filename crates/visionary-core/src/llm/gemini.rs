//! Gemini chat provider using the generateContent API.
//!
//! Sends the system instruction and human message as a single-turn request
//! with no conversation history.

use super::provider::ChatModel;
use crate::config::LlmConfig;
use crate::credentials::Credential;
use crate::error::PipelineError;
use crate::prompt::PromptRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider for text completions.
pub struct GeminiChat {
    api_key: String,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    timeout: Duration,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiChat {
    pub fn new(credential: &Credential, config: &LlmConfig, timeout_ms: u64) -> Self {
        Self {
            api_key: credential.expose().to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            timeout: Duration::from_millis(timeout_ms),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Instruction,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Instruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

// --- Response types ---

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[async_trait]
impl ChatModel for GeminiChat {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, prompt: &PromptRequest) -> Result<String, PipelineError> {
        let body = GenerateRequest {
            system_instruction: Instruction {
                parts: vec![Part {
                    text: prompt.system.clone(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.human.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Model {
                message: format!("Gemini request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Model {
                message: format!("Gemini HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let generate_resp: GenerateResponse =
            resp.json().await.map_err(|e| PipelineError::Model {
                message: format!("Failed to parse Gemini response: {e}"),
                status_code: None,
            })?;

        let text = generate_resp
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(PipelineError::Model {
                message: "Gemini returned no text content".to_string(),
                status_code: None,
            });
        }

        Ok(text)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
