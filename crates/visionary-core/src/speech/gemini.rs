//! Gemini TTS provider.
//!
//! Uses the same generateContent API and API key as the chat provider,
//! with `responseModalities: ["AUDIO"]`. Gemini returns base64-encoded
//! 16-bit little-endian PCM as inline data, with the sample rate carried
//! in the MIME type (e.g., `audio/L16;codec=pcm;rate=24000`).

use super::{AudioClip, SpeechSynthesizer};
use crate::config::SpeechConfig;
use crate::credentials::Credential;
use crate::error::PipelineError;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// Gemini speech synthesis provider.
pub struct GeminiSpeech {
    api_key: String,
    model: String,
    voice: String,
    timeout: Duration,
    endpoint: String,
    client: reqwest::Client,
}

impl GeminiSpeech {
    pub fn new(credential: &Credential, config: &SpeechConfig, timeout_ms: u64) -> Self {
        Self {
            api_key: credential.expose().to_string(),
            model: config.model.clone(),
            voice: config.voice.clone(),
            timeout: Duration::from_millis(timeout_ms),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechGenConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechGenConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct SpeechResponse {
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
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Pull the PCM sample rate out of a MIME type like
/// `audio/L16;codec=pcm;rate=24000`.
fn sample_rate_from_mime(mime: &str) -> u32 {
    mime.split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Interpret raw bytes as little-endian 16-bit PCM samples.
fn pcm_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

#[async_trait]
impl SpeechSynthesizer for GeminiSpeech {
    fn name(&self) -> &str {
        "gemini-tts"
    }

    async fn synthesize(&self, text: &str) -> Result<AudioClip, PipelineError> {
        if text.trim().is_empty() {
            return Ok(AudioClip::silent());
        }

        let body = SpeechRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechGenConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                },
            },
        };

        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::Speech {
                message: format!("Gemini TTS request failed: {e}"),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::Speech {
                message: format!("Gemini TTS HTTP {status}: {text}"),
            });
        }

        let speech_resp: SpeechResponse =
            resp.json().await.map_err(|e| PipelineError::Speech {
                message: format!("Failed to parse Gemini TTS response: {e}"),
            })?;

        let inline = speech_resp
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.inline_data)
            .next()
            .ok_or_else(|| PipelineError::Speech {
                message: "Gemini TTS returned no audio data".to_string(),
            })?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&inline.data)
            .map_err(|e| PipelineError::Speech {
                message: format!("Failed to decode TTS audio payload: {e}"),
            })?;

        Ok(AudioClip {
            samples: pcm_to_samples(&bytes),
            channels: 1,
            sample_rate: sample_rate_from_mime(&inline.mime_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rate_from_mime() {
        assert_eq!(sample_rate_from_mime("audio/L16;codec=pcm;rate=24000"), 24_000);
        assert_eq!(sample_rate_from_mime("audio/L16;rate=16000;codec=pcm"), 16_000);
        assert_eq!(sample_rate_from_mime("audio/L16"), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn test_pcm_to_samples_little_endian() {
        let samples = pcm_to_samples(&[0x01, 0x00, 0xFF, 0xFF, 0x00]);
        // Trailing odd byte is dropped
        assert_eq!(samples, vec![1, -1]);
    }

    #[test]
    fn test_request_wire_shape() {
        let body = SpeechRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechGenConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: "Kore".to_string(),
                        },
                    },
                },
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[test]
    fn test_inline_data_parsing() {
        let raw = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": {
                            "mimeType": "audio/L16;codec=pcm;rate=24000",
                            "data": "AQD//w=="
                        }
                    }]
                }
            }]
        }"#;

        let resp: SpeechResponse = serde_json::from_str(raw).unwrap();
        let inline = resp.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert_eq!(inline.mime_type, "audio/L16;codec=pcm;rate=24000");
    }
}
