//! Prompt templates for the model-backed features.
//!
//! Each feature has exactly two template variants, selected by whether the
//! OCR extraction came back empty. Non-empty extractions are embedded
//! verbatim, unescaped, so the model sees exactly what the OCR engine
//! produced. Building a prompt is pure: no model dependency, no I/O.
//!
//! The third feature (text-to-speech) bypasses prompting entirely and is
//! therefore absent here.

use crate::types::Extraction;

/// The two features that go through the prompt builder and model client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    SceneUnderstanding,
    PersonalizedAssistance,
}

impl FeatureKind {
    /// Fixed user-facing string returned when the model call fails.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::SceneUnderstanding => {
                "Unable to generate a description for the image at the moment. Please try again."
            }
            Self::PersonalizedAssistance => {
                "Unable to provide personalized assistance at the moment. Please try again."
            }
        }
    }
}

/// A fully rendered prompt: system instruction plus one human message.
/// Immutable once built; contains no unresolved placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub system: String,
    pub human: String,
}

const SCENE_SYSTEM: &str =
    "You are an AI assistant that specializes in helping visually impaired users understand images.";

const SCENE_NO_TEXT: &str = "You are an AI assistant designed to help visually impaired users \
    understand the content of images. Analyze the uploaded image and describe the scene in \
    detail. Focus on the objects present, their arrangement, spatial relationships, colors, and \
    any environmental context. Use clear and descriptive language to make the scene easy to \
    imagine. Avoid technical jargon, and prioritize accessibility in your description.";

const ASSIST_SYSTEM: &str =
    "You are an AI assistant that provides task-specific guidance for visually impaired users.";

const ASSIST_NO_TEXT: &str = "You are an AI assistant providing practical guidance for visually \
    impaired users based on image content. Analyze the uploaded image and suggest actionable \
    tasks. For example, identify and describe items, read labels or text, and provide \
    context-specific assistance, such as how to interact with objects in the scene or complete \
    related daily activities. Ensure your guidance is clear, helpful, and easy to follow.";

/// Render the prompt for a feature given the OCR extraction.
pub fn build(kind: FeatureKind, extraction: &Extraction) -> PromptRequest {
    match kind {
        FeatureKind::SceneUnderstanding => {
            if extraction.is_empty() {
                PromptRequest {
                    system: SCENE_SYSTEM.to_string(),
                    human: SCENE_NO_TEXT.to_string(),
                }
            } else {
                PromptRequest {
                    system: SCENE_SYSTEM.to_string(),
                    human: format!(
                        "I have uploaded an image. The text extracted from the image is as \
                         follows:\n\n'{}'.\n\nBased on this text and the visible objects in the \
                         scene, describe the image in detail. Include contextual information and \
                         suggest any tasks or actions the user might need assistance with.",
                        extraction.as_str()
                    ),
                }
            }
        }
        FeatureKind::PersonalizedAssistance => {
            if extraction.is_empty() {
                PromptRequest {
                    system: ASSIST_SYSTEM.to_string(),
                    human: ASSIST_NO_TEXT.to_string(),
                }
            } else {
                PromptRequest {
                    system: ASSIST_SYSTEM.to_string(),
                    human: format!(
                        "I have uploaded an image. The text extracted from the image is as \
                         follows:\n\n'{}'.\n\nUsing this text and the visible objects in the \
                         image, suggest actionable tasks or activities the user might find \
                         helpful. For example, if the text includes instructions or labels, \
                         explain how to use the associated items.",
                        extraction.as_str()
                    ),
                }
            }
        }
    }
}
