//! Core data types shared across the Visionary pipeline.

use serde::{Deserialize, Serialize};

/// The three user-facing features, mutually exclusive per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Describe the visual content of the image
    SceneUnderstanding,
    /// Read the text in the image aloud (OCR only, no model call)
    TextToSpeech,
    /// Suggest actionable tasks based on the image content
    PersonalizedAssistance,
}

impl Feature {
    /// Human-readable label for menus and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SceneUnderstanding => "Scene Understanding",
            Self::TextToSpeech => "Text-to-Speech",
            Self::PersonalizedAssistance => "Personalized Assistance",
        }
    }

    /// Heading shown above the result panel.
    pub fn heading(&self) -> &'static str {
        match self {
            Self::SceneUnderstanding => "Scene Description",
            Self::TextToSpeech => "Extracted Text",
            Self::PersonalizedAssistance => "Assistance Suggestions",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Text extracted from an image by OCR.
///
/// Emptiness is a meaningful signal, not an error: it selects the
/// text-absent prompt template. OCR engine failures are normalized to an
/// empty extraction before this type is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extraction {
    text: String,
}

impl Extraction {
    /// Normalize raw OCR output: surrounding whitespace is trimmed so that
    /// whitespace-only output counts as "no text detected".
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            text: raw.trim().to_string(),
        }
    }

    /// An extraction with no text, used when OCR finds nothing or fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// The user-facing output of one feature invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureResult {
    /// Which feature produced this result
    pub feature: Feature,
    /// Displayable text; never empty and never an error message wrapper
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_trims() {
        let extraction = Extraction::new("  Take 1 tablet twice daily \n");
        assert_eq!(extraction.as_str(), "Take 1 tablet twice daily");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(Extraction::new(" \n\t ").is_empty());
        assert!(Extraction::empty().is_empty());
    }

    #[test]
    fn test_feature_labels() {
        assert_eq!(Feature::SceneUnderstanding.label(), "Scene Understanding");
        assert_eq!(Feature::TextToSpeech.heading(), "Extracted Text");
    }
}
