//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.speech_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.speech_timeout_ms must be > 0".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::ValidationError(
                "llm.temperature must be between 0.0 and 2.0".into(),
            ));
        }
        if self.llm.max_output_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.max_output_tokens must be > 0".into(),
            ));
        }
        if self.llm.model.is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.model must not be empty".into(),
            ));
        }
        if self.ocr.language.is_empty() {
            return Err(ConfigError::ValidationError(
                "ocr.language must not be empty".into(),
            ));
        }
        if !(0..=13).contains(&self.ocr.page_seg_mode) {
            return Err(ConfigError::ValidationError(
                "ocr.page_seg_mode must be between 0 and 13".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_file_size() {
        let mut config = Config::default();
        config.limits.max_file_size_mb = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_file_size_mb"));
    }

    #[test]
    fn test_validate_rejects_invalid_temperature() {
        let mut config = Config::default();
        config.llm.temperature = 3.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));

        config.llm.temperature = -0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = Config::default();
        config.llm.model.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("llm.model"));
    }

    #[test]
    fn test_validate_rejects_bad_page_seg_mode() {
        let mut config = Config::default();
        config.ocr.page_seg_mode = 99;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_seg_mode"));
    }
}
