//! Error types for the Visionary pipeline.
//!
//! Errors are organized by stage. Note that two stages deliberately never
//! surface their errors to callers: OCR failures are normalized to an empty
//! extraction by the adapter, and model failures are replaced by a fixed
//! fallback string in the client. Those variants exist for logging and for
//! the provider implementations underneath the fail-soft wrappers.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Visionary operations.
#[derive(Error, Debug)]
pub enum VisionaryError {
    /// Configuration-related errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// An action was requested that the session state does not permit
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// API key file is missing or unreadable
    #[error("API key file not found: {0}. Create it with your Gemini API key.")]
    MissingCredential(PathBuf),

    /// API key file exists but contains nothing usable
    #[error("API key file is empty: {0}")]
    EmptyCredential(PathBuf),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Unsupported image format (only JPEG and PNG uploads are accepted)
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Decode did not finish within the configured timeout
    #[error("Decode timed out for {path} after {timeout_ms}ms")]
    DecodeTimeout { path: PathBuf, timeout_ms: u64 },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// OCR engine failure. Never escapes the OCR adapter; callers see an
    /// empty extraction instead.
    #[error("OCR failed: {message}")]
    Ocr { message: String },

    /// Model completion failure. Never escapes the model client; callers
    /// see the per-feature fallback string instead.
    #[error("Model error: {message}")]
    Model {
        message: String,
        status_code: Option<u16>,
    },

    /// Speech synthesis or playback failure
    #[error("Speech error: {message}")]
    Speech { message: String },
}

/// Convenience type alias for Visionary results.
pub type Result<T> = std::result::Result<T, VisionaryError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
