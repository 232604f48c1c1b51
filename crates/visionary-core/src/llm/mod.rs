//! Chat model integration for the scene understanding and assistance
//! features.
//!
//! A provider trait abstracts the hosted model; [`ModelClient`] wraps it
//! with the fail-soft policy: the UI always gets displayable text, never
//! an error.

pub(crate) mod client;
pub(crate) mod gemini;
pub(crate) mod provider;

pub use client::ModelClient;
pub use gemini::GeminiChat;
pub use provider::ChatModel;
