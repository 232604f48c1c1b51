//! API key loading.
//!
//! The Gemini API key lives in a single plain-text file. A missing or empty
//! key file is a deployment error: it fails startup before any component
//! that depends on the credential is constructed. There is no retry and no
//! environment-variable fallback.

use crate::error::ConfigError;
use std::path::Path;

/// An API key loaded once at startup, immutable for the process lifetime.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    /// Load the credential from a plain-text file, trimming surrounding
    /// whitespace.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::MissingCredential(path.to_path_buf()))?;
        let key = raw.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyCredential(path.to_path_buf()));
        }
        Ok(Self(key.to_string()))
    }

    /// The raw key, for request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

// Keys never appear in logs or error chains.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_trims_whitespace() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  AIza-test-key  \n").unwrap();

        let cred = Credential::load(file.path()).unwrap();
        assert_eq!(cred.expose(), "AIza-test-key");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credential::load(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }

    #[test]
    fn test_load_empty_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "   \n  ").unwrap();

        let err = Credential::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCredential(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "secret-key").unwrap();

        let cred = Credential::load(file.path()).unwrap();
        let debug = format!("{cred:?}");
        assert!(!debug.contains("secret-key"));
    }
}
