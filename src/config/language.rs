//! Language defaults
//!
//! Applies to blueprints that declare no language policy of their own.
//! Injected explicitly where needed; there is no process-wide default.

use serde::Deserialize;

use super::error::ValidationError;

/// Language defaults for the deployment
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    /// ISO 639-1 code assumed when nothing is detected
    #[serde(default = "default_language")]
    pub default_language: String,
}

impl LanguageConfig {
    /// Validate language configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let code = self.default_language.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidDefaultLanguage);
        }
        Ok(())
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}
