//! Blueprint catalog configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Where blueprints are loaded from at startup
#[derive(Debug, Clone, Deserialize)]
pub struct BlueprintsConfig {
    /// Directory of YAML blueprint files
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl BlueprintsConfig {
    /// Validate blueprint configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.trim().is_empty() {
            return Err(ValidationError::EmptyBlueprintDir);
        }
        Ok(())
    }
}

impl Default for BlueprintsConfig {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

fn default_dir() -> String {
    "blueprints".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_blueprints_directory() {
        let config = BlueprintsConfig::default();
        assert_eq!(config.dir, "blueprints");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_empty_directory() {
        let config = BlueprintsConfig { dir: "  ".into() };
        assert!(config.validate().is_err());
    }
}
