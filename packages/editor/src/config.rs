use crate::pipeline::DEFAULT_VALIDATION_DELAY;
use crate::undo_stack::DEFAULT_HISTORY_LIMIT;
use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "apistudio.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undo levels kept (0 = unlimited)
    pub history_limit: usize,

    /// Quiet window before validation runs, in milliseconds
    pub validation_delay_ms: u64,

    /// Prefix the `openapi` field must start with
    pub supported_version_prefix: String,

    /// Validation rules to skip
    pub disabled_rules: Vec<String>,
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        serde_json::from_str(&content).map_err(|err| EditorError::Config {
            path: config_path,
            message: err.to_string(),
        })
    }

    pub fn validation_delay(&self) -> Duration {
        Duration::from_millis(self.validation_delay_ms)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            validation_delay_ms: DEFAULT_VALIDATION_DELAY.as_millis() as u64,
            supported_version_prefix: "3.".to_string(),
            disabled_rules: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "historyLimit": 10,
            "validationDelayMs": 50,
            "disabledRules": ["servers-defined"]
        }"#;

        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_limit, 10);
        assert_eq!(config.validation_delay(), Duration::from_millis(50));
        assert_eq!(config.supported_version_prefix, "3.");
        assert_eq!(config.disabled_rules, vec!["servers-defined"]);
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.validation_delay_ms, 300);
        assert!(config.disabled_rules.is_empty());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap(), EditorConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"historyLimit": 0}"#).unwrap();
        assert_eq!(EditorConfig::load(dir.path()).unwrap().history_limit, 0);

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{").unwrap();
        assert!(matches!(
            EditorConfig::load(dir.path()),
            Err(EditorError::Config { .. })
        ));
    }
}
