use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::DEFAULT_HISTORY_CAPACITY;
use memo_llm::providers::gemini::DEFAULT_MODEL;
use memo_llm::DEFAULT_TEMPERATURE;

const CONFIG_FILE_PATH: &str = "memo-normalizer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set (environment or {})", config_json_path().display())]
    MissingApiKey,

    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub temperature: f32,
    /// Drop unknown sections instead of writing "不明" placeholders.
    pub omit_unknown_fields: bool,
    pub history_capacity: usize,
    pub timeout_secs: Option<u64>,
}

impl Default for MemoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: None,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            omit_unknown_fields: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            timeout_secs: None,
        }
    }
}

/// ~/.memo-normalizer
pub fn memo_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".memo-normalizer")
}

pub fn config_json_path() -> PathBuf {
    memo_dir().join("config.json")
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl MemoConfig {
    /// Load from the user config, then the working-directory TOML file, then
    /// defaults, and finally apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_default_files();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Load an explicit file (JSON or TOML by extension) plus environment
    /// overrides. Unlike [`MemoConfig::load`], a broken file is an error.
    pub fn load_with_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_default_files() -> Self {
        let json_path = config_json_path();
        if json_path.exists() {
            match Self::from_file(&json_path) {
                Ok(config) => return config,
                Err(e) => log::warn!("{}", e),
            }
        }

        let toml_path = Path::new(CONFIG_FILE_PATH);
        if toml_path.exists() {
            match Self::from_file(toml_path) {
                Ok(config) => return config,
                Err(e) => log::warn!("{}", e),
            }
        }

        log::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            serde_json::from_str::<MemoConfig>(&content).map_err(|e| e.to_string())
        } else {
            toml::from_str::<MemoConfig>(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("GEMINI_API_KEY").filter(|v| !v.trim().is_empty()) {
            self.api_key = Some(api_key);
        }
        if let Some(api_base) = lookup("GEMINI_API_BASE").filter(|v| !v.trim().is_empty()) {
            self.api_base = Some(api_base);
        }
        if let Some(model) = lookup("GEMINI_MODEL").filter(|v| !v.trim().is_empty()) {
            self.model = Some(model);
        }
        if let Some(omit) = lookup("MEMO_OMIT_UNKNOWN_FIELDS") {
            self.omit_unknown_fields = parse_bool_env(&omit);
        }
        if let Some(timeout) = lookup("MEMO_TIMEOUT_SECS") {
            match timeout.trim().parse::<u64>() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => log::warn!("Ignoring invalid MEMO_TIMEOUT_SECS value {:?}", timeout),
            }
        }
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .filter(|model| !model.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_bool_env_true_values() {
        for value in ["1", "true", "TRUE", " yes ", "Y", "on"] {
            assert!(parse_bool_env(value), "value {value:?} should be true");
        }
    }

    #[test]
    fn parse_bool_env_false_values() {
        for value in ["0", "false", "no", "off", "", "  "] {
            assert!(!parse_bool_env(value), "value {value:?} should be false");
        }
    }

    #[test]
    fn defaults_match_shipped_behaviour() {
        let config = MemoConfig::default();
        assert!(config.omit_unknown_fields);
        assert_eq!(config.history_capacity, 50);
        assert!((config.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.model_name(), "gemini-flash-lite-latest");
        assert!(matches!(config.api_key(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = MemoConfig {
            api_key: Some("from-file".to_string()),
            ..MemoConfig::default()
        };

        config.apply_env_overrides(env(&[
            ("GEMINI_API_KEY", "from-env"),
            ("GEMINI_MODEL", "gemini-pro"),
            ("MEMO_OMIT_UNKNOWN_FIELDS", "off"),
            ("MEMO_TIMEOUT_SECS", "30"),
        ]));

        assert_eq!(config.api_key().unwrap(), "from-env");
        assert_eq!(config.model_name(), "gemini-pro");
        assert!(!config.omit_unknown_fields);
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = MemoConfig {
            api_key: Some("kept".to_string()),
            ..MemoConfig::default()
        };
        config.apply_env_overrides(env(&[("GEMINI_API_KEY", "  "), ("MEMO_TIMEOUT_SECS", "soon")]));

        assert_eq!(config.api_key().unwrap(), "kept");
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn toml_file_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memo.toml");
        std::fs::write(&path, "api_key = \"abc\"\nomit_unknown_fields = false\n").unwrap();

        let config = MemoConfig::from_file(&path).unwrap();
        assert_eq!(config.api_key().unwrap(), "abc");
        assert!(!config.omit_unknown_fields);
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn json_file_is_parsed_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model": "gemini-flash-latest", "history_capacity": 10}"#)
            .unwrap();

        let config = MemoConfig::from_file(&path).unwrap();
        assert_eq!(config.model_name(), "gemini-flash-latest");
        assert_eq!(config.history_capacity, 10);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "api_key = ").unwrap();

        let err = MemoConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
