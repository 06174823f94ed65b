//! Configuration for the feedback service
//!
//! # Configuration File Format
//!
//! TOML format in `mallfeedback.toml`:
//!
//! ```toml
//! [server]
//! addr = "127.0.0.1:8501"
//! title = "EB Mall Feedback"
//!
//! [store]
//! path = "EB mall_feedback.csv"
//!
//! [scoring]
//! mode = "lexicon"          # or "classifier"
//! model_dir = "model"
//!
//! [report]
//! chart_style = "pie"       # or "donut"
//! ```
//!
//! Environment variables override the file, and CLI flags override both:
//! `MALLFEEDBACK_ADDR`, `MALLFEEDBACK_STORE`, `MALLFEEDBACK_SCORER`,
//! `MALLFEEDBACK_MODEL_DIR`.

use crate::error::{FeedbackError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_ADDR: &str = "MALLFEEDBACK_ADDR";
pub const ENV_STORE: &str = "MALLFEEDBACK_STORE";
pub const ENV_SCORER: &str = "MALLFEEDBACK_SCORER";
pub const ENV_MODEL_DIR: &str = "MALLFEEDBACK_MODEL_DIR";

/// Complete service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackConfig {
    /// HTTP form surface settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Record store settings
    #[serde(default)]
    pub store: StoreSettings,

    /// Sentiment scorer settings
    #[serde(default)]
    pub scoring: ScoringSettings,

    /// Report rendering settings
    #[serde(default)]
    pub report: ReportSettings,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen address
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Page title shown above the form
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            title: default_title(),
        }
    }
}

/// Record store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// CSV file holding every submitted record
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Which scorer backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScorerMode {
    /// Lexicon polarity, three labels
    Lexicon,
    /// Pre-fitted bag-of-words classifier, two labels
    Classifier,
}

impl std::fmt::Display for ScorerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScorerMode::Lexicon => write!(f, "lexicon"),
            ScorerMode::Classifier => write!(f, "classifier"),
        }
    }
}

impl std::str::FromStr for ScorerMode {
    type Err = FeedbackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lexicon" | "textblob" | "polarity" => Ok(ScorerMode::Lexicon),
            "classifier" | "model" | "bow" => Ok(ScorerMode::Classifier),
            other => Err(FeedbackError::Config(format!(
                "Unknown scorer mode '{}' (expected 'lexicon' or 'classifier')",
                other
            ))),
        }
    }
}

/// Sentiment scorer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringSettings {
    #[serde(default = "default_mode")]
    pub mode: ScorerMode,

    /// Directory holding `vectorizer.json`, `classifier.json` and the
    /// optional `label_encoder.json`
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            model_dir: default_model_dir(),
        }
    }
}

/// Proportion chart shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartStyle {
    #[default]
    Pie,
    Donut,
}

/// Report rendering settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default)]
    pub chart_style: ChartStyle,
}

fn default_addr() -> String {
    "127.0.0.1:8501".to_string()
}

fn default_title() -> String {
    "EB Mall Feedback".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("EB mall_feedback.csv")
}

fn default_mode() -> ScorerMode {
    ScorerMode::Lexicon
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("model")
}

impl FeedbackConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found, using defaults: {:?}", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            FeedbackError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file: {}", e),
            ))
        })?;

        let config: FeedbackConfig = toml::from_str(&content)
            .map_err(|e| FeedbackError::Config(format!("Failed to parse config file: {}", e)))?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FeedbackError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Write the default configuration to `path` without reading what is there
    ///
    /// An existing file is only replaced when `force` is set, even if it no
    /// longer parses.
    pub fn init_file(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(FeedbackError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        Self::default().save(path)
    }

    /// Apply `MALLFEEDBACK_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (empty values are ignored)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(addr) = get(ENV_ADDR) {
            tracing::debug!("{} overrides server address", ENV_ADDR);
            self.server.addr = addr;
        }
        if let Some(store) = get(ENV_STORE) {
            tracing::debug!("{} overrides store path", ENV_STORE);
            self.store.path = PathBuf::from(store);
        }
        if let Some(mode) = get(ENV_SCORER) {
            self.scoring.mode = mode.parse()?;
        }
        if let Some(dir) = get(ENV_MODEL_DIR) {
            self.scoring.model_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        PathBuf::from("mallfeedback.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = FeedbackConfig::default();
        assert_eq!(config.server.addr, "127.0.0.1:8501");
        assert_eq!(config.store.path, PathBuf::from("EB mall_feedback.csv"));
        assert_eq!(config.scoring.mode, ScorerMode::Lexicon);
        assert_eq!(config.report.chart_style, ChartStyle::Pie);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("mallfeedback.toml");

        let mut config = FeedbackConfig::default();
        config.scoring.mode = ScorerMode::Classifier;
        config.report.chart_style = ChartStyle::Donut;
        config.save(&path).unwrap();

        let loaded = FeedbackConfig::load(&path).unwrap();
        assert_eq!(loaded.scoring.mode, ScorerMode::Classifier);
        assert_eq!(loaded.report.chart_style, ChartStyle::Donut);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mallfeedback.toml");
        std::fs::write(&path, "[store]\npath = \"data/feedback.csv\"\n").unwrap();

        let config = FeedbackConfig::load(&path).unwrap();
        assert_eq!(config.store.path, PathBuf::from("data/feedback.csv"));
        assert_eq!(config.server.addr, "127.0.0.1:8501");
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config = FeedbackConfig::load(Path::new("/nonexistent/mallfeedback.toml")).unwrap();
        assert_eq!(config.scoring.mode, ScorerMode::Lexicon);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mallfeedback.toml");
        std::fs::write(&path, "[scoring\nmode = ").unwrap();

        let err = FeedbackConfig::load(&path).unwrap_err();
        assert!(matches!(err, FeedbackError::Config(_)));
    }

    #[test]
    fn test_init_replaces_malformed_file_only_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mallfeedback.toml");
        std::fs::write(&path, "[scoring\nmode = ").unwrap();

        let err = FeedbackConfig::init_file(&path, false).unwrap_err();
        assert!(matches!(err, FeedbackError::Config(_)));
        assert!(FeedbackConfig::load(&path).is_err());

        FeedbackConfig::init_file(&path, true).unwrap();
        let loaded = FeedbackConfig::load(&path).unwrap();
        assert_eq!(loaded.scoring.mode, ScorerMode::Lexicon);
        assert_eq!(loaded.server.addr, "127.0.0.1:8501");
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_STORE, "/tmp/other.csv"),
            (ENV_SCORER, "classifier"),
            (ENV_ADDR, ""),
        ]
        .into_iter()
        .collect();

        let mut config = FeedbackConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/tmp/other.csv"));
        assert_eq!(config.scoring.mode, ScorerMode::Classifier);
        // Empty values leave the setting alone
        assert_eq!(config.server.addr, "127.0.0.1:8501");
    }

    #[test]
    fn test_bad_scorer_override_is_rejected() {
        let mut config = FeedbackConfig::default();
        let result = config.apply_overrides(|key| {
            (key == ENV_SCORER).then(|| "magic".to_string())
        });
        assert!(result.is_err());
    }
}
