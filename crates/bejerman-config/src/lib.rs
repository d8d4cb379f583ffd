//! Configuration management for bejerman-rec
//!
//! This module handles loading and validation of the YAML configuration:
//! input decoding, the fixed field layout, output naming and logging.

pub mod error;

use bejerman_parser::{RecordLayout, TextEncoding};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Upper bound on documents consolidated in a single run
pub const MAX_DOCUMENTS: usize = 3;

// ==================== Configuration Types ====================

/// Input documents configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Text encoding of the `.rec` files
    #[serde(default)]
    pub encoding: TextEncoding,
    /// Maximum number of documents per run
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::default(),
            max_files: default_max_files(),
        }
    }
}

fn default_max_files() -> usize {
    MAX_DOCUMENTS
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where the workbook is written
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Filename prefix, followed by `_<account>.xlsx`
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Label used when the account sanitizes to nothing
    #[serde(default = "default_fallback_label")]
    pub fallback_label: String,
    /// Label used when there are no records at all
    #[serde(default = "default_empty_set_label")]
    pub empty_set_label: String,
    /// Maximum length of the sanitized account label
    #[serde(default = "default_max_label_length")]
    pub max_label_length: usize,
    /// Name of the movements sheet
    #[serde(default = "default_records_sheet")]
    pub records_sheet: String,
    /// Name of the per-company summary sheet
    #[serde(default = "default_summary_sheet")]
    pub summary_sheet: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            file_prefix: default_file_prefix(),
            fallback_label: default_fallback_label(),
            empty_set_label: default_empty_set_label(),
            max_label_length: default_max_label_length(),
            records_sheet: default_records_sheet(),
            summary_sheet: default_summary_sheet(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_prefix() -> String {
    "movimientos_consolidados".to_string()
}

fn default_fallback_label() -> String {
    "empresa".to_string()
}

fn default_empty_set_label() -> String {
    "cuenta".to_string()
}

fn default_max_label_length() -> usize {
    60
}

fn default_records_sheet() -> String {
    "Movimientos".to_string()
}

fn default_summary_sheet() -> String {
    "Resumen por Empresa".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Input settings
    #[serde(default)]
    pub input: InputConfig,
    /// Fixed field offsets
    #[serde(default)]
    pub layout: RecordLayout,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from `path` when it exists, otherwise use the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        match Self::load(path) {
            Err(ConfigError::FileNotFound { .. }) => Ok(Self::default()),
            other => other,
        }
    }

    /// Parse and validate YAML content
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.input.max_files == 0 || self.input.max_files > MAX_DOCUMENTS {
            return Err(ConfigError::InvalidValue {
                field: "input.max_files".to_string(),
                reason: format!("Must be between 1 and {}", MAX_DOCUMENTS),
            });
        }

        self.layout.validate().map_err(|e| ConfigError::InvalidValue {
            field: "layout".to_string(),
            reason: e.to_string(),
        })?;

        if self.output.max_label_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "output.max_label_length".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.output.fallback_label.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output.fallback_label".to_string(),
                reason: "Must not be empty".to_string(),
            });
        }

        for (field, name) in [
            ("output.records_sheet", &self.output.records_sheet),
            ("output.summary_sheet", &self.output.summary_sheet),
        ] {
            // spreadsheet sheet names are limited to 31 characters
            if name.trim().is_empty() || name.chars().count() > 31 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Sheet names must have between 1 and 31 characters".to_string(),
                });
            }
        }

        if self.output.records_sheet == self.output.summary_sheet {
            return Err(ConfigError::InvalidValue {
                field: "output.summary_sheet".to_string(),
                reason: "Must differ from output.records_sheet".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}
