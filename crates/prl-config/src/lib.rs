//! Configuration for the PRL compiler and transpiler.
//!
//! Load limits and parallelism settings from TOML or YAML files instead of
//! hard-coding them.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use prl_config::{PrlConfig, ThreadCount};
//!
//! let config = PrlConfig::from_toml_str(r#"
//!     [slicing]
//!     max_number_of_slices = 500
//!
//!     [transpiler]
//!     thread_count = { count = 4 }
//!     warn_unknown_features = false
//! "#).unwrap();
//!
//! assert_eq!(config.slicing.max_number_of_slices, 500);
//! assert_eq!(config.transpiler.thread_count, ThreadCount::Count(4));
//! assert!(!config.transpiler.warn_unknown_features);
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use prl_config::PrlConfig;
//!
//! let config = PrlConfig::load("prl.toml").unwrap_or_default();
//! assert_eq!(config.slicing.max_number_of_slices, 10_000);
//! ```

use std::path::Path;

use prl_core::MAXIMUM_NUMBER_OF_SLICES;
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PrlConfig {
    /// Slice enumeration settings.
    #[serde(default)]
    pub slicing: SlicingConfig,

    /// Transpiler settings.
    #[serde(default)]
    pub transpiler: TranspilerConfig,
}

impl PrlConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML or
    /// invalid values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the maximum number of slices a slice enumeration may produce.
    pub fn with_max_number_of_slices(mut self, max: usize) -> Self {
        self.slicing.max_number_of_slices = max;
        self
    }

    /// Sets the number of transpiler threads.
    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.transpiler.thread_count = thread_count;
        self
    }

    /// Enables or disables warnings for features unknown in a slice.
    pub fn with_warn_unknown_features(mut self, warn: bool) -> Self {
        self.transpiler.warn_unknown_features = warn;
        self
    }

    /// Checks value constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slicing.max_number_of_slices == 0 {
            return Err(ConfigError::Invalid(
                "max_number_of_slices must be positive".to_string(),
            ));
        }
        if self.transpiler.thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "thread count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Slice enumeration configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SlicingConfig {
    /// Upper bound for the number of slices of one enumeration.
    #[serde(default = "default_max_number_of_slices")]
    pub max_number_of_slices: usize,
}

impl Default for SlicingConfig {
    fn default() -> Self {
        Self {
            max_number_of_slices: default_max_number_of_slices(),
        }
    }
}

fn default_max_number_of_slices() -> usize {
    MAXIMUM_NUMBER_OF_SLICES
}

/// Transpiler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TranspilerConfig {
    /// Number of threads used to transpile slice sets.
    #[serde(default)]
    pub thread_count: ThreadCount,

    /// Whether features missing from a slice are logged as warnings.
    #[serde(default = "default_true")]
    pub warn_unknown_features: bool,
}

impl Default for TranspilerConfig {
    fn default() -> Self {
        Self {
            thread_count: ThreadCount::default(),
            warn_unknown_features: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Thread count configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// Let the thread pool pick the number of threads.
    #[default]
    Auto,
    /// Transpile on a single thread.
    None,
    /// Specific number of threads.
    Count(usize),
}

impl ThreadCount {
    /// Number of threads for a thread pool builder; `0` selects the pool's default.
    pub fn num_threads(self) -> usize {
        match self {
            ThreadCount::Auto => 0,
            ThreadCount::None => 1,
            ThreadCount::Count(n) => n,
        }
    }
}
