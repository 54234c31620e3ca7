//! Experiment configuration management via TOML files.
//!
//! This module provides configuration parsing from TOML format with sensible defaults.

use std::fs;
use std::path::Path;

use serde::Serialize;
use toml::Value;

/// Experiment configuration loaded from a TOML file.
///
/// # Examples
///
/// ```
/// use complexity_gauge::ExperimentConfig;
///
/// let config = ExperimentConfig::from_str("[experiment]\niterations = 3").unwrap();
/// assert_eq!(config.iterations, 3);
/// assert_eq!(config.folds, 5);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentConfig {
    /// Number of train+evaluate trials to run
    pub iterations: usize,
    /// Fraction of the corpus used for training when no assessment corpus is given
    pub train_fraction: f64,
    /// Cross-validation fold count for hyperparameter search
    pub folds: usize,
    /// Whether diagnostic events are emitted
    pub verbose: bool,
}

impl ExperimentConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let value: Value =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let table = value
            .get("experiment")
            .and_then(|v| v.as_table())
            .cloned()
            .unwrap_or_default();

        let iterations = table
            .get("iterations")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(1) as usize)
            .unwrap_or(10);

        let train_fraction = table
            .get("train_fraction")
            .map(|value| {
                if let Some(float) = value.as_float() {
                    float
                } else if let Some(int) = value.as_integer() {
                    int as f64
                } else {
                    0.7
                }
            })
            .unwrap_or(0.7)
            .clamp(0.05, 0.95);

        let folds = table
            .get("folds")
            .and_then(|v| v.as_integer())
            .map(|v| v.max(2) as usize)
            .unwrap_or(5);

        let verbose = table
            .get("verbose")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        Ok(Self {
            iterations,
            train_fraction,
            folds,
            verbose,
        })
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            train_fraction: 0.7,
            folds: 5,
            verbose: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_when_section_missing() {
        let config = ExperimentConfig::from_str("").unwrap();
        assert_eq!(config.iterations, 10);
        assert_eq!(config.train_fraction, 0.7);
        assert_eq!(config.folds, 5);
        assert!(!config.verbose);
    }

    #[test]
    fn config_parses_custom_values() {
        let toml = "[experiment]\niterations = 25\ntrain_fraction = 0.8\nfolds = 3\nverbose = true";
        let config = ExperimentConfig::from_str(toml).unwrap();
        assert_eq!(config.iterations, 25);
        assert_eq!(config.train_fraction, 0.8);
        assert_eq!(config.folds, 3);
        assert!(config.verbose);
    }

    #[test]
    fn config_clamps_out_of_range_values() {
        let toml = "[experiment]\niterations = 0\ntrain_fraction = 1.5\nfolds = 1";
        let config = ExperimentConfig::from_str(toml).unwrap();
        assert_eq!(config.iterations, 1);
        assert_eq!(config.train_fraction, 0.95);
        assert_eq!(config.folds, 2);
    }

    #[test]
    fn config_rejects_malformed_toml() {
        assert!(ExperimentConfig::from_str("not toml [").is_err());
    }
}
