//! Configuration management for the fitness dashboard

use crate::types::{GenderMatching, UserProfile};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub profile: UserProfile,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

/// Source table configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Exercise metadata table (User_ID, Gender, Age, Height, ...)
    pub exercise_path: String,
    /// Calorie label table (User_ID, Calories)
    pub calories_path: String,
    /// Field delimiter shared by both tables
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            exercise_path: "data/exercise.csv".to_string(),
            calories_path: "data/calories.csv".to_string(),
            delimiter: ',',
        }
    }
}

/// Regression model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum tree depth (unbounded when absent)
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split
    pub min_samples_split: usize,
    /// Fraction of records held out from training
    pub test_ratio: f64,
    /// Seed for the split and for bootstrap sampling
    pub seed: u64,
    /// Fewest records accepted by `fit`
    pub min_records: usize,
    /// Gender label matching: "exact" or "case_insensitive"
    pub gender_matching: GenderMatching,
    /// Histogram bins for the community calorie distribution
    pub histogram_bins: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            test_ratio: 0.2,
            seed: 42,
            min_records: 2,
            gender_matching: GenderMatching::Exact,
            histogram_bins: 20,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where `export` writes workout history
    pub export_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            export_path: "workout_history.csv".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file (if present) and environment
    pub fn load() -> Result<Self> {
        Self::build(File::with_name(DEFAULT_CONFIG_PATH).required(false))
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(File::from(path.as_ref()))
    }

    fn build(file: File<config::FileSourceFile, config::FileFormat>) -> Result<Self> {
        let config = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("FITTRACK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
