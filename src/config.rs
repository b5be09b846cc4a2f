//! Layered application configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `AQI__` (for example
//! `AQI__PATHS__RAW_DIR=/data/raw`).

use crate::error::Result;
use crate::utils::constants::*;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub paths: PathsConfig,

    #[validate(nested)]
    pub cleaner: CleanerConfig,

    #[validate(nested)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PathsConfig {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub output_dir: PathBuf,

    #[validate(length(min = 1))]
    pub files: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(RAW_DATA_DIR),
            processed_dir: PathBuf::from(PROCESSED_DATA_DIR),
            output_dir: PathBuf::from(OUTPUT_DIR),
            files: DEFAULT_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Column roles and cleaning rules shared by the cleaner and the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_quality_bounds"))]
pub struct CleanerConfig {
    #[validate(length(min = 1))]
    pub pollutants: Vec<String>,

    #[validate(length(min = 1))]
    pub temporal_aliases: Vec<String>,

    #[validate(length(min = 1))]
    pub quality_index: String,

    #[validate(length(min = 1))]
    pub quality_category: String,

    pub city_column: String,

    pub quality_min: f64,
    pub quality_max: f64,

    /// Fill missing quality-index values with the column median like pollutants.
    pub impute_quality_index: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            pollutants: POLLUTANTS.iter().map(|p| p.to_string()).collect(),
            temporal_aliases: DATE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            quality_index: QUALITY_INDEX_COLUMN.to_string(),
            quality_category: QUALITY_CATEGORY_COLUMN.to_string(),
            city_column: CITY_COLUMN.to_string(),
            quality_min: MIN_VALID_AQI,
            quality_max: MAX_VALID_AQI,
            impute_quality_index: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_significance_level"))]
pub struct AnalysisConfig {
    #[validate(length(min = 1))]
    pub trend_pollutant: String,

    #[validate(range(min = 1))]
    pub top_n: usize,

    pub significance_level: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trend_pollutant: DEFAULT_TREND_POLLUTANT.to_string(),
            top_n: DEFAULT_TOP_N,
            significance_level: ANOVA_SIGNIFICANCE_LEVEL,
        }
    }
}

fn validate_quality_bounds(config: &CleanerConfig) -> std::result::Result<(), ValidationError> {
    if !config.quality_min.is_finite()
        || !config.quality_max.is_finite()
        || config.quality_min > config.quality_max
    {
        return Err(ValidationError::new("quality_bounds"));
    }
    Ok(())
}

fn validate_significance_level(
    config: &AnalysisConfig,
) -> std::result::Result<(), ValidationError> {
    if !(config.significance_level > 0.0 && config.significance_level < 1.0) {
        return Err(ValidationError::new("significance_level"));
    }
    Ok(())
}

impl AppConfig {
    /// Load configuration, reading `path` if given or the default file if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: AppConfig = Config::builder()
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}
