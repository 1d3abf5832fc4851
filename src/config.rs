//! Analysis configuration
//!
//! Thresholds for the derived-metric analyzers. The defaults reproduce the
//! dashboard's reference behavior; a TOML file can override any subset:
//!
//! ```toml
//! consistency_trim_factor = 1.07
//! speed_trap_workers = 8
//!
//! [progression_band]
//! low = 0.85
//! high = 1.15
//! ```

use crate::filter::{BandError, MedianBand};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid {field}: {source}")]
    Band {
        field: &'static str,
        #[source]
        source: BandError,
    },

    #[error("consistency_trim_factor must be >= 1.0, got {0}")]
    TrimFactor(f64),

    #[error("speed_trap_workers must be >= 1")]
    Workers,
}

/// Configuration for the derived-metric analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Band for pace-distribution charts (slow outliers only)
    pub pace_band: MedianBand,

    /// Band for lap-time progression charts
    pub progression_band: MedianBand,

    /// A compound is reported only with strictly more valid laps than this
    pub degradation_min_laps: usize,

    /// Consistency is scored only with strictly more clean laps than this
    pub consistency_min_laps: usize,

    /// Clean laps slower than `median * factor` are dropped before scoring
    pub consistency_trim_factor: f64,

    /// Worker threads for per-lap telemetry fetches
    pub speed_trap_workers: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pace_band: MedianBand::PACE_DISTRIBUTION,
            progression_band: MedianBand::PROGRESSION,
            degradation_min_laps: 3,
            consistency_min_laps: 5,
            consistency_trim_factor: 1.1,
            speed_trap_workers: 4,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pace_band
            .validate()
            .map_err(|source| ConfigError::Band {
                field: "pace_band",
                source,
            })?;
        self.progression_band
            .validate()
            .map_err(|source| ConfigError::Band {
                field: "progression_band",
                source,
            })?;

        if !(self.consistency_trim_factor >= 1.0 && self.consistency_trim_factor.is_finite()) {
            return Err(ConfigError::TrimFactor(self.consistency_trim_factor));
        }

        if self.speed_trap_workers == 0 {
            return Err(ConfigError::Workers);
        }

        Ok(())
    }
}
