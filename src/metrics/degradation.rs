// Per-compound tire degradation trend

use crate::config::AnalysisConfig;
use crate::filter::{group_by_compound, timed_laps};
use crate::session::{Compound, LapRecord};
use crate::stats;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Degradation summary for one compound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DegradationEntry {
    pub compound: Compound,
    /// Signed trend in seconds per lap: (last - first) / count
    pub rate_per_lap_s: f64,
    pub lap_count: usize,
    pub average_lap_time_s: f64,
}

/// Coarse degradation estimate from the first and last timed lap on each compound
///
/// This is an endpoint difference, not a regression slope: it reports the
/// trend over the whole run on a compound and is sensitive to outliers at
/// either end.
#[derive(Debug, Clone)]
pub struct DegradationAnalyzer {
    /// Compounds need strictly more timed laps than this
    min_laps: usize,
}

impl Default for DegradationAnalyzer {
    fn default() -> Self {
        Self { min_laps: 3 }
    }
}

impl DegradationAnalyzer {
    pub fn new(min_laps: usize) -> Self {
        Self { min_laps }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.degradation_min_laps)
    }

    /// Analyze one driver's laps (in lap-number order)
    pub fn analyze(&self, laps: &[&LapRecord]) -> BTreeMap<Compound, DegradationEntry> {
        let mut result = BTreeMap::new();

        for (compound, group) in group_by_compound(laps) {
            let times: Vec<f64> = timed_laps(&group).iter().map(|t| t.lap_time_s).collect();
            if times.len() <= self.min_laps {
                debug!(
                    "skipping {}: {} timed laps (need > {})",
                    compound,
                    times.len(),
                    self.min_laps
                );
                continue;
            }

            let (Some(first), Some(last), Some(average)) =
                (times.first(), times.last(), stats::mean(&times))
            else {
                continue;
            };

            result.insert(
                compound,
                DegradationEntry {
                    compound,
                    rate_per_lap_s: (last - first) / times.len() as f64,
                    lap_count: times.len(),
                    average_lap_time_s: average,
                },
            );
        }

        result
    }
}
