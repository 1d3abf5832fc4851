// Lap-time consistency scoring

use super::{AnalysisError, Result};
use crate::config::AnalysisConfig;
use crate::filter::{filter_clean, timed_laps};
use crate::session::LapRecord;
use crate::stats;
use serde::Serialize;
use tracing::debug;

/// Dispersion of a driver's representative lap times
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyProfile {
    /// Sample standard deviation of the retained laps
    pub std_dev_s: f64,
    pub mean_s: f64,
    /// `100 * (1 - std_dev / mean)`, not clamped; can be negative
    pub consistency_score: f64,
    pub laps_used: usize,
}

/// Scores lap-time consistency over clean laps, trimming slow laps first
///
/// Only laps slower than `median * trim_factor` are dropped. Fast laps are
/// never trimmed.
#[derive(Debug, Clone)]
pub struct ConsistencyScorer {
    /// Clean laps needed: strictly more than this
    min_laps: usize,
    trim_factor: f64,
}

impl Default for ConsistencyScorer {
    fn default() -> Self {
        Self {
            min_laps: 5,
            trim_factor: 1.1,
        }
    }
}

impl ConsistencyScorer {
    pub fn new(min_laps: usize, trim_factor: f64) -> Self {
        Self {
            min_laps,
            trim_factor,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.consistency_min_laps, config.consistency_trim_factor)
    }

    /// Score one driver's laps
    ///
    /// `Ok(None)` means not enough data. A non-positive mean lap time is
    /// malformed input and is reported as an error.
    pub fn score(&self, laps: &[&LapRecord]) -> Result<Option<ConsistencyProfile>> {
        let clean = filter_clean(laps);
        if clean.len() <= self.min_laps {
            debug!(
                "{} clean laps, need more than {}",
                clean.len(),
                self.min_laps
            );
            return Ok(None);
        }

        let times: Vec<f64> = timed_laps(&clean).iter().map(|t| t.lap_time_s).collect();
        let Some(median) = stats::median(&times) else {
            return Ok(None);
        };

        let cutoff = median * self.trim_factor;
        let retained: Vec<f64> = times.into_iter().filter(|t| *t <= cutoff).collect();

        let (Some(mean), Some(std_dev)) = (stats::mean(&retained), stats::sample_std_dev(&retained))
        else {
            return Ok(None);
        };

        if mean <= 0.0 {
            return Err(AnalysisError::NonPositiveMeanLapTime { mean_s: mean });
        }

        Ok(Some(ConsistencyProfile {
            std_dev_s: std_dev,
            mean_s: mean,
            consistency_score: 100.0 * (1.0 - std_dev / mean),
            laps_used: retained.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laps(times: &[f64]) -> Vec<LapRecord> {
        times
            .iter()
            .enumerate()
            .map(|(i, &t)| LapRecord::new("ALO", i as u32 + 1).with_lap_time(t))
            .collect()
    }

    #[test]
    fn test_perfect_consistency_after_trim() {
        let laps = laps(&[90.0, 90.0, 90.0, 90.0, 90.0, 99.5]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let profile = ConsistencyScorer::default().score(&refs).unwrap().unwrap();
        assert_eq!(profile.laps_used, 5);
        assert_eq!(profile.std_dev_s, 0.0);
        assert!((profile.mean_s - 90.0).abs() < 1e-6);
        assert!((profile.consistency_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_millisecond_spread_is_not_perfect() {
        let laps = laps(&[90.001, 90.002, 90.003, 90.004, 90.005, 90.006]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let profile = ConsistencyScorer::default().score(&refs).unwrap().unwrap();
        assert_eq!(profile.laps_used, 6);
        assert!((profile.std_dev_s - 0.0018708).abs() < 1e-6);
        let expected = 100.0 * (1.0 - 0.0018708 / 90.0035);
        assert!((profile.consistency_score - expected).abs() < 1e-6);
        assert!(profile.consistency_score < 100.0);
    }

    #[test]
    fn test_lap_on_trim_cutoff_is_kept() {
        // median 100.0, cutoff 110.0
        let laps = laps(&[100.0, 100.0, 100.0, 100.0, 110.0, 100.0]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let profile = ConsistencyScorer::default().score(&refs).unwrap().unwrap();
        assert_eq!(profile.laps_used, 6);
    }

    #[test]
    fn test_five_clean_laps_is_no_data() {
        let laps = laps(&[90.0, 90.1, 90.2, 90.3, 90.4]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        assert_eq!(ConsistencyScorer::default().score(&refs).unwrap(), None);
    }

    #[test]
    fn test_pit_laps_do_not_count_towards_minimum() {
        let mut laps = laps(&[90.0, 90.1, 90.2, 90.3, 90.4, 90.5]);
        laps[5] = laps[5].clone().with_pit_in(600.0);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        assert_eq!(ConsistencyScorer::default().score(&refs).unwrap(), None);
    }

    #[test]
    fn test_fast_laps_are_not_trimmed() {
        let laps = laps(&[80.0, 90.0, 90.0, 90.0, 90.0, 90.0]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let profile = ConsistencyScorer::default().score(&refs).unwrap().unwrap();
        assert_eq!(profile.laps_used, 6);
        assert!(profile.consistency_score < 100.0);
    }

    #[test]
    fn test_score_formula() {
        let laps = laps(&[90.0, 91.0, 92.0, 90.0, 91.0, 92.0]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let p = ConsistencyScorer::default().score(&refs).unwrap().unwrap();
        let expected = 100.0 * (1.0 - p.std_dev_s / p.mean_s);
        assert!((p.consistency_score - expected).abs() < 1e-9);
        // sample std of {90,91,92,90,91,92} = sqrt(4/5)
        assert!((p.std_dev_s - 0.8_f64.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_all_zero_lap_times_is_an_error() {
        let laps = laps(&[0.0; 6]);
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let err = ConsistencyScorer::default().score(&refs).unwrap_err();
        assert!(matches!(err, AnalysisError::NonPositiveMeanLapTime { .. }));
    }

    #[test]
    fn test_untimed_clean_laps_yield_no_data() {
        let laps: Vec<LapRecord> = (1..=6).map(|n| LapRecord::new("ALO", n)).collect();
        let refs: Vec<&LapRecord> = laps.iter().collect();
        assert_eq!(ConsistencyScorer::default().score(&refs).unwrap(), None);
    }
}
