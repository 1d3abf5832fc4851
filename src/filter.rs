//! Lap segmentation and filtering utilities
//!
//! - Clean laps: no pit-in and no pit-out event
//! - Accurate laps: flagged representative and not a pit-out lap
//! - Median band: keep timed laps within `[median * low, median * high]`
//! - Compound grouping in first-appearance order
//!
//! None of these fail on empty input; an empty result means "no data".

use crate::session::{Compound, LapRecord};
use crate::stats;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Laps with neither a pit-in nor a pit-out timestamp
pub fn filter_clean<'a>(laps: &[&'a LapRecord]) -> Vec<&'a LapRecord> {
    laps.iter()
        .copied()
        .filter(|lap| !lap.is_pit_in() && !lap.is_pit_out())
        .collect()
}

/// Laps flagged accurate that did not start from the pit lane
pub fn filter_accurate<'a>(laps: &[&'a LapRecord]) -> Vec<&'a LapRecord> {
    laps.iter()
        .copied()
        .filter(|lap| lap.is_accurate && !lap.is_pit_out())
        .collect()
}

/// A lap paired with its lap time in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedLap<'a> {
    pub lap: &'a LapRecord,
    pub lap_time_s: f64,
}

/// Keep only laps with a recorded lap time, preserving order
pub fn timed_laps<'a>(laps: &[&'a LapRecord]) -> Vec<TimedLap<'a>> {
    laps.iter()
        .filter_map(|lap| {
            lap.lap_time_s().map(|lap_time_s| TimedLap {
                lap: *lap,
                lap_time_s,
            })
        })
        .collect()
}

#[derive(Error, Debug, PartialEq)]
pub enum BandError {
    #[error("Invalid band expression: {0}. Expected format: LOW,HIGH")]
    Syntax(String),

    #[error("Band bounds must satisfy 0 <= low <= high and high > 0, got [{low}, {high}]")]
    Bounds { low: f64, high: f64 },
}

/// Multiplicative band around the median lap time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MedianBand {
    pub low: f64,
    pub high: f64,
}

impl MedianBand {
    /// Pace-distribution band: drops only laps more than 15% slower than the median
    pub const PACE_DISTRIBUTION: MedianBand = MedianBand {
        low: 0.0,
        high: 1.15,
    };

    /// Progression band: symmetric 80%..120% of the median
    pub const PROGRESSION: MedianBand = MedianBand {
        low: 0.8,
        high: 1.2,
    };

    pub fn new(low: f64, high: f64) -> Result<Self, BandError> {
        let band = Self { low, high };
        band.validate()?;
        Ok(band)
    }

    pub fn validate(&self) -> Result<(), BandError> {
        let ok = self.low.is_finite()
            && self.high.is_finite()
            && self.low >= 0.0
            && self.high > 0.0
            && self.low <= self.high;
        if ok {
            Ok(())
        } else {
            Err(BandError::Bounds {
                low: self.low,
                high: self.high,
            })
        }
    }

    /// Inclusive band test relative to a given median
    pub fn contains(&self, value: f64, median: f64) -> bool {
        value >= median * self.low && value <= median * self.high
    }
}

impl fmt::Display for MedianBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

impl FromStr for MedianBand {
    type Err = BandError;

    /// Parse "LOW,HIGH", e.g. "0.8,1.2"
    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let Some((low, high)) = expr.split_once(',') else {
            return Err(BandError::Syntax(expr.to_string()));
        };
        let low: f64 = low
            .trim()
            .parse()
            .map_err(|_| BandError::Syntax(expr.to_string()))?;
        let high: f64 = high
            .trim()
            .parse()
            .map_err(|_| BandError::Syntax(expr.to_string()))?;
        Self::new(low, high)
    }
}

/// Keep laps whose time lies within the band around the median of `laps`
pub fn filter_by_median_band<'a>(laps: &[TimedLap<'a>], band: MedianBand) -> Vec<TimedLap<'a>> {
    let times: Vec<f64> = laps.iter().map(|t| t.lap_time_s).collect();
    let Some(median) = stats::median(&times) else {
        return Vec::new();
    };

    laps.iter()
        .copied()
        .filter(|t| band.contains(t.lap_time_s, median))
        .collect()
}

/// Group laps by compound tag in first-appearance order; untagged laps are skipped
pub fn group_by_compound<'a>(laps: &[&'a LapRecord]) -> Vec<(Compound, Vec<&'a LapRecord>)> {
    let mut groups: Vec<(Compound, Vec<&'a LapRecord>)> = Vec::new();
    for lap in laps {
        let Some(compound) = lap.compound else {
            continue;
        };
        match groups.iter_mut().find(|(c, _)| *c == compound) {
            Some((_, group)) => group.push(*lap),
            None => groups.push((compound, vec![*lap])),
        }
    }
    groups
}

/// Most frequent compound; ties go to the first one encountered
pub fn dominant_compound(laps: &[&LapRecord]) -> Option<Compound> {
    let groups = group_by_compound(laps);
    let mut best: Option<(Compound, usize)> = None;
    for (compound, group) in groups {
        if best.map_or(true, |(_, count)| group.len() > count) {
            best = Some((compound, group.len()));
        }
    }
    best.map(|(compound, _)| compound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(n: u32, secs: f64) -> LapRecord {
        LapRecord::new("VER", n).with_lap_time(secs)
    }

    #[test]
    fn test_filter_clean_excludes_in_and_out_laps() {
        let laps = vec![
            lap(1, 90.0),
            lap(2, 110.0).with_pit_in(200.0),
            lap(3, 112.0).with_pit_out(225.0),
            lap(4, 90.5),
        ];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let clean: Vec<u32> = filter_clean(&refs).iter().map(|l| l.lap_number).collect();
        assert_eq!(clean, vec![1, 4]);
    }

    #[test]
    fn test_filter_accurate_keeps_pit_in_laps() {
        let laps = vec![
            lap(1, 90.0).inaccurate(),
            lap(2, 110.0).with_pit_in(200.0),
            lap(3, 112.0).with_pit_out(225.0),
            lap(4, 90.5),
        ];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let accurate: Vec<u32> = filter_accurate(&refs).iter().map(|l| l.lap_number).collect();
        assert_eq!(accurate, vec![2, 4]);
    }

    #[test]
    fn test_laps_equal_to_median_stay_in_band() {
        let laps = vec![lap(1, 90.3), lap(2, 90.3), lap(3, 90.3)];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let band = MedianBand::new(1.0, 1.15).unwrap();
        assert_eq!(filter_by_median_band(&timed_laps(&refs), band).len(), 3);
    }

    #[test]
    fn test_timed_laps_drop_nulls() {
        let laps = vec![lap(1, 90.0), LapRecord::new("VER", 2), lap(3, 91.0)];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let timed = timed_laps(&refs);
        assert_eq!(timed.len(), 2);
        assert_eq!(timed[1].lap.lap_number, 3);
    }

    #[test]
    fn test_median_band_empty_input() {
        assert!(filter_by_median_band(&[], MedianBand::PROGRESSION).is_empty());
    }

    #[test]
    fn test_median_band_symmetric() {
        let laps = vec![lap(1, 50.0), lap(2, 90.0), lap(3, 91.0), lap(4, 92.0), lap(5, 140.0)];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let kept = filter_by_median_band(&timed_laps(&refs), MedianBand::PROGRESSION);
        let numbers: Vec<u32> = kept.iter().map(|t| t.lap.lap_number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
    }

    #[test]
    fn test_pace_band_keeps_fast_laps() {
        let laps = vec![lap(1, 70.0), lap(2, 90.0), lap(3, 90.0), lap(4, 120.0)];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let kept = filter_by_median_band(&timed_laps(&refs), MedianBand::PACE_DISTRIBUTION);
        let numbers: Vec<u32> = kept.iter().map(|t| t.lap.lap_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_band_bounds_inclusive() {
        let band = MedianBand::new(1.0, 1.1).unwrap();
        assert!(band.contains(100.0, 100.0));
        assert!(band.contains(110.0, 100.0));
        assert!(!band.contains(99.99, 100.0));
    }

    #[test]
    fn test_band_parse() {
        assert_eq!("0.8,1.2".parse::<MedianBand>().unwrap(), MedianBand::PROGRESSION);
        assert_eq!(" 0 , 1.15 ".parse::<MedianBand>().unwrap(), MedianBand::PACE_DISTRIBUTION);
        assert!(matches!("1.2".parse::<MedianBand>(), Err(BandError::Syntax(_))));
        assert!(matches!("1.2,0.8".parse::<MedianBand>(), Err(BandError::Bounds { .. })));
    }

    #[test]
    fn test_group_by_compound_first_appearance_order() {
        let laps = vec![
            lap(1, 90.0).with_compound(Compound::Medium),
            lap(2, 90.0),
            lap(3, 90.0).with_compound(Compound::Hard),
            lap(4, 90.0).with_compound(Compound::Medium),
        ];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        let groups = group_by_compound(&refs);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Compound::Medium);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Compound::Hard);
    }

    #[test]
    fn test_dominant_compound_tie_breaks_on_first_seen() {
        let laps = vec![
            lap(1, 90.0).with_compound(Compound::Hard),
            lap(2, 90.0).with_compound(Compound::Soft),
            lap(3, 90.0).with_compound(Compound::Soft),
            lap(4, 90.0).with_compound(Compound::Hard),
        ];
        let refs: Vec<&LapRecord> = laps.iter().collect();
        assert_eq!(dominant_compound(&refs), Some(Compound::Hard));
        assert_eq!(dominant_compound(&[]), None);
    }
}
