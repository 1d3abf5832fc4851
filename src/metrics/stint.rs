// Stint segmentation from pit-in events

use crate::filter::{dominant_compound, timed_laps};
use crate::session::{Compound, LapRecord};
use crate::stats;
use serde::Serialize;
use tracing::debug;

/// A contiguous run of laps between pit stops
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stint {
    /// Most frequent compound in the stint, `Unknown` if none was recorded
    pub compound: Compound,
    pub lap_count: usize,
    pub start_lap: u32,
    pub end_lap: u32,
    /// Mean of the timed laps; `None` when no lap in the stint was timed
    pub average_lap_time_s: Option<f64>,
}

impl Stint {
    fn from_segment(segment: &[&LapRecord]) -> Option<Self> {
        let start_lap = segment.iter().map(|l| l.lap_number).min()?;
        let end_lap = segment.iter().map(|l| l.lap_number).max()?;
        let times: Vec<f64> = timed_laps(segment).iter().map(|t| t.lap_time_s).collect();

        Some(Self {
            compound: dominant_compound(segment).unwrap_or(Compound::Unknown),
            lap_count: segment.len(),
            start_lap,
            end_lap,
            average_lap_time_s: stats::mean(&times),
        })
    }
}

/// Partition one driver's laps into stints
///
/// `laps` must be in lap-number order (as returned by
/// [`LapTable::driver_laps`](crate::session::LapTable::driver_laps)). A lap
/// with a pit-in timestamp is the last lap of its stint; whatever follows the
/// final pit-in forms a trailing stint. No lap is dropped or duplicated.
pub fn build_stints(laps: &[&LapRecord]) -> Vec<Stint> {
    let mut stints = Vec::new();
    let mut segment: Vec<&LapRecord> = Vec::new();

    for lap in laps {
        segment.push(*lap);
        if lap.is_pit_in() {
            stints.extend(Stint::from_segment(&segment));
            segment.clear();
        }
    }
    stints.extend(Stint::from_segment(&segment));

    debug!("built {} stints from {} laps", stints.len(), laps.len());
    stints
}
