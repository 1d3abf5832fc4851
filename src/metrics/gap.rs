// Lap-by-lap gap between two drivers

use crate::session::{LapRecord, LapTable};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// One lap completed by both drivers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapPoint {
    pub lap_number: u32,
    /// `lap_time(b) - lap_time(a)`; positive means `a` was faster on this lap
    pub time_delta_s: Option<f64>,
    /// Running sum of the deltas up to and including this lap
    ///
    /// Laps with an untimed side contribute nothing to the sum and report
    /// `None` here; later laps carry the total forward.
    pub cumulative_gap_s: Option<f64>,
    pub position_a: Option<u32>,
    pub position_b: Option<u32>,
}

/// Inner join of two drivers' laps on lap number, in lap-number order
///
/// Laps only one driver completed are dropped, so the output may skip lap
/// numbers. Empty if the drivers share no lap numbers.
pub fn gap_series(table: &LapTable, driver_a: &str, driver_b: &str) -> Vec<GapPoint> {
    let laps_b: BTreeMap<u32, &LapRecord> = table
        .driver_laps(driver_b)
        .into_iter()
        .map(|lap| (lap.lap_number, lap))
        .collect();

    let mut running = 0.0;
    let series: Vec<GapPoint> = table
        .driver_laps(driver_a)
        .into_iter()
        .filter_map(|a| laps_b.get(&a.lap_number).map(|b| (a, *b)))
        .map(|(a, b)| {
            let delta = match (a.lap_time_s(), b.lap_time_s()) {
                (Some(ta), Some(tb)) => Some(tb - ta),
                _ => None,
            };
            if let Some(d) = delta {
                running += d;
            }
            GapPoint {
                lap_number: a.lap_number,
                time_delta_s: delta,
                cumulative_gap_s: delta.map(|_| running),
                position_a: a.position,
                position_b: b.position,
            }
        })
        .collect();

    debug!(
        "{} vs {}: {} common laps",
        driver_a,
        driver_b,
        series.len()
    );
    series
}
