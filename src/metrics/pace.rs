// Pace views: fastest laps, gaps to pole, clean-lap average and chart series

use crate::filter::{filter_by_median_band, filter_clean, timed_laps, MedianBand};
use crate::session::{Compound, LapRecord, LapTable};
use crate::stats;
use serde::Serialize;
use std::collections::BTreeMap;

/// A driver's quickest timed lap
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FastestLap {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time_s: f64,
    pub compound: Option<Compound>,
}

/// Fastest lap with its deficit to the quickest driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoleGap {
    pub driver: String,
    pub lap_number: u32,
    pub lap_time_s: f64,
    pub gap_to_pole_s: f64,
}

fn fastest_of(laps: &[&LapRecord]) -> Option<FastestLap> {
    let best = timed_laps(laps)
        .into_iter()
        .reduce(|best, t| if t.lap_time_s < best.lap_time_s { t } else { best })?;
    Some(FastestLap {
        driver: best.lap.driver.clone(),
        lap_number: best.lap.lap_number,
        lap_time_s: best.lap_time_s,
        compound: best.lap.compound,
    })
}

/// One entry per driver with a timed lap, quickest first
///
/// Ties between drivers are ordered by driver code; within a driver the
/// earliest of equal laps wins.
pub fn fastest_laps(table: &LapTable) -> Vec<FastestLap> {
    let mut result: Vec<FastestLap> = table
        .drivers()
        .into_iter()
        .filter_map(|driver| fastest_of(&table.driver_laps(driver)))
        .collect();
    result.sort_by(|a, b| {
        a.lap_time_s
            .total_cmp(&b.lap_time_s)
            .then_with(|| a.driver.cmp(&b.driver))
    });
    result
}

/// Fastest laps with the gap to the quickest one; empty if nobody set a time
pub fn qualifying_gaps(table: &LapTable) -> Vec<PoleGap> {
    let fastest = fastest_laps(table);
    let Some(pole) = fastest.first().map(|f| f.lap_time_s) else {
        return Vec::new();
    };
    fastest
        .into_iter()
        .map(|f| PoleGap {
            gap_to_pole_s: f.lap_time_s - pole,
            driver: f.driver,
            lap_number: f.lap_number,
            lap_time_s: f.lap_time_s,
        })
        .collect()
}

/// Mean lap time over clean, timed laps
pub fn average_clean_pace(laps: &[&LapRecord]) -> Option<f64> {
    let times: Vec<f64> = timed_laps(&filter_clean(laps))
        .iter()
        .map(|t| t.lap_time_s)
        .collect();
    stats::mean(&times)
}

/// Lap times for a box-plot view, band-filtered around the pooled median
///
/// The median is taken over all selected drivers together, so a driver far
/// off the pace of the group can lose most of their laps. Drivers left with
/// no laps are omitted.
pub fn pace_distribution<S: AsRef<str>>(
    table: &LapTable,
    drivers: &[S],
    band: MedianBand,
) -> BTreeMap<String, Vec<f64>> {
    let selected: Vec<&LapRecord> = table
        .laps()
        .iter()
        .filter(|lap| drivers.iter().any(|d| d.as_ref() == lap.driver))
        .collect();

    let mut result: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for t in filter_by_median_band(&timed_laps(&selected), band) {
        result
            .entry(t.lap.driver.clone())
            .or_default()
            .push(t.lap_time_s);
    }
    result
}

/// Per-driver `(lap_number, seconds)` series, band-filtered around each driver's own median
pub fn lap_progression<S: AsRef<str>>(
    table: &LapTable,
    drivers: &[S],
    band: MedianBand,
) -> BTreeMap<String, Vec<(u32, f64)>> {
    let mut result = BTreeMap::new();
    for driver in drivers {
        let driver = driver.as_ref();
        let series: Vec<(u32, f64)> =
            filter_by_median_band(&timed_laps(&table.driver_laps(driver)), band)
                .iter()
                .map(|t| (t.lap.lap_number, t.lap_time_s))
                .collect();
        if !series.is_empty() {
            result.insert(driver.to_string(), series);
        }
    }
    result
}
