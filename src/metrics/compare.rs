// Head-to-head comparison of two drivers

use super::consistency::{ConsistencyProfile, ConsistencyScorer};
use super::gap::{gap_series, GapPoint};
use super::pace::average_clean_pace;
use super::sectors::{sector_profile, SectorProfile};
use super::{AnalysisError, Result};
use crate::config::AnalysisConfig;
use crate::filter::timed_laps;
use crate::session::SessionData;
use crate::stats;
use serde::Serialize;

/// One side of a head-to-head comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSummary {
    pub driver: String,
    pub lap_count: usize,
    pub fastest_lap_s: Option<f64>,
    pub average_clean_pace_s: Option<f64>,
    pub consistency: Option<ConsistencyProfile>,
    pub sectors: Option<SectorProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub a: DriverSummary,
    pub b: DriverSummary,
    /// Deltas are `b - a`
    pub gap: Vec<GapPoint>,
}

fn summarize(
    session: &SessionData,
    driver: &str,
    scorer: &ConsistencyScorer,
) -> Result<DriverSummary> {
    let laps = session.laps().driver_laps(driver);
    if laps.is_empty() {
        return Err(AnalysisError::UnknownDriver(driver.to_string()));
    }

    let times: Vec<f64> = timed_laps(&laps).iter().map(|t| t.lap_time_s).collect();
    Ok(DriverSummary {
        driver: driver.to_string(),
        lap_count: laps.len(),
        fastest_lap_s: stats::min(&times),
        average_clean_pace_s: average_clean_pace(&laps),
        consistency: scorer.score(&laps)?,
        sectors: sector_profile(&laps),
    })
}

/// Compare two drivers; both must have at least one lap in the session
pub fn head_to_head(
    session: &SessionData,
    driver_a: &str,
    driver_b: &str,
    config: &AnalysisConfig,
) -> Result<HeadToHead> {
    let scorer = ConsistencyScorer::from_config(config);
    Ok(HeadToHead {
        a: summarize(session, driver_a, &scorer)?,
        b: summarize(session, driver_b, &scorer)?,
        gap: gap_series(session.laps(), driver_a, driver_b),
    })
}
