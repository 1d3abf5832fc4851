// Derived lap metrics
//
// Pure functions over a session's lap table (and, for speed traps, per-lap
// telemetry). Each analyzer is independent; stints and degradation share the
// segmentation helpers in `crate::filter`.
//
// Absence of data is never an error here. An analyzer that cannot compute a
// value for a driver or compound omits it: `None`, an empty `Vec`, or a key
// missing from the result map. `AnalysisError` is reserved for requests that
// cannot be answered at all (unknown driver, degenerate input).

mod compare;
mod consistency;
mod degradation;
mod gap;
mod pace;
mod sectors;
mod speed_trap;
mod stint;

pub use compare::{head_to_head, DriverSummary, HeadToHead};
pub use consistency::{ConsistencyProfile, ConsistencyScorer};
pub use degradation::{DegradationAnalyzer, DegradationEntry};
pub use gap::{gap_series, GapPoint};
pub use pace::{
    average_clean_pace, fastest_laps, lap_progression, pace_distribution, qualifying_gaps,
    FastestLap, PoleGap,
};
pub use sectors::{sector_profile, sector_profiles, SectorProfile, SectorStat};
pub use speed_trap::{
    SpeedSampler, SpeedTrap, SPEED_TRAP_LAPS_PER_DRIVER, SPEED_TRAP_MAX_DRIVERS,
};
pub use stint::{build_stints, Stint};

use thiserror::Error;

/// Hard failures of an analysis request
#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("Driver {0} has no laps in this session")]
    UnknownDriver(String),

    #[error("Mean lap time must be positive, got {mean_s}s")]
    NonPositiveMeanLapTime { mean_s: f64 },

    #[error("No telemetry source attached to the session")]
    TelemetryUnavailable,
}

/// Result type for analysis requests
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests;
