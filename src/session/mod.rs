//! Session data model: the lap table and the telemetry accessor
//!
//! A `SessionData` value is the explicit context handed to every analyzer.
//! It owns the lap table for one season/event/session triple and, optionally,
//! an on-demand per-lap telemetry source. Nothing here is global: two sessions
//! can be analyzed side by side without interfering.
//!
//! All nullable fields of the upstream record set are `Option`-typed and the
//! presence of every column is checked once, at load time (see [`loader`]).

pub mod loader;
mod seconds;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised when a lap table or standings table violates its input contract
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected a JSON array of records")]
    NotAnArray,

    #[error("Record {row} is not a JSON object")]
    NotAnObject { row: usize },

    #[error("Record {row} is missing required column '{column}'")]
    MissingColumn { row: usize, column: &'static str },

    #[error("Record {row} has non-positive lap number")]
    NonPositiveLapNumber { row: usize },

    #[error("Driver {driver} has duplicate lap number {lap_number}")]
    DuplicateLap { driver: String, lap_number: u32 },

    #[error("Unknown tire compound: {0}")]
    UnknownCompound(String),
}

/// Result type for session loading operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Tire compound classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Compound {
    Soft,
    Medium,
    Hard,
    Intermediate,
    Wet,
    Unknown,
}

impl Compound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compound::Soft => "SOFT",
            Compound::Medium => "MEDIUM",
            Compound::Hard => "HARD",
            Compound::Intermediate => "INTERMEDIATE",
            Compound::Wet => "WET",
            Compound::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Compound {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SOFT" => Ok(Compound::Soft),
            "MEDIUM" => Ok(Compound::Medium),
            "HARD" => Ok(Compound::Hard),
            "INTERMEDIATE" => Ok(Compound::Intermediate),
            "WET" => Ok(Compound::Wet),
            "UNKNOWN" => Ok(Compound::Unknown),
            _ => Err(SessionError::UnknownCompound(s.to_string())),
        }
    }
}

impl TryFrom<String> for Compound {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Compound> for String {
    fn from(compound: Compound) -> Self {
        compound.as_str().to_string()
    }
}

/// One driver's lap, as recorded by the session loader
///
/// Durations are serialized as floating-point seconds. Pit timestamps are
/// session-relative offsets; only their presence matters to the analyzers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LapRecord {
    pub driver: String,
    pub lap_number: u32,
    #[serde(with = "seconds")]
    pub lap_time: Option<Duration>,
    #[serde(with = "seconds")]
    pub sector1_time: Option<Duration>,
    #[serde(with = "seconds")]
    pub sector2_time: Option<Duration>,
    #[serde(with = "seconds")]
    pub sector3_time: Option<Duration>,
    pub compound: Option<Compound>,
    #[serde(with = "seconds")]
    pub pit_in_time: Option<Duration>,
    #[serde(with = "seconds")]
    pub pit_out_time: Option<Duration>,
    pub is_accurate: bool,
    pub position: Option<u32>,
}

impl LapRecord {
    /// Create an accurate lap with every nullable field empty
    pub fn new(driver: impl Into<String>, lap_number: u32) -> Self {
        Self {
            driver: driver.into(),
            lap_number,
            lap_time: None,
            sector1_time: None,
            sector2_time: None,
            sector3_time: None,
            compound: None,
            pit_in_time: None,
            pit_out_time: None,
            is_accurate: true,
            position: None,
        }
    }

    pub fn with_lap_time(mut self, seconds: f64) -> Self {
        self.lap_time = Some(Duration::from_secs_f64(seconds));
        self
    }

    pub fn with_sectors(mut self, s1: f64, s2: f64, s3: f64) -> Self {
        self.sector1_time = Some(Duration::from_secs_f64(s1));
        self.sector2_time = Some(Duration::from_secs_f64(s2));
        self.sector3_time = Some(Duration::from_secs_f64(s3));
        self
    }

    pub fn with_compound(mut self, compound: Compound) -> Self {
        self.compound = Some(compound);
        self
    }

    pub fn with_pit_in(mut self, session_time_s: f64) -> Self {
        self.pit_in_time = Some(Duration::from_secs_f64(session_time_s));
        self
    }

    pub fn with_pit_out(mut self, session_time_s: f64) -> Self {
        self.pit_out_time = Some(Duration::from_secs_f64(session_time_s));
        self
    }

    pub fn with_position(mut self, position: u32) -> Self {
        self.position = Some(position);
        self
    }

    pub fn inaccurate(mut self) -> Self {
        self.is_accurate = false;
        self
    }

    /// Lap time in seconds, if the lap was timed
    pub fn lap_time_s(&self) -> Option<f64> {
        self.lap_time.map(|d| d.as_secs_f64())
    }

    /// Sector time in seconds for sector 1, 2 or 3
    pub fn sector_time_s(&self, sector: usize) -> Option<f64> {
        let time = match sector {
            1 => self.sector1_time,
            2 => self.sector2_time,
            3 => self.sector3_time,
            _ => None,
        };
        time.map(|d| d.as_secs_f64())
    }

    /// The lap ended in the pit lane
    pub fn is_pit_in(&self) -> bool {
        self.pit_in_time.is_some()
    }

    /// The lap started from the pit lane
    pub fn is_pit_out(&self) -> bool {
        self.pit_out_time.is_some()
    }
}

/// Immutable lap table for one session
#[derive(Debug, Clone, Default)]
pub struct LapTable {
    laps: Vec<LapRecord>,
}

impl LapTable {
    /// Build a table, rejecting lap numbers of zero and duplicate (driver, lap) pairs
    pub fn new(laps: Vec<LapRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(laps.len());
        for (row, lap) in laps.iter().enumerate() {
            if lap.lap_number == 0 {
                return Err(SessionError::NonPositiveLapNumber { row });
            }
            if !seen.insert((lap.driver.as_str(), lap.lap_number)) {
                return Err(SessionError::DuplicateLap {
                    driver: lap.driver.clone(),
                    lap_number: lap.lap_number,
                });
            }
        }
        Ok(Self { laps })
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn len(&self) -> usize {
        self.laps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.laps.is_empty()
    }

    /// Driver codes in order of first appearance
    pub fn drivers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.laps
            .iter()
            .map(|lap| lap.driver.as_str())
            .filter(|driver| seen.insert(*driver))
            .collect()
    }

    pub fn contains_driver(&self, driver: &str) -> bool {
        self.laps.iter().any(|lap| lap.driver == driver)
    }

    /// All laps for one driver, in lap-number order
    pub fn driver_laps(&self, driver: &str) -> Vec<&LapRecord> {
        let mut laps: Vec<&LapRecord> = self.laps.iter().filter(|l| l.driver == driver).collect();
        laps.sort_by_key(|l| l.lap_number);
        laps
    }
}

/// One telemetry sample along a lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Distance along the lap in meters
    pub distance: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Throttle application, 0-100
    pub throttle: f64,
    pub brake: bool,
    pub gear: u8,
    pub x: f64,
    pub y: f64,
}

/// Errors from a single per-lap telemetry fetch
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("No telemetry for {driver} lap {lap_number}")]
    NotFound { driver: String, lap_number: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid telemetry JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Telemetry for {driver} lap {lap_number} has no samples")]
    Empty { driver: String, lap_number: u32 },
}

/// On-demand per-lap telemetry accessor
///
/// Implementations are called from worker threads, one lap at a time.
pub trait TelemetrySource: Send + Sync {
    fn lap_telemetry(
        &self,
        driver: &str,
        lap_number: u32,
    ) -> std::result::Result<Vec<TelemetrySample>, TelemetryError>;
}

/// Explicit analysis context: lap table plus optional telemetry accessor
pub struct SessionData {
    laps: LapTable,
    telemetry: Option<Box<dyn TelemetrySource>>,
}

impl SessionData {
    pub fn new(laps: LapTable) -> Self {
        Self {
            laps,
            telemetry: None,
        }
    }

    pub fn with_telemetry(mut self, source: impl TelemetrySource + 'static) -> Self {
        self.telemetry = Some(Box::new(source));
        self
    }

    pub fn laps(&self) -> &LapTable {
        &self.laps
    }

    pub fn telemetry(&self) -> Option<&dyn TelemetrySource> {
        self.telemetry.as_deref()
    }
}

impl fmt::Debug for SessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionData")
            .field("laps", &self.laps.len())
            .field("telemetry", &self.telemetry.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_parse_case_insensitive() {
        assert_eq!("soft".parse::<Compound>().unwrap(), Compound::Soft);
        assert_eq!("INTERMEDIATE".parse::<Compound>().unwrap(), Compound::Intermediate);
        assert!("HYPERSOFT".parse::<Compound>().is_err());
    }

    #[test]
    fn test_compound_display_roundtrips_through_parse() {
        for compound in [Compound::Soft, Compound::Medium, Compound::Hard, Compound::Wet] {
            assert_eq!(compound.to_string().parse::<Compound>().unwrap(), compound);
        }
    }

    #[test]
    fn test_lap_table_rejects_duplicates() {
        let laps = vec![LapRecord::new("VER", 1), LapRecord::new("VER", 1)];
        let err = LapTable::new(laps).unwrap_err();
        assert!(matches!(err, SessionError::DuplicateLap { lap_number: 1, .. }));
    }

    #[test]
    fn test_lap_table_rejects_lap_zero() {
        let err = LapTable::new(vec![LapRecord::new("VER", 0)]).unwrap_err();
        assert!(matches!(err, SessionError::NonPositiveLapNumber { row: 0 }));
    }

    #[test]
    fn test_driver_laps_sorted_by_lap_number() {
        let table = LapTable::new(vec![
            LapRecord::new("VER", 3),
            LapRecord::new("HAM", 1),
            LapRecord::new("VER", 1),
            LapRecord::new("VER", 2),
        ])
        .unwrap();

        let numbers: Vec<u32> = table.driver_laps("VER").iter().map(|l| l.lap_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(table.drivers(), vec!["VER", "HAM"]);
        assert!(table.driver_laps("LEC").is_empty());
    }

    #[test]
    fn test_sector_time_lookup() {
        let lap = LapRecord::new("VER", 1).with_sectors(30.0, 31.5, 29.25);
        assert_eq!(lap.sector_time_s(2), Some(31.5));
        assert_eq!(lap.sector_time_s(4), None);
    }

    #[test]
    fn test_session_data_without_telemetry() {
        let session = SessionData::new(LapTable::default());
        assert!(session.telemetry().is_none());
        assert!(format!("{:?}", session).contains("SessionData"));
    }
}
