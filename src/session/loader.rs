//! Lap table and telemetry loaders
//!
//! The lap table is a JSON array of records with a fixed column set. Every
//! column must be present on every record (nullable columns may hold `null`);
//! a record missing a column is a hard error rather than an implicit null.
//!
//! Telemetry is read lazily, one lap per call, from a directory laid out as
//! `<root>/<DRIVER>/<lap_number>.json`, each file holding an array of samples.

use super::{LapRecord, LapTable, Result, SessionError, TelemetryError, TelemetrySample, TelemetrySource};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns every lap record must carry
pub const LAP_COLUMNS: [&str; 11] = [
    "driver",
    "lapNumber",
    "lapTime",
    "sector1Time",
    "sector2Time",
    "sector3Time",
    "compound",
    "pitInTime",
    "pitOutTime",
    "isAccurate",
    "position",
];

/// Return the first required column absent from a record
pub(crate) fn missing_column(
    record: &Map<String, Value>,
    columns: &[&'static str],
) -> Option<&'static str> {
    columns.iter().copied().find(|c| !record.contains_key(*c))
}

/// Split a JSON array into objects, checking the column set of each
pub(crate) fn checked_records(
    value: Value,
    columns: &[&'static str],
) -> Result<Vec<Map<String, Value>>> {
    let Value::Array(rows) = value else {
        return Err(SessionError::NotAnArray);
    };

    rows.into_iter()
        .enumerate()
        .map(|(row, value)| {
            let Value::Object(record) = value else {
                return Err(SessionError::NotAnObject { row });
            };
            if let Some(column) = missing_column(&record, columns) {
                return Err(SessionError::MissingColumn { row, column });
            }
            Ok(record)
        })
        .collect()
}

/// Parse a lap table from a JSON string
pub fn parse_laps(json: &str) -> Result<LapTable> {
    let value: Value = serde_json::from_str(json)?;
    let records = checked_records(value, &LAP_COLUMNS)?;

    let laps = records
        .into_iter()
        .map(|record| serde_json::from_value::<LapRecord>(Value::Object(record)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    LapTable::new(laps)
}

/// Load a lap table from a JSON file
pub fn load_laps(path: &Path) -> Result<LapTable> {
    let json = fs::read_to_string(path)?;
    let table = parse_laps(&json)?;
    info!(
        "loaded {} laps for {} drivers from {}",
        table.len(),
        table.drivers().len(),
        path.display()
    );
    Ok(table)
}

/// Telemetry stored as one JSON file per driver lap
#[derive(Debug, Clone)]
pub struct TelemetryDir {
    root: PathBuf,
}

impl TelemetryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn lap_path(&self, driver: &str, lap_number: u32) -> PathBuf {
        self.root.join(driver).join(format!("{lap_number}.json"))
    }
}

impl TelemetrySource for TelemetryDir {
    fn lap_telemetry(
        &self,
        driver: &str,
        lap_number: u32,
    ) -> std::result::Result<Vec<TelemetrySample>, TelemetryError> {
        let path = self.lap_path(driver, lap_number);
        if !path.is_file() {
            return Err(TelemetryError::NotFound {
                driver: driver.to_string(),
                lap_number,
            });
        }

        let json = fs::read_to_string(&path)?;
        let samples: Vec<TelemetrySample> = serde_json::from_str(&json)?;
        debug!("read {} samples from {}", samples.len(), path.display());

        if samples.is_empty() {
            return Err(TelemetryError::Empty {
                driver: driver.to_string(),
                lap_number,
            });
        }
        Ok(samples)
    }
}
