//! Championship standings tables
//!
//! Standings arrive as one JSON document with a driver table and a
//! constructor table:
//!
//! ```json
//! {
//!   "drivers": [{"position": 1, "driver": "VER", "team": "Red Bull", "points": 51, "wins": 2}],
//!   "teams":   [{"position": 1, "team": "Red Bull", "points": 87, "wins": 2}]
//! }
//! ```
//!
//! Both tables have a fixed column set, checked on every row.

use crate::session::loader::checked_records;
use crate::session::SessionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const DRIVER_COLUMNS: [&str; 5] = ["position", "driver", "team", "points", "wins"];
pub const TEAM_COLUMNS: [&str; 4] = ["position", "team", "points", "wins"];

#[derive(Error, Debug)]
pub enum StandingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Standings document must be a JSON object")]
    NotAnObject,

    #[error("Standings document is missing the '{0}' table")]
    MissingTable(&'static str),

    #[error("Invalid '{table}' table: {source}")]
    Table {
        table: &'static str,
        #[source]
        source: SessionError,
    },
}

pub type Result<T> = std::result::Result<T, StandingsError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverStanding {
    pub position: u32,
    pub driver: String,
    pub team: String,
    pub points: f64,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub position: u32,
    pub team: String,
    pub points: f64,
    pub wins: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standings {
    pub drivers: Vec<DriverStanding>,
    pub teams: Vec<TeamStanding>,
}

fn table<T: for<'de> Deserialize<'de>>(
    document: &mut serde_json::Map<String, Value>,
    name: &'static str,
    columns: &[&'static str],
) -> Result<Vec<T>> {
    let value = document
        .remove(name)
        .ok_or(StandingsError::MissingTable(name))?;
    let records = checked_records(value, columns).map_err(|source| StandingsError::Table {
        table: name,
        source,
    })?;

    let rows = records
        .into_iter()
        .map(|record| serde_json::from_value(Value::Object(record)))
        .collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

impl Standings {
    /// Parse a standings document; rows are kept in championship order
    pub fn parse(json: &str) -> Result<Self> {
        let Value::Object(mut document) = serde_json::from_str::<Value>(json)? else {
            return Err(StandingsError::NotAnObject);
        };

        let mut drivers: Vec<DriverStanding> = table(&mut document, "drivers", &DRIVER_COLUMNS)?;
        let mut teams: Vec<TeamStanding> = table(&mut document, "teams", &TEAM_COLUMNS)?;
        drivers.sort_by_key(|d| d.position);
        teams.sort_by_key(|t| t.position);

        Ok(Self { drivers, teams })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let standings = Self::parse(&fs::read_to_string(path)?)?;
        info!(
            "loaded standings: {} drivers, {} teams",
            standings.drivers.len(),
            standings.teams.len()
        );
        Ok(standings)
    }

    pub fn champion_driver(&self) -> Option<&DriverStanding> {
        self.drivers.iter().find(|d| d.position == 1)
    }

    pub fn champion_team(&self) -> Option<&TeamStanding> {
        self.teams.iter().find(|t| t.position == 1)
    }

    /// Points between the leader and `driver`; `None` if either is absent
    pub fn points_deficit(&self, driver: &str) -> Option<f64> {
        let leader = self.champion_driver()?;
        let entry = self.drivers.iter().find(|d| d.driver == driver)?;
        Some(leader.points - entry.points)
    }
}
