//! Analysis results as handed to the output formatters

use crate::metrics::{
    ConsistencyProfile, DegradationEntry, GapPoint, HeadToHead, PoleGap, SectorProfile, SpeedTrap,
    Stint,
};
use crate::session::Compound;
use crate::standings::Standings;
use serde::Serialize;
use std::collections::BTreeMap;

/// One command's result
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Stints {
        driver: String,
        stints: Vec<Stint>,
    },
    Degradation {
        driver: String,
        compounds: BTreeMap<Compound, DegradationEntry>,
    },
    Sectors {
        drivers: BTreeMap<String, SectorProfile>,
    },
    Consistency {
        driver: String,
        profile: Option<ConsistencyProfile>,
    },
    Gap {
        driver_a: String,
        driver_b: String,
        laps: Vec<GapPoint>,
    },
    SpeedTrap {
        drivers: BTreeMap<String, SpeedTrap>,
    },
    Fastest {
        laps: Vec<PoleGap>,
    },
    Pace {
        drivers: BTreeMap<String, Vec<f64>>,
    },
    Progression {
        drivers: BTreeMap<String, Vec<(u32, f64)>>,
    },
    Compare(HeadToHead),
    Standings(Standings),
}

impl Report {
    /// Subcommand name that produced this report
    pub fn command(&self) -> &'static str {
        match self {
            Report::Stints { .. } => "stints",
            Report::Degradation { .. } => "degradation",
            Report::Sectors { .. } => "sectors",
            Report::Consistency { .. } => "consistency",
            Report::Gap { .. } => "gap",
            Report::SpeedTrap { .. } => "speed-trap",
            Report::Fastest { .. } => "fastest",
            Report::Pace { .. } => "pace",
            Report::Progression { .. } => "progression",
            Report::Compare(_) => "compare",
            Report::Standings(_) => "standings",
        }
    }

    /// True when the analysis produced nothing to show
    pub fn is_empty(&self) -> bool {
        match self {
            Report::Stints { stints, .. } => stints.is_empty(),
            Report::Degradation { compounds, .. } => compounds.is_empty(),
            Report::Sectors { drivers } => drivers.is_empty(),
            Report::Consistency { profile, .. } => profile.is_none(),
            Report::Gap { laps, .. } => laps.is_empty(),
            Report::SpeedTrap { drivers } => drivers.is_empty(),
            Report::Fastest { laps } => laps.is_empty(),
            Report::Pace { drivers } => drivers.is_empty(),
            Report::Progression { drivers } => drivers.is_empty(),
            Report::Compare(_) => false,
            Report::Standings(s) => s.drivers.is_empty() && s.teams.is_empty(),
        }
    }
}
