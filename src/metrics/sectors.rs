// Per-driver sector performance

use crate::filter::filter_accurate;
use crate::session::{LapRecord, LapTable};
use crate::stats;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Best and mean time for one sector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorStat {
    pub best_s: f64,
    pub mean_s: f64,
}

/// Sector statistics for one driver, indexed S1..S3
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorProfile {
    pub s1: SectorStat,
    pub s2: SectorStat,
    pub s3: SectorStat,
}

impl SectorProfile {
    pub fn sectors(&self) -> [SectorStat; 3] {
        [self.s1, self.s2, self.s3]
    }

    /// Sum of the best sectors: the theoretical best lap
    pub fn ideal_lap_s(&self) -> f64 {
        self.s1.best_s + self.s2.best_s + self.s3.best_s
    }
}

fn sector_stat(laps: &[&LapRecord], sector: usize) -> Option<SectorStat> {
    let times: Vec<f64> = laps.iter().filter_map(|l| l.sector_time_s(sector)).collect();
    Some(SectorStat {
        best_s: stats::min(&times)?,
        mean_s: stats::mean(&times)?,
    })
}

/// Sector profile from one driver's accurate laps
///
/// Each sector is sampled independently, so a lap missing only its S3 time
/// still contributes to S1 and S2. Returns `None` if any sector has no sample.
pub fn sector_profile(laps: &[&LapRecord]) -> Option<SectorProfile> {
    let accurate = filter_accurate(laps);
    Some(SectorProfile {
        s1: sector_stat(&accurate, 1)?,
        s2: sector_stat(&accurate, 2)?,
        s3: sector_stat(&accurate, 3)?,
    })
}

/// Sector profiles for the requested drivers; drivers without a full profile are omitted
pub fn sector_profiles<S: AsRef<str>>(
    table: &LapTable,
    drivers: &[S],
) -> BTreeMap<String, SectorProfile> {
    let mut result = BTreeMap::new();
    for driver in drivers {
        let driver = driver.as_ref();
        match sector_profile(&table.driver_laps(driver)) {
            Some(profile) => {
                result.insert(driver.to_string(), profile);
            }
            None => debug!("no complete sector profile for {}", driver),
        }
    }
    result
}
