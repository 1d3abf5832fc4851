// Speed-trap approximation from per-lap telemetry maxima
//
// Each (driver, lap) fetch is an independent job on a lock-free queue,
// drained by a small scoped worker pool. Workers send per-lap maxima over a
// channel; the merge sorts by (driver, lap) before reducing, so the result
// does not depend on completion order.

use super::AnalysisError;
use crate::config::AnalysisConfig;
use crate::session::{LapTable, SessionData, TelemetrySource};
use crate::stats;
use crossbeam::channel;
use crossbeam::queue::ArrayQueue;
use serde::Serialize;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// At most this many candidate drivers are sampled
pub const SPEED_TRAP_MAX_DRIVERS: usize = 5;

/// At most this many laps (the first ones, by lap number) per driver
pub const SPEED_TRAP_LAPS_PER_DRIVER: usize = 10;

/// Peak speeds for one driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedTrap {
    /// Highest speed seen on any sampled lap, km/h
    pub max_kph: f64,
    /// Mean of the per-lap maxima, km/h
    pub avg_max_kph: f64,
    /// Laps whose telemetry was fetched successfully
    pub laps_sampled: usize,
}

#[derive(Debug, Clone, Copy)]
struct Job {
    driver: usize,
    slot: usize,
    lap_number: u32,
}

#[derive(Debug, Clone, Copy)]
struct LapMax {
    driver: usize,
    slot: usize,
    speed: f64,
}

/// Bounded telemetry sampler
#[derive(Debug, Clone)]
pub struct SpeedSampler {
    workers: usize,
}

impl Default for SpeedSampler {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

impl SpeedSampler {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.speed_trap_workers)
    }

    /// Sample against the session's own telemetry accessor
    pub fn sample_session<S: AsRef<str>>(
        &self,
        session: &SessionData,
        candidates: &[S],
    ) -> super::Result<BTreeMap<String, SpeedTrap>> {
        let source = session
            .telemetry()
            .ok_or(AnalysisError::TelemetryUnavailable)?;
        Ok(self.sample(session.laps(), candidates, source))
    }

    /// Sample peak speeds for the first five candidate drivers
    ///
    /// A lap whose telemetry cannot be fetched, has no samples, or makes the
    /// source panic is skipped.
    /// Drivers with no successful lap are omitted.
    pub fn sample<S: AsRef<str>>(
        &self,
        table: &LapTable,
        candidates: &[S],
        source: &dyn TelemetrySource,
    ) -> BTreeMap<String, SpeedTrap> {
        let mut drivers: Vec<&str> = Vec::with_capacity(SPEED_TRAP_MAX_DRIVERS);
        for candidate in candidates.iter().take(SPEED_TRAP_MAX_DRIVERS) {
            let candidate = candidate.as_ref();
            if !drivers.contains(&candidate) {
                drivers.push(candidate);
            }
        }

        let jobs: Vec<Job> = drivers
            .iter()
            .enumerate()
            .flat_map(|(driver, code)| {
                table
                    .driver_laps(code)
                    .into_iter()
                    .take(SPEED_TRAP_LAPS_PER_DRIVER)
                    .enumerate()
                    .map(move |(slot, lap)| Job {
                        driver,
                        slot,
                        lap_number: lap.lap_number,
                    })
            })
            .collect();

        if jobs.is_empty() {
            return BTreeMap::new();
        }

        let mut maxima = self.run(&drivers, jobs, source);
        maxima.sort_by_key(|m| (m.driver, m.slot));

        let mut result = BTreeMap::new();
        for (index, code) in drivers.iter().enumerate() {
            let speeds: Vec<f64> = maxima
                .iter()
                .filter(|m| m.driver == index)
                .map(|m| m.speed)
                .collect();
            let (Some(max_kph), Some(avg_max_kph)) = (stats::max(&speeds), stats::mean(&speeds))
            else {
                debug!("no telemetry samples for {}", code);
                continue;
            };
            result.insert(
                code.to_string(),
                SpeedTrap {
                    max_kph,
                    avg_max_kph,
                    laps_sampled: speeds.len(),
                },
            );
        }
        result
    }

    fn run(&self, drivers: &[&str], jobs: Vec<Job>, source: &dyn TelemetrySource) -> Vec<LapMax> {
        let workers = self.workers.min(jobs.len());
        let queue = ArrayQueue::new(jobs.len());
        for job in jobs {
            if queue.push(job).is_err() {
                break;
            }
        }
        debug!("fetching {} laps on {} workers", queue.len(), workers);

        let (tx, rx) = channel::unbounded();
        let scoped = crossbeam::scope(|s| {
            for _ in 0..workers {
                let tx = tx.clone();
                let queue = &queue;
                s.spawn(move |_| {
                    while let Some(job) = queue.pop() {
                        if let Some(speed) = guarded_fetch(source, drivers[job.driver], job.lap_number)
                        {
                            let _ = tx.send(LapMax {
                                driver: job.driver,
                                slot: job.slot,
                                speed,
                            });
                        }
                    }
                });
            }
        });
        drop(tx);

        if scoped.is_err() {
            warn!("a telemetry worker died; keeping the laps fetched so far");
        }
        rx.iter().collect()
    }
}

/// A panicking source costs only the lap it panicked on
fn guarded_fetch(source: &dyn TelemetrySource, driver: &str, lap_number: u32) -> Option<f64> {
    panic::catch_unwind(AssertUnwindSafe(|| fetch_lap_max(source, driver, lap_number)))
        .unwrap_or_else(|_| {
            warn!("{} lap {}: telemetry source panicked", driver, lap_number);
            None
        })
}

fn fetch_lap_max(source: &dyn TelemetrySource, driver: &str, lap_number: u32) -> Option<f64> {
    match source.lap_telemetry(driver, lap_number) {
        Ok(samples) => {
            let speeds: Vec<f64> = samples.iter().map(|s| s.speed).collect();
            let max = stats::max(&speeds);
            if max.is_none() {
                warn!("{} lap {}: telemetry has no samples", driver, lap_number);
            }
            max
        }
        Err(e) => {
            warn!("{} lap {}: {}", driver, lap_number, e);
            None
        }
    }
}
