//! Lapwise - derived lap metrics for motorsport timing data
//!
//! This library turns a session's lap table (and, on demand, per-lap
//! telemetry) into the metrics a race dashboard shows: stints, tire
//! degradation, sector profiles, consistency scores, gaps between drivers,
//! speed traps and pace summaries.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod filter;
pub mod json_output;
pub mod metrics;
pub mod report;
pub mod session;
pub mod standings;
pub mod stats;
pub mod text_output;
