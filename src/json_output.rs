//! JSON output format for analysis reports

use crate::report::Report;
use serde::Serialize;

/// Versioned envelope around one report
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Crate version that produced the report
    pub version: String,
    /// Format name
    pub format: String,
    /// Subcommand that produced the report
    pub command: String,
    pub data: &'a Report,
}

impl<'a> JsonOutput<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "lapwise-json-v1".to_string(),
            command: report.command().to_string(),
            data: report,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
