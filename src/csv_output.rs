//! CSV output format for analysis reports
//!
//! Times are plain seconds with millisecond precision so spreadsheets can
//! compute with them; missing values are empty fields.

use crate::report::Report;

/// Header plus rows, rendered with RFC 4180 quoting
#[derive(Debug)]
pub struct CsvTable {
    header: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(header: &[&'static str]) -> Self {
        Self {
            header: header.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    pub fn to_csv(&self) -> String {
        let mut output = self.header.join(",");
        output.push('\n');

        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(|f| Self::escape_field(f)).collect();
            output.push_str(&fields.join(","));
            output.push('\n');
        }

        output
    }
}

fn secs(value: f64) -> String {
    format!("{:.3}", value)
}

fn opt_secs(value: Option<f64>) -> String {
    value.map(secs).unwrap_or_default()
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Build the CSV table for a report
pub fn table(report: &Report) -> CsvTable {
    match report {
        Report::Stints { driver, stints } => {
            let mut t = CsvTable::new(&[
                "driver",
                "stint",
                "compound",
                "lap_count",
                "start_lap",
                "end_lap",
                "average_lap_time_s",
            ]);
            for (i, s) in stints.iter().enumerate() {
                t.add_row(vec![
                    driver.clone(),
                    (i + 1).to_string(),
                    s.compound.to_string(),
                    s.lap_count.to_string(),
                    s.start_lap.to_string(),
                    s.end_lap.to_string(),
                    opt_secs(s.average_lap_time_s),
                ]);
            }
            t
        }
        Report::Degradation { driver, compounds } => {
            let mut t = CsvTable::new(&[
                "driver",
                "compound",
                "lap_count",
                "average_lap_time_s",
                "rate_per_lap_s",
            ]);
            for e in compounds.values() {
                t.add_row(vec![
                    driver.clone(),
                    e.compound.to_string(),
                    e.lap_count.to_string(),
                    secs(e.average_lap_time_s),
                    format!("{:.4}", e.rate_per_lap_s),
                ]);
            }
            t
        }
        Report::Sectors { drivers } => {
            let mut t = CsvTable::new(&[
                "driver", "s1_best", "s1_mean", "s2_best", "s2_mean", "s3_best", "s3_mean",
            ]);
            for (driver, p) in drivers {
                let mut row = vec![driver.clone()];
                for s in p.sectors() {
                    row.push(secs(s.best_s));
                    row.push(secs(s.mean_s));
                }
                t.add_row(row);
            }
            t
        }
        Report::Consistency { driver, profile } => {
            let mut t = CsvTable::new(&[
                "driver",
                "consistency_score",
                "std_dev_s",
                "mean_s",
                "laps_used",
            ]);
            if let Some(p) = profile {
                t.add_row(vec![
                    driver.clone(),
                    format!("{:.2}", p.consistency_score),
                    format!("{:.4}", p.std_dev_s),
                    secs(p.mean_s),
                    p.laps_used.to_string(),
                ]);
            }
            t
        }
        Report::Gap { laps, .. } => {
            let mut t = CsvTable::new(&[
                "lap_number",
                "time_delta_s",
                "cumulative_gap_s",
                "position_a",
                "position_b",
            ]);
            for p in laps {
                t.add_row(vec![
                    p.lap_number.to_string(),
                    opt_secs(p.time_delta_s),
                    opt_secs(p.cumulative_gap_s),
                    opt(p.position_a),
                    opt(p.position_b),
                ]);
            }
            t
        }
        Report::SpeedTrap { drivers } => {
            let mut t = CsvTable::new(&["driver", "max_kph", "avg_max_kph", "laps_sampled"]);
            for (driver, s) in drivers {
                t.add_row(vec![
                    driver.clone(),
                    format!("{:.1}", s.max_kph),
                    format!("{:.1}", s.avg_max_kph),
                    s.laps_sampled.to_string(),
                ]);
            }
            t
        }
        Report::Fastest { laps } => {
            let mut t = CsvTable::new(&["driver", "lap_number", "lap_time_s", "gap_to_pole_s"]);
            for lap in laps {
                t.add_row(vec![
                    lap.driver.clone(),
                    lap.lap_number.to_string(),
                    secs(lap.lap_time_s),
                    secs(lap.gap_to_pole_s),
                ]);
            }
            t
        }
        Report::Pace { drivers } => {
            let mut t = CsvTable::new(&["driver", "lap_time_s"]);
            for (driver, times) in drivers {
                for time in times {
                    t.add_row(vec![driver.clone(), secs(*time)]);
                }
            }
            t
        }
        Report::Progression { drivers } => {
            let mut t = CsvTable::new(&["driver", "lap_number", "lap_time_s"]);
            for (driver, series) in drivers {
                for (lap, time) in series {
                    t.add_row(vec![driver.clone(), lap.to_string(), secs(*time)]);
                }
            }
            t
        }
        Report::Compare(h2h) => {
            let mut t = CsvTable::new(&[
                "driver",
                "lap_count",
                "fastest_lap_s",
                "average_clean_pace_s",
                "consistency_score",
            ]);
            for s in [&h2h.a, &h2h.b] {
                t.add_row(vec![
                    s.driver.clone(),
                    s.lap_count.to_string(),
                    opt_secs(s.fastest_lap_s),
                    opt_secs(s.average_clean_pace_s),
                    s.consistency
                        .as_ref()
                        .map(|c| format!("{:.2}", c.consistency_score))
                        .unwrap_or_default(),
                ]);
            }
            t
        }
        Report::Standings(s) => {
            let mut t = CsvTable::new(&["table", "position", "name", "team", "points", "wins"]);
            for d in &s.drivers {
                t.add_row(vec![
                    "drivers".to_string(),
                    d.position.to_string(),
                    d.driver.clone(),
                    d.team.clone(),
                    d.points.to_string(),
                    d.wins.to_string(),
                ]);
            }
            for team in &s.teams {
                t.add_row(vec![
                    "teams".to_string(),
                    team.position.to_string(),
                    team.team.clone(),
                    String::new(),
                    team.points.to_string(),
                    team.wins.to_string(),
                ]);
            }
            t
        }
    }
}
