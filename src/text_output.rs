//! Human-readable report rendering
//!
//! Lap and sector times are shown as `M:SS.mmm`, gaps with an explicit sign.

use crate::metrics::{DriverSummary, HeadToHead};
use crate::report::Report;
use std::fmt::{self, Write};

/// Format seconds as `M:SS.mmm`, e.g. 83.456 -> "1:23.456"
pub fn format_lap_time(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "-".to_string();
    }
    let sign = if seconds < 0.0 { "-" } else { "" };
    let millis = (seconds.abs() * 1000.0).round() as u64;
    format!(
        "{}{}:{:02}.{:03}",
        sign,
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}

/// Format a signed gap in seconds, e.g. "+0.412"
pub fn format_gap(seconds: f64) -> String {
    format!("{:+.3}", seconds)
}

fn opt_time(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_lap_time)
}

fn opt_gap(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_gap)
}

fn opt_position(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |p| format!("P{p}"))
}

fn summary_lines(out: &mut String, s: &DriverSummary) -> fmt::Result {
    writeln!(out, "{}", s.driver)?;
    writeln!(out, "  laps:        {}", s.lap_count)?;
    writeln!(out, "  fastest:     {}", opt_time(s.fastest_lap_s))?;
    writeln!(out, "  clean pace:  {}", opt_time(s.average_clean_pace_s))?;
    match &s.consistency {
        Some(c) => {
            writeln!(
                out,
                "  consistency: {:.1} (std {:.3}s)",
                c.consistency_score, c.std_dev_s
            )?;
        }
        None => {
            writeln!(out, "  consistency: -")?;
        }
    }
    if let Some(p) = &s.sectors {
        writeln!(
            out,
            "  best sectors: {} / {} / {}",
            format_lap_time(p.s1.best_s),
            format_lap_time(p.s2.best_s),
            format_lap_time(p.s3.best_s)
        )?;
    }
    Ok(())
}

fn compare(out: &mut String, h2h: &HeadToHead) -> fmt::Result {
    summary_lines(out, &h2h.a)?;
    summary_lines(out, &h2h.b)?;
    if let Some(last) = h2h.gap.iter().rev().find_map(|p| p.cumulative_gap_s) {
        writeln!(
            out,
            "Gap after {} common laps: {} ({} relative to {})",
            h2h.gap.len(),
            format_gap(last),
            h2h.b.driver,
            h2h.a.driver
        )?;
    }
    Ok(())
}

/// Render a report as aligned text
pub fn render(report: &Report) -> Result<String, fmt::Error> {
    let mut out = String::new();

    match report {
        Report::Stints { driver, stints } => {
            writeln!(out, "Stints for {driver}")?;
            writeln!(out, "{:<4} {:<13} {:>5} {:>9} {:>10}", "#", "COMPOUND", "LAPS", "RANGE", "AVG")?;
            for (i, s) in stints.iter().enumerate() {
                writeln!(
                    out,
                    "{:<4} {:<13} {:>5} {:>9} {:>10}",
                    i + 1,
                    s.compound,
                    s.lap_count,
                    format!("{}-{}", s.start_lap, s.end_lap),
                    opt_time(s.average_lap_time_s)
                )?;
            }
        }
        Report::Degradation { driver, compounds } => {
            writeln!(out, "Tire degradation for {driver}")?;
            writeln!(out, "{:<13} {:>5} {:>10} {:>12}", "COMPOUND", "LAPS", "AVG", "RATE s/LAP")?;
            for entry in compounds.values() {
                writeln!(
                    out,
                    "{:<13} {:>5} {:>10} {:>12}",
                    entry.compound,
                    entry.lap_count,
                    format_lap_time(entry.average_lap_time_s),
                    format_gap(entry.rate_per_lap_s)
                )?;
            }
        }
        Report::Sectors { drivers } => {
            writeln!(out, "{:<6} {:>10} {:>10} {:>10} {:>10}", "DRIVER", "S1", "S2", "S3", "IDEAL")?;
            for (driver, p) in drivers {
                writeln!(
                    out,
                    "{:<6} {:>10} {:>10} {:>10} {:>10}",
                    driver,
                    format_lap_time(p.s1.best_s),
                    format_lap_time(p.s2.best_s),
                    format_lap_time(p.s3.best_s),
                    format_lap_time(p.ideal_lap_s())
                )?;
            }
        }
        Report::Consistency { driver, profile } => {
            if let Some(p) = profile {
                writeln!(out, "Consistency for {driver}")?;
                writeln!(out, "  score:   {:.1}", p.consistency_score)?;
                writeln!(out, "  std dev: {:.3}s", p.std_dev_s)?;
                writeln!(out, "  mean:    {}", format_lap_time(p.mean_s))?;
                writeln!(out, "  laps:    {}", p.laps_used)?;
            }
        }
        Report::Gap {
            driver_a,
            driver_b,
            laps,
        } => {
            writeln!(out, "Gap {driver_b} relative to {driver_a}")?;
            writeln!(out, "{:>4} {:>9} {:>9} {:>4} {:>4}", "LAP", "DELTA", "TOTAL", "A", "B")?;
            for p in laps {
                writeln!(
                    out,
                    "{:>4} {:>9} {:>9} {:>4} {:>4}",
                    p.lap_number,
                    opt_gap(p.time_delta_s),
                    opt_gap(p.cumulative_gap_s),
                    opt_position(p.position_a),
                    opt_position(p.position_b)
                )?;
            }
        }
        Report::SpeedTrap { drivers } => {
            writeln!(out, "{:<6} {:>8} {:>8} {:>5}", "DRIVER", "MAX", "AVG MAX", "LAPS")?;
            for (driver, s) in drivers {
                writeln!(
                    out,
                    "{:<6} {:>8.1} {:>8.1} {:>5}",
                    driver, s.max_kph, s.avg_max_kph, s.laps_sampled
                )?;
            }
        }
        Report::Fastest { laps } => {
            writeln!(out, "{:>3} {:<6} {:>4} {:>10} {:>8}", "POS", "DRIVER", "LAP", "TIME", "GAP")?;
            for (i, lap) in laps.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3} {:<6} {:>4} {:>10} {:>8}",
                    i + 1,
                    lap.driver,
                    lap.lap_number,
                    format_lap_time(lap.lap_time_s),
                    format_gap(lap.gap_to_pole_s)
                )?;
            }
        }
        Report::Pace { drivers } => {
            writeln!(out, "{:<6} {:>5} {:>10} {:>10}", "DRIVER", "LAPS", "MEDIAN", "BEST")?;
            for (driver, times) in drivers {
                writeln!(
                    out,
                    "{:<6} {:>5} {:>10} {:>10}",
                    driver,
                    times.len(),
                    opt_time(crate::stats::median(times)),
                    opt_time(crate::stats::min(times))
                )?;
            }
        }
        Report::Progression { drivers } => {
            for (driver, series) in drivers {
                writeln!(out, "{driver}")?;
                for (lap, seconds) in series {
                    writeln!(out, "  {:>4} {:>10}", lap, format_lap_time(*seconds))?;
                }
            }
        }
        Report::Compare(h2h) => compare(&mut out, h2h)?,
        Report::Standings(s) => {
            writeln!(out, "Drivers")?;
            for d in &s.drivers {
                writeln!(
                    out,
                    "{:>3} {:<6} {:<20} {:>6} {:>3}",
                    d.position, d.driver, d.team, d.points, d.wins
                )?;
            }
            writeln!(out, "Constructors")?;
            for t in &s.teams {
                writeln!(out, "{:>3} {:<27} {:>6} {:>3}", t.position, t.team, t.points, t.wins)?;
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Stint;
    use crate::session::Compound;

    #[test]
    fn test_format_lap_time() {
        assert_eq!(format_lap_time(83.456), "1:23.456");
        assert_eq!(format_lap_time(59.9999), "1:00.000");
        assert_eq!(format_lap_time(5.0), "0:05.000");
        assert_eq!(format_lap_time(f64::NAN), "-");
    }

    #[test]
    fn test_format_gap_sign() {
        assert_eq!(format_gap(0.4121), "+0.412");
        assert_eq!(format_gap(-1.5), "-1.500");
    }

    #[test]
    fn test_render_stints() {
        let report = Report::Stints {
            driver: "NOR".to_string(),
            stints: vec![Stint {
                compound: Compound::Medium,
                lap_count: 18,
                start_lap: 1,
                end_lap: 18,
                average_lap_time_s: Some(95.25),
            }],
        };
        let text = render(&report).unwrap();
        assert!(text.contains("Stints for NOR"));
        assert!(text.contains("MEDIUM"));
        assert!(text.contains("1-18"));
        assert!(text.contains("1:35.250"));
    }
}
