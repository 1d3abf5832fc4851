//! CLI argument parsing for lapwise

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for analysis reports
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "lapwise")]
#[command(version)]
#[command(about = "Derived lap metrics for motorsport timing data", long_about = None)]
pub struct Cli {
    /// Lap table (JSON array of lap records)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub laps: Option<PathBuf>,

    /// Per-lap telemetry directory laid out as DIR/<DRIVER>/<LAP>.json
    #[arg(short, long = "telemetry-dir", value_name = "DIR", global = true)]
    pub telemetry_dir: Option<PathBuf>,

    /// Analysis thresholds (TOML); defaults apply when omitted
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    #[command(flatten)]
    Session(SessionCommand),
    /// Championship standings
    Standings {
        /// Standings document (JSON)
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
}

/// Commands that analyze a session's lap table (`--laps`)
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Split a driver's race into stints between pit stops
    Stints {
        #[arg(short, long)]
        driver: String,
    },
    /// Per-compound degradation trend for a driver
    Degradation {
        #[arg(short, long)]
        driver: String,
    },
    /// Best and mean sector times
    Sectors {
        /// Comma-separated driver codes
        #[arg(long, value_delimiter = ',', required = true)]
        drivers: Vec<String>,
    },
    /// Lap-time consistency score for a driver
    Consistency {
        #[arg(short, long)]
        driver: String,
    },
    /// Lap-by-lap and cumulative gap of driver B to driver A
    Gap {
        #[arg(long = "driver-a")]
        driver_a: String,
        #[arg(long = "driver-b")]
        driver_b: String,
    },
    /// Peak speeds from per-lap telemetry (first 5 drivers, first 10 laps each)
    SpeedTrap {
        #[arg(long, value_delimiter = ',', required = true)]
        drivers: Vec<String>,
    },
    /// Fastest lap per driver with the gap to the quickest
    Fastest,
    /// Lap-time distribution around the pooled median
    Pace {
        #[arg(long, value_delimiter = ',', required = true)]
        drivers: Vec<String>,
    },
    /// Lap-time progression with per-driver outlier filtering
    Progression {
        #[arg(long, value_delimiter = ',', required = true)]
        drivers: Vec<String>,
    },
    /// Head-to-head comparison of two drivers
    Compare {
        #[arg(long = "driver-a")]
        driver_a: String,
        #[arg(long = "driver-b")]
        driver_b: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_stints() {
        let cli = Cli::parse_from(["lapwise", "--laps", "race.json", "stints", "--driver", "VER"]);
        assert_eq!(
            cli.command,
            Command::Session(SessionCommand::Stints {
                driver: "VER".to_string()
            })
        );
        assert_eq!(cli.laps, Some(PathBuf::from("race.json")));
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["lapwise", "fastest", "--laps", "q.json", "--format", "json", "--debug"]);
        assert_eq!(cli.command, Command::Session(SessionCommand::Fastest));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_driver_list_comma_separated() {
        let cli = Cli::parse_from(["lapwise", "sectors", "--drivers", "VER,HAM,LEC"]);
        match cli.command {
            Command::Session(SessionCommand::Sectors { drivers }) => {
                assert_eq!(drivers, vec!["VER", "HAM", "LEC"])
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_gap_requires_both_drivers() {
        let result = Cli::try_parse_from(["lapwise", "gap", "--driver-a", "VER"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_debug_default_false() {
        let cli = Cli::parse_from(["lapwise", "fastest"]);
        assert!(!cli.debug);
        assert!(cli.config.is_none());
        assert!(cli.telemetry_dir.is_none());
    }

    #[test]
    fn test_cli_csv_format() {
        let cli = Cli::parse_from(["lapwise", "--format", "csv", "fastest"]);
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_standings_takes_file() {
        let cli = Cli::parse_from(["lapwise", "standings", "--file", "s.json"]);
        assert_eq!(
            cli.command,
            Command::Standings {
                file: PathBuf::from("s.json")
            }
        );
        assert!(cli.laps.is_none());
    }

    #[test]
    fn test_session_commands_flattened_into_top_level() {
        let cli = Cli::parse_from(["lapwise", "compare", "--driver-a", "VER", "--driver-b", "NOR"]);
        assert!(matches!(
            cli.command,
            Command::Session(SessionCommand::Compare { .. })
        ));
    }
}
