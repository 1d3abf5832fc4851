use anyhow::{Context, Result};
use clap::Parser;
use lapwise::cli::{Cli, Command, OutputFormat, SessionCommand};
use lapwise::config::AnalysisConfig;
use lapwise::json_output::JsonOutput;
use lapwise::metrics::{
    build_stints, gap_series, head_to_head, lap_progression, pace_distribution, qualifying_gaps,
    sector_profiles, ConsistencyScorer, DegradationAnalyzer, SpeedSampler,
};
use lapwise::report::Report;
use lapwise::session::loader::{load_laps, TelemetryDir};
use lapwise::session::{LapTable, SessionData};
use lapwise::standings::Standings;
use lapwise::{csv_output, text_output};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn load_session(args: &Cli) -> Result<SessionData> {
    let Some(path) = &args.laps else {
        anyhow::bail!("This command needs a lap table. Usage: lapwise --laps FILE <COMMAND>");
    };
    let table: LapTable =
        load_laps(path).with_context(|| format!("Failed to load laps from {}", path.display()))?;

    let mut session = SessionData::new(table);
    if let Some(dir) = &args.telemetry_dir {
        session = session.with_telemetry(TelemetryDir::new(dir));
    }
    Ok(session)
}

fn require_driver(session: &SessionData, driver: &str) -> Result<()> {
    if !session.laps().contains_driver(driver) {
        anyhow::bail!("Driver {} has no laps in this session", driver);
    }
    Ok(())
}

fn load_standings(file: &Path) -> Result<Report> {
    let standings = Standings::load(file)
        .with_context(|| format!("Failed to load standings from {}", file.display()))?;
    Ok(Report::Standings(standings))
}

fn run(args: &Cli, config: &AnalysisConfig) -> Result<Report> {
    match &args.command {
        Command::Standings { file } => load_standings(file),
        Command::Session(command) => analyze(command, &load_session(args)?, config),
    }
}

fn analyze(
    command: &SessionCommand,
    session: &SessionData,
    config: &AnalysisConfig,
) -> Result<Report> {
    let laps = session.laps();

    let report = match command {
        SessionCommand::Stints { driver } => {
            require_driver(session, driver)?;
            Report::Stints {
                driver: driver.clone(),
                stints: build_stints(&laps.driver_laps(driver)),
            }
        }
        SessionCommand::Degradation { driver } => {
            require_driver(session, driver)?;
            Report::Degradation {
                driver: driver.clone(),
                compounds: DegradationAnalyzer::from_config(config)
                    .analyze(&laps.driver_laps(driver)),
            }
        }
        SessionCommand::Sectors { drivers } => Report::Sectors {
            drivers: sector_profiles(laps, drivers),
        },
        SessionCommand::Consistency { driver } => {
            require_driver(session, driver)?;
            Report::Consistency {
                driver: driver.clone(),
                profile: ConsistencyScorer::from_config(config)
                    .score(&laps.driver_laps(driver))?,
            }
        }
        SessionCommand::Gap { driver_a, driver_b } => Report::Gap {
            driver_a: driver_a.clone(),
            driver_b: driver_b.clone(),
            laps: gap_series(laps, driver_a, driver_b),
        },
        SessionCommand::SpeedTrap { drivers } => Report::SpeedTrap {
            drivers: SpeedSampler::from_config(config)
                .sample_session(session, drivers)
                .context("Usage: lapwise --telemetry-dir DIR speed-trap --drivers A,B")?,
        },
        SessionCommand::Fastest => Report::Fastest {
            laps: qualifying_gaps(laps),
        },
        SessionCommand::Pace { drivers } => Report::Pace {
            drivers: pace_distribution(laps, drivers, config.pace_band),
        },
        SessionCommand::Progression { drivers } => Report::Progression {
            drivers: lap_progression(laps, drivers, config.progression_band),
        },
        SessionCommand::Compare { driver_a, driver_b } => {
            Report::Compare(head_to_head(session, driver_a, driver_b, config)?)
        }
    };

    Ok(report)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let config = load_config(&args)?;
    let report = run(&args, &config)?;

    if report.is_empty() && args.format == OutputFormat::Text {
        println!("No data for {}", report.command());
        return Ok(());
    }

    match args.format {
        OutputFormat::Text => print!("{}", text_output::render(&report)?),
        OutputFormat::Json => println!("{}", JsonOutput::new(&report).to_json()?),
        OutputFormat::Csv => print!("{}", csv_output::table(&report).to_csv()),
    }

    Ok(())
}
