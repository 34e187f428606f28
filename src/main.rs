use std::path::PathBuf;

use tracing::{debug, info, warn};
use track_odometer::api::render;
use track_odometer::{
    OutputFormat, ReplayFixSource, TrackAccumulator, TrackSession, TrackerConfig,
};

struct CliArgs {
    fix_log: PathBuf,
    config: Option<PathBuf>,
    format: Option<OutputFormat>,
    verbose: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} <fix_log.json> [--config <config.json>] [--format text|json|csv] [--verbose]",
        program
    )
}

fn parse_args(args: &[String]) -> Result<CliArgs, String> {
    let program = args.first().map_or("track-odometer", |s| s.as_str());

    let mut fix_log = None;
    let mut config = None;
    let mut format = None;
    let mut verbose = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or_else(|| usage(program))?;
                config = Some(PathBuf::from(path));
            }
            "--format" => {
                let value = iter.next().ok_or_else(|| usage(program))?;
                format = Some(value.parse::<OutputFormat>()?);
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => return Err(usage(program)),
            other if other.starts_with('-') => {
                return Err(format!("Unknown option '{}'\n{}", other, usage(program)));
            }
            other => {
                if fix_log.is_some() {
                    return Err(usage(program));
                }
                fix_log = Some(PathBuf::from(other));
            }
        }
    }

    Ok(CliArgs {
        fix_log: fix_log.ok_or_else(|| usage(program))?,
        config,
        format,
        verbose,
    })
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            return Err("Invalid arguments".into());
        }
    };

    let config = match &cli.config {
        Some(path) => TrackerConfig::from_file(path)?,
        None => TrackerConfig::default(),
    };

    init_logging(cli.verbose || config.debug_logging);

    for warning in config.validate().warnings {
        warn!("{}", warning);
    }

    let accumulator = TrackAccumulator::with_config(config.accumulator.clone())?;
    let source = ReplayFixSource::from_log_file(&cli.fix_log)?;
    let mut session = TrackSession::new(source, accumulator);

    session.start(&config.acquisition)?;
    let report = session.pump_with(|update| match &update.outcome {
        Ok(accepted) => debug!(
            timestamp = accepted.fix.timestamp,
            method = ?accepted.method,
            added_m = accepted.added_m,
            total_m = update.total_distance_m,
            "accepted"
        ),
        Err(rejection) => info!(%rejection, "fix ignored"),
    })?;
    session.stop()?;

    info!(
        polled = report.polled,
        accepted = report.accepted,
        rejected = report.rejected,
        "replay complete"
    );

    let format = cli.format.unwrap_or(config.output_format);
    println!("{}", render(&session.snapshot(), format)?);

    Ok(())
}
