use anyhow::{bail, Context, Result};
use aqi_forecast::{AqiHistory, DatasetLoader, MonitorConfig, Pipeline};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aqi-monitor")]
#[command(about = "🌍 Air Quality Health Monitor (Terminal Version)", long_about = None)]
#[command(version = aqi_forecast::VERSION)]
struct Cli {
    /// Comma-separated AQI history (at least 5 values)
    #[arg(long, conflicts_with = "dataset")]
    aqi: Option<String>,

    /// CSV dataset with a date column and an AQI column
    #[arg(long, requires = "date")]
    dataset: Option<PathBuf>,

    /// Query date in the dataset (YYYY-MM-DD)
    #[arg(long, requires = "dataset")]
    date: Option<String>,

    /// Number of periods to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Skip the text-generation service
    #[arg(long)]
    no_advisory: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt_history() -> Result<String> {
    print!("Enter AQI History (comma-separated, at least 5 values): ");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        bail!("no AQI history provided");
    }
    Ok(line)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = MonitorConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.no_advisory {
        config.advisory.enabled = false;
    }

    let mut pipeline = Pipeline::from_config(&config)?;
    if let Some(horizon) = cli.horizon {
        pipeline = pipeline.with_horizon(horizon)?;
    }

    let report = match (cli.dataset, cli.date) {
        (Some(path), Some(date)) => {
            let dataset = DatasetLoader::from_csv(&path)
                .with_context(|| format!("loading dataset {}", path.display()))?;
            pipeline.run_for_date(&dataset, &date)?
        }
        _ => {
            let input = match cli.aqi {
                Some(aqi) => aqi,
                None => prompt_history()?,
            };
            let history = AqiHistory::parse(&input)?;
            pipeline.run(&history)?
        }
    };

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!();
        println!("{}", report);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("❌ Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
