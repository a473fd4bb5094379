//! PINECONe TEV runner
//!
//! Runs the Monte Carlo TEV analysis over the zone measurements produced by
//! the remote-sensing pipeline and prints the summary table.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p pinecone-cli -- \
//!   --inputs zones.json \
//!   --config analysis.toml \
//!   --simulations 10000
//! ```

use clap::Parser;
use pinecone_core::analysis::{Analysis, AnalysisReport};
use pinecone_core::config::{AnalysisConfig, BasisMode};
use pinecone_core::errors::PineconeResult;
use pinecone_core::measurement::ZoneInputs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Monte Carlo Total Economic Value for prescribed-fire scenarios
#[derive(Parser, Debug)]
#[command(name = "pinecone")]
#[command(about = "Estimate the Total Economic Value of forest management zones")]
struct Args {
    /// Zone measurements (JSON): biomass, emissions, water_yield and acreage tables
    #[arg(short, long)]
    inputs: PathBuf,

    /// Analysis configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured number of Monte Carlo draws per zone
    #[arg(short = 'n', long)]
    simulations: Option<usize>,

    /// Report per-acre values instead of zone totals
    #[arg(long)]
    per_acre: bool,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match execute(&args) {
        Ok(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialise report: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else if let Err(e) = write_report(&mut io::stdout().lock(), &report) {
                error!("Failed to write report: {}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: &Args) -> PineconeResult<AnalysisReport> {
    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading analysis config");
            AnalysisConfig::from_path(path)?
        }
        None => AnalysisConfig::default(),
    };
    let config = apply_args(config, args);

    let inputs = ZoneInputs::from_path(&args.inputs)?;
    let analysis = Analysis::new(config)?;
    Ok(analysis.run(&inputs))
}

/// Command line flags take precedence over the configuration file.
fn apply_args(mut config: AnalysisConfig, args: &Args) -> AnalysisConfig {
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(simulations) = args.simulations {
        config.num_simulations = simulations;
    }
    if args.per_acre {
        config.basis = BasisMode::PerAcre;
    }
    config
}

/// Write the summary table, skipped zones and warnings as plain text.
fn write_report<W: Write>(out: &mut W, report: &AnalysisReport) -> io::Result<()> {
    writeln!(
        out,
        "{:<24} {:<8} {:>10} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Case",
        "Method",
        "Acres",
        "Mean_TEV",
        "Std_TEV",
        "Median_TEV",
        "Q25_TEV",
        "Q75_TEV",
        "Min_TEV",
        "Max_TEV"
    )?;
    for row in report.rows() {
        let acres = row
            .acres
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "per acre".to_string());
        writeln!(
            out,
            "{:<24} {:<8} {:>10} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
            row.case,
            row.method,
            acres,
            row.mean_tev,
            row.std_tev,
            row.median_tev,
            row.q25_tev,
            row.q75_tev,
            row.min_tev,
            row.max_tev
        )?;
    }

    if !report.skipped().is_empty() {
        writeln!(out)?;
        writeln!(out, "Skipped zones:")?;
        for skipped in report.skipped() {
            writeln!(out, "  {}: {}", skipped.zone, skipped.reason)?;
        }
    }

    if !report.warnings().is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings:")?;
        for warning in report.warnings() {
            writeln!(out, "  {}", warning)?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{} draws per zone, seed {}",
        report.num_simulations(),
        report.seed()
    )
}
