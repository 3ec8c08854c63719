//! Encounter Sim - command line runner
//!
//! Loads a roster (or the built-in demo), runs one or many combats and
//! prints either a text summary or JSON rows.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use encounter_sim::core::{Result, SimulationConfig};
use encounter_sim::roster::{demo_roster, load_roster};
use encounter_sim::simulation::{flatten_runs, run_bulk, BulkSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Run turn-based combat encounters and report the outcomes
#[derive(Parser, Debug)]
#[command(name = "encounter-sim")]
#[command(about = "Simulate D&D-style combat encounters")]
struct Args {
    /// Roster TOML file (weapons + entities); defaults to the demo encounter
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Simulation settings TOML file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of independent runs
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Random seed; run i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

/// JSON output structure
#[derive(Serialize)]
struct Report {
    seed: u64,
    summary: BulkSummary,
    rows: Vec<BTreeMap<String, Value>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encounter_sim=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let roster = match &args.roster {
        Some(path) => load_roster(path, &config)?,
        None => demo_roster(&config)?,
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    tracing::info!(seed, runs = args.runs, entities = roster.len(), "starting");
    let results = run_bulk(&roster, args.runs, seed, &config)?;
    let summary = BulkSummary::from_runs(&results);

    match args.format {
        Format::Text => {
            println!("=== ENCOUNTER SIM ===");
            for entity in &roster {
                println!("  {}", entity.describe());
            }
            println!();
            if let [single] = results.as_slice() {
                println!("{}", single.summary());
            } else {
                println!("{}", summary.report());
            }
            println!("seed: {}", seed);
        }
        Format::Json => {
            let report = Report {
                seed,
                summary,
                rows: flatten_runs(&results),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
