//! Command-line front end for one-off radius searches and region lookups.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use postfinder::config::Config;
use postfinder::export::ResultExporter;
use postfinder::models::RegionLookup;
use postfinder::startup::load_coordinator;

#[derive(Parser, Debug)]
#[command(name = "finder")]
#[command(about = "Find postcodes within a radius or look up a postcode's care region")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON instead of text/CSV
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every postcode within a radius of another
    Radius(RadiusArgs),

    /// Classify a postcode into a care region
    Region(RegionArgs),
}

#[derive(Args, Debug)]
struct RadiusArgs {
    /// Center postcode (any spacing or case)
    #[arg(short, long)]
    postcode: String,

    /// Radius in kilometres
    #[arg(short, long, allow_hyphen_values = true)]
    radius: String,

    /// Write CSV here instead of stdout; a directory gets the suggested file name
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RegionArgs {
    /// Postcode to classify
    #[arg(short, long)]
    postcode: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so CSV on stdout stays clean.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    let coordinator = load_coordinator(&config)?;

    match cli.command {
        Commands::Radius(args) => {
            let result = coordinator.radius_search(&args.postcode, &args.radius)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            let exporter = ResultExporter::new(coordinator.store().schema().clone());
            let csv = exporter.to_csv(&result)?;

            match args.output {
                Some(mut path) => {
                    if path.is_dir() {
                        path.push(ResultExporter::suggested_filename(&result));
                    }
                    fs::write(&path, csv)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("{} postcodes written to {}", result.count, path.display());
                }
                None => print!("{}", csv),
            }
        }
        Commands::Region(args) => {
            let lookup = coordinator.region_lookup(&args.postcode).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&lookup)?);
            } else {
                print_lookup(&lookup);
            }
        }
    }

    Ok(())
}

fn print_lookup(lookup: &RegionLookup) {
    let classification = &lookup.classification;
    println!(
        "{} ({}): {}",
        lookup.reference.normalized,
        classification
            .administrative_area
            .as_deref()
            .unwrap_or("unknown area"),
        classification.region
    );

    if !lookup.facilities.is_empty() {
        println!("Nearest facilities:");
        for neighbor in &lookup.facilities {
            println!(
                "  {:>8.2} km  {}  {}",
                neighbor.distance_km, neighbor.record.name, neighbor.record.point.identifier
            );
        }
    }
}
