use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use gpd_validator::logging;
use gpd_validator::pipeline::artifacts::write_artifacts;
use gpd_validator::pipeline::processing::normalize::RawRecord;
use gpd_validator::pipeline::{BatchOutcome, ValidationEngine};
use gpd_validator::registry::ContractorRegistry;

#[derive(Parser)]
#[command(name = "gpd_validator")]
#[command(about = "Public-works contract validation and triage engine")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a raw project batch and write the output artifacts
    Validate {
        /// Path to the raw project JSON array produced by the scraper
        #[arg(long)]
        input: PathBuf,
        /// Directory the output artifacts are written to
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// JSON file overriding the built-in contractor watch-list
        #[arg(long)]
        registry: Option<PathBuf>,
    },
    /// Print the active contractor watch-list
    Watchlist {
        /// JSON file overriding the built-in contractor watch-list
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

fn load_registry(path: Option<&PathBuf>) -> anyhow::Result<ContractorRegistry> {
    match path {
        Some(path) => {
            let registry = ContractorRegistry::from_json_file(path)?;
            info!(path = %path.display(), entries = registry.len(), "loaded contractor registry from file");
            Ok(registry)
        }
        None => Ok(ContractorRegistry::coa_watchlist()),
    }
}

fn print_results(outcome: &BatchOutcome) {
    let summary = &outcome.summary;
    println!("\n📊 Validation Results:");
    println!("   Total projects: {}", summary.total_projects);
    println!("   Total contract value: ₱{:.2}", summary.total_contract_value);
    println!("   Flagged: {}", summary.flagged_projects);
    println!("\n   By triage rating:");
    println!("   RED (Critical Risk):    {}", summary.triage_breakdown.red);
    println!("   YELLOW (High Risk):     {}", summary.triage_breakdown.yellow);
    println!("   GREEN (Low Risk):       {}", summary.triage_breakdown.green);
    println!("   GREY (Incomplete Data): {}", summary.triage_breakdown.grey);
    println!("\n   Satellite verification candidates: {}", summary.satellite_candidates);

    let gaps = &summary.accountability_gaps;
    println!(
        "   Accountability gaps: {} no contractor, {} no location, {} no cost",
        gaps.missing_contractor, gaps.missing_location, gaps.missing_cost
    );

    if let Some(report) = &outcome.contractor_report {
        println!(
            "\n   ⚠️  Watch-list matches: {} projects worth ₱{:.2} across {} contractors",
            report.total_projects, report.total_value, report.unique_contractors
        );
    }
    if outcome.skipped_records > 0 {
        println!("\n   ⚠️  Skipped malformed records: {}", outcome.skipped_records);
    }
}

fn run_validate(
    input: &PathBuf,
    output_dir: &PathBuf,
    registry: Option<&PathBuf>,
) -> anyhow::Result<()> {
    println!("🔍 Running validation engine...");

    let raw = fs::read_to_string(input)?;
    let records: Vec<RawRecord> = serde_json::from_str(&raw)?;
    println!("✓ Loaded {} raw records from {}", records.len(), input.display());

    let engine = ValidationEngine::new(load_registry(registry)?);
    let outcome = engine.run(&records)?;

    let written = write_artifacts(&outcome, output_dir)?;
    print_results(&outcome);
    println!("\n✓ {} artifacts written to {}", written.len(), output_dir.display());
    Ok(())
}

fn run_watchlist(registry: Option<&PathBuf>) -> anyhow::Result<()> {
    let registry = load_registry(registry)?;
    println!("📋 Contractor watch-list ({} entries):", registry.len());

    let mut profiles: Vec<_> = registry.profiles().collect();
    profiles.sort_by(|a, b| a.name.cmp(&b.name));
    for profile in profiles {
        println!("   [{:8}] {} ({})", profile.severity.as_str(), profile.name, profile.source);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            input,
            output_dir,
            registry,
        } => run_validate(&input, &output_dir, registry.as_ref()),
        Commands::Watchlist { registry } => run_watchlist(registry.as_ref()),
    }
}
