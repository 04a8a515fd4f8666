use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;

use swift_registry::{load_csv, logging, ServerConfig, SwiftCodeRegistry};

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = env::args().collect();
    let config = ServerConfig::from_env()?;

    match args.get(1).map(String::as_str) {
        Some("import") => {
            let path = args
                .get(2)
                .map(PathBuf::from)
                .unwrap_or_else(|| config.data_file.clone());
            run_import(path)?;
        }
        Some("lookup") => {
            let code = args.get(2).context("Usage: swift-registry lookup <SWIFT CODE>")?;
            let registry = open_registry(config.data_file)?;
            let details = registry.get_with_branches(code)?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        Some("country") => {
            let country = args.get(2).context("Usage: swift-registry country <ISO2>")?;
            let registry = open_registry(config.data_file)?;
            let listing = registry.list_by_country(country)?;
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        Some(other) => bail!("Unknown command: {} (expected import, lookup or country)", other),
        None => {
            println!("swift-registry {}", swift_registry::VERSION);
            println!("Usage:");
            println!("  swift-registry import [FILE]     Load a SWIFT code sheet and print a summary");
            println!("  swift-registry lookup <CODE>     Show one code (and its branches)");
            println!("  swift-registry country <ISO2>    List the codes of a country");
            println!("\nThe data file defaults to $SWIFT_CODES_FILE or data/SWIFT_CODES.csv");
        }
    }

    Ok(())
}

fn open_registry(path: PathBuf) -> Result<SwiftCodeRegistry> {
    let records = load_csv(&path)?;
    let registry = SwiftCodeRegistry::with_records(records)
        .with_context(|| format!("Rejected dataset from {}", path.display()))?;
    Ok(registry)
}

fn run_import(path: PathBuf) -> Result<()> {
    println!("📂 Loading {}...", path.display());

    let registry = open_registry(path)?;
    let records = registry.snapshot();

    let headquarters = records.iter().filter(|r| r.is_headquarter).count();
    let countries: BTreeSet<&str> = records.iter().map(|r| r.country_iso2.as_str()).collect();

    println!("✓ Loaded {} SWIFT codes", records.len());
    println!("  Headquarters: {}", headquarters);
    println!("  Branches:     {}", records.len() - headquarters);
    println!("  Countries:    {}", countries.len());

    Ok(())
}
