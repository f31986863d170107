//! datagen: populate the ten-table schema with synthetic fleet data.
//!
//! Usage:
//!   datagen --seed 7 --db fleet.db
//!   datagen --data-dir ./data
//!
//! The database path comes from `--db`, else `DB_PATH` (a `.env` file is
//! honoured), else `tagfleet.db`.

use anyhow::Result;
use std::env;
use tagfleet_core::{
    config::FleetConfig,
    generator::{GenerationReport, Generator},
    store::DataStore,
    types::Table,
};

const DEFAULT_DB: &str = "tagfleet.db";

fn main() -> Result<()> {
    env_logger::init();
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env loaded: {e}");
    }

    let args: Vec<String> = env::args().collect();
    let data_dir = flag_value(&args, "--data-dir").unwrap_or_else(|| "./data".to_string());
    let db = flag_value(&args, "--db")
        .or_else(|| env::var("DB_PATH").ok())
        .unwrap_or_else(|| DEFAULT_DB.to_string());

    let mut config = FleetConfig::load(&data_dir)?;
    config.generator.seed = parse_arg(&args, "--seed", config.generator.seed);
    let volumes = &config.generator;

    println!("tagfleet datagen");
    println!("  seed:          {}", volumes.seed);
    println!("  db:            {db}");
    println!("  data_dir:      {data_dir}");
    println!("  accounts:      {}", volumes.num_accounts);
    println!("  asset tags:    {}", volumes.num_asset_tags);
    println!("  transactions:  {}", volumes.num_transactions);
    println!();

    let store = DataStore::open(&db)?;
    let now = chrono::Local::now().naive_local();

    let outcome = store
        .migrate()
        .and_then(|_| Generator::build(volumes, now).run(&store));
    match outcome {
        Ok(report) => print_summary(&report, &store),
        Err(e) => {
            log::error!("generation failed: {e}");
            println!("An error occurred during data generation: {e}");
        }
    }

    if let Err(e) = store.close() {
        log::warn!("Closing {db} failed: {e}");
    }
    Ok(())
}

fn print_summary(report: &GenerationReport, store: &DataStore) {
    println!("=== GENERATION SUMMARY ===");
    for table in Table::ALL {
        println!(
            "  {:<9} {:<22} {:>8}",
            table.name(),
            table.label(),
            report.rows_for(table)
        );
    }
    println!("  total rows:    {}", report.total_rows());
    match store.orphaned_reference_count() {
        Ok(0) => println!("  references:    all resolved"),
        Ok(n) => println!("  references:    {n} unresolved"),
        Err(e) => log::warn!("Reference check failed: {e}"),
    }
    println!("Data generation finished.");
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
