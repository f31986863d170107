//! eda: exploratory analysis over a generated fleet database.
//!
//! Usage:
//!   eda --db fleet.db --out-dir ./charts
//!
//! Prints each intermediate table and writes one SVG per chart.

use anyhow::Result;
use std::{env, path::PathBuf};
use tagfleet_core::{
    analysis::{Analysis, ChurnReport},
    churn::{DERIVED_COLUMNS, SOURCE_COLUMNS},
    config::{load_column_descriptions, ColumnDescriptions, FleetConfig},
    store::DataStore,
};

const DEFAULT_DB: &str = "tagfleet.db";

fn main() -> Result<()> {
    env_logger::init();
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env loaded: {e}");
    }

    let args: Vec<String> = env::args().collect();
    let data_dir = flag_value(&args, "--data-dir").unwrap_or_else(|| "./data".to_string());
    let out_dir = PathBuf::from(flag_value(&args, "--out-dir").unwrap_or_else(|| "./charts".to_string()));
    let db = flag_value(&args, "--db")
        .or_else(|| env::var("DB_PATH").ok())
        .unwrap_or_else(|| DEFAULT_DB.to_string());

    let config = FleetConfig::load(&data_dir)?;
    let store = DataStore::open_read_only(&db)?;
    match load_column_descriptions(&data_dir)? {
        Some(descriptions) => print_descriptions(&descriptions),
        None => log::info!("No column descriptions under {data_dir}"),
    }

    let mut analysis = Analysis::new(&store, &config.analysis, &out_dir)?;

    println!("=== TRANSACTIONS PER DAY ===");
    let daily = analysis.transactions_over_time()?;
    println!("  {:<12} {:>12} {:>16}", "date", "transactions", "total amount");
    for d in &daily {
        println!("  {:<12} {:>12} {:>16}", d.date, d.transactions, d.total_amount);
    }
    println!();

    println!("=== TOP PRODUCTS ===");
    for p in analysis.top_products()? {
        println!("  {:<12} qty {:>8}  amount {:>14}", p.product, p.quantity, p.amount);
    }
    println!();

    println!("=== MOST FREQUENT CUSTOMERS ===");
    for a in analysis.customer_frequency()? {
        println!("  {:<10} {:>8} transactions", a.account_id, a.transactions);
    }
    println!();

    println!("=== PAYMENT METHODS ===");
    for m in analysis.payment_methods()? {
        println!("  {:<12} {:>8}", m.method, m.transactions);
    }
    println!();

    let report = analysis.customer_churn(&config.churn)?;
    print_churn(&report);

    println!("=== CHARTS ===");
    for path in analysis.rendered() {
        println!("  {}", path.display());
    }

    drop(analysis);
    store.close()?;
    Ok(())
}

fn print_descriptions(descriptions: &ColumnDescriptions) {
    println!("=== COLUMN DESCRIPTIONS ===");
    for (table, columns) in descriptions {
        println!("  {table}");
        for (column, text) in columns {
            println!("    {column:<8} {text}");
        }
    }
    println!();
}

fn print_churn(report: &ChurnReport) {
    println!("=== CUSTOMER CHURN ===");
    println!(
        "  {:<10} {:>10} {:>6} {:>12} {:>5} {:>6} {:>5} {:>7}",
        "account", "days", "txns", "avg amount", "time", "amount", "freq", "churned"
    );
    for a in &report.assessments {
        println!(
            "  {:<10} {:>10} {:>6} {:>12.2} {:>5} {:>6} {:>5} {:>7}",
            a.activity.account_id,
            a.days_since_last_purchase,
            a.activity.transactions,
            a.activity.avg_amount,
            a.flags.by_time,
            a.flags.by_amount,
            a.flags.by_frequency,
            a.churned
        );
    }
    println!();

    let s = &report.summary;
    println!("  churn rate:      {:.2}%", s.churn_rate * 100.0);
    println!("  churned:         {} of {}", s.churned, s.accounts);
    println!("  by time:         {}", s.reasons.time);
    println!("  by amount:       {}", s.reasons.amount);
    println!("  by frequency:    {}", s.reasons.frequency);
    println!("  source columns:  {}", SOURCE_COLUMNS.join(", "));
    println!("  derived columns: {}", DERIVED_COLUMNS.join(", "));
    println!();

    println!("=== SEGMENTATION ===");
    for seg in &report.segments {
        println!(
            "  churned={:<5} accounts {:>6}  avg amount {:>12.2}  txns {:>8.2}  days since {:>8.2}",
            seg.churned, seg.accounts, seg.mean_avg_amount, seg.mean_transactions, seg.mean_days_since
        );
    }
    println!();
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].clone())
}
