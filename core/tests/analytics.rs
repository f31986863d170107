//! Aggregate queries and chart rendering over generated data.

use chrono::NaiveDate;
use std::path::PathBuf;
use tagfleet_core::{
    analysis::Analysis,
    config::FleetConfig,
    generator::Generator,
    store::DataStore,
    types::Table,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn generated_store() -> DataStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let cfg = FleetConfig::default_test();
    let store = DataStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let now = NaiveDate::from_ymd_opt(2024, 6, 15)
        .and_then(|d| d.and_hms_opt(8, 0, 0))
        .expect("valid date");
    Generator::build(&cfg.generator, now)
        .run(&store)
        .expect("generation run");
    store
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tagfleet-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Daily totals, payment methods and per-account activity each account
/// for every transaction exactly once.
#[test]
fn aggregates_cover_every_transaction() {
    let store = generated_store();
    let total = store.row_count(Table::Transactions).unwrap();

    let daily = store.daily_transaction_totals().unwrap();
    assert_eq!(daily.iter().map(|d| d.transactions).sum::<i64>(), total);
    assert!(daily.windows(2).all(|w| w[0].date < w[1].date), "days not ascending");

    let methods = store.payment_method_counts().unwrap();
    assert_eq!(methods.iter().map(|m| m.transactions).sum::<i64>(), total);

    let activity = store.account_activity().unwrap();
    assert_eq!(activity.iter().map(|a| a.transactions).sum::<i64>(), total);
}

/// Top-N queries honour the limit and sort descending.
#[test]
fn top_queries_are_limited_and_sorted() {
    let store = generated_store();

    let products = store.top_products(3).unwrap();
    assert!(products.len() <= 3);
    assert!(products.windows(2).all(|w| w[0].quantity >= w[1].quantity));

    let accounts = store.top_accounts_by_frequency(4).unwrap();
    assert_eq!(accounts.len(), 4);
    assert!(accounts.windows(2).all(|w| w[0].transactions >= w[1].transactions));
}

/// A full analysis pass writes one SVG per chart.
#[test]
fn analysis_renders_svg_charts() {
    let store = generated_store();
    let cfg = FleetConfig::default_test();
    let out = scratch_dir("charts");

    let mut analysis = Analysis::new(&store, &cfg.analysis, &out).unwrap();
    analysis.transactions_over_time().unwrap();
    analysis.top_products().unwrap();
    analysis.customer_frequency().unwrap();
    analysis.payment_methods().unwrap();
    let report = analysis.customer_churn(&cfg.churn).unwrap();

    assert_eq!(report.summary.accounts, 10);
    assert_eq!(analysis.rendered().len(), 8);
    for path in analysis.rendered() {
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
    }
    let _ = std::fs::remove_dir_all(&out);
}

/// An empty database yields empty tables and no charts.
#[test]
fn empty_store_renders_nothing() {
    let store = DataStore::in_memory().unwrap();
    store.migrate().unwrap();
    let cfg = FleetConfig::default_test();
    let out = scratch_dir("empty");

    let mut analysis = Analysis::new(&store, &cfg.analysis, &out).unwrap();
    assert!(analysis.transactions_over_time().unwrap().is_empty());
    assert!(analysis.top_products().unwrap().is_empty());
    assert!(analysis.customer_frequency().unwrap().is_empty());
    assert!(analysis.payment_methods().unwrap().is_empty());
    let report = analysis.customer_churn(&cfg.churn).unwrap();

    assert!(report.assessments.is_empty());
    assert_eq!(report.summary.churn_rate, 0.0);
    assert!(analysis.rendered().is_empty());
    let _ = std::fs::remove_dir_all(&out);
}
