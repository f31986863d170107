//! Unique-code generation against a store that already holds some codes.

use tagfleet_core::{
    asset_tag_generator::{generate_unique_tags, AssetTag, CODE_SPACE},
    error::FleetError,
    store::DataStore,
    types::Table,
};
use std::collections::HashSet;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn store() -> DataStore {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = DataStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn tag(code: String) -> AssetTag {
    AssetTag { code, status_code: 1 }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// 100 codes from a source that keeps proposing stored codes and local
/// repeats still yields exactly 100 new, distinct rows.
#[test]
fn duplicates_are_retried_until_count_is_met() {
    let store = store();
    let stored: Vec<String> = (0..10).map(|i| format!("AA{i:04}")).collect();
    for code in &stored {
        store.insert_asset_tag(&tag(code.clone())).unwrap();
    }

    // Every third candidate collides with the store, every fifth repeats
    // the previous candidate.
    let mut script = Vec::new();
    let mut fresh = 0usize;
    for i in 0..400usize {
        if i % 3 == 0 {
            script.push(stored[i / 3 % stored.len()].clone());
        } else if i % 5 == 0 {
            script.push(script.last().cloned().unwrap());
        } else {
            script.push(format!("QZ{fresh:04}"));
            fresh += 1;
        }
    }
    let mut script = script.into_iter();

    let tags = generate_unique_tags(
        100,
        16,
        || tag(script.next().expect("script long enough")),
        |t| store.insert_asset_tag(t),
    )
    .unwrap();

    let distinct: HashSet<&str> = tags.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(tags.len(), 100);
    assert_eq!(distinct.len(), 100);
    assert!(tags.iter().all(|t| t.code.starts_with("QZ")));
    assert_eq!(store.row_count(Table::AssetTags).unwrap(), 110);
}

/// A source that only proposes stored codes runs out of attempts.
#[test]
fn stuck_source_reports_exhaustion() {
    let store = store();
    store.insert_asset_tag(&tag("ZZ9999".into())).unwrap();

    let err = generate_unique_tags(
        1,
        8,
        || tag("ZZ9999".into()),
        |t| store.insert_asset_tag(t),
    )
    .unwrap_err();

    match err {
        FleetError::CandidateSpaceExhausted { requested, attempts } => {
            assert_eq!(requested, 1);
            assert_eq!(attempts, 8);
        }
        other => panic!("expected exhaustion, got {other}"),
    }
    assert_eq!(store.row_count(Table::AssetTags).unwrap(), 1);
}

/// More codes than the pattern can express fail before any insert.
#[test]
fn oversized_request_fails_up_front() {
    let store = store();
    let err = generate_unique_tags(
        CODE_SPACE + 1,
        64,
        || tag("AB1234".into()),
        |t| store.insert_asset_tag(t),
    )
    .unwrap_err();

    assert!(matches!(err, FleetError::CandidateSpaceExhausted { .. }));
    assert_eq!(store.row_count(Table::AssetTags).unwrap(), 0);
}

/// Errors other than a duplicate key are not retried.
#[test]
fn other_insert_errors_propagate() {
    let mut calls = 0;
    let err = generate_unique_tags(
        5,
        64,
        || tag("CD5678".into()),
        |_| {
            calls += 1;
            Err(FleetError::MissingReference { table: "table_f" })
        },
    )
    .unwrap_err();

    assert!(matches!(err, FleetError::MissingReference { .. }));
    assert_eq!(calls, 1);
}
