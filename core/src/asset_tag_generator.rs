//! Asset tags (table_f): globally unique `[A-Z]{2}[0-9]{4}` codes.
//!
//! Uniqueness is enforced twice: a process-local set rejects repeated
//! candidates, and a duplicate-key error from the store (a code already
//! present from an earlier run) discards the candidate and draws again.
//! Every code gets at most `max_code_attempts` candidates.

use crate::{
    error::{FleetError, FleetResult},
    generator::{GenerationContext, GenerationStep},
    rng::TableRng,
    store::DataStore,
    types::Table,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 26² letter pairs × 10⁴ digit groups.
pub const CODE_SPACE: usize = 26 * 26 * 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTag {
    pub code:        String,
    pub status_code: i64,
}

/// Two uppercase letters followed by four digits.
pub fn candidate_code(rng: &mut TableRng) -> String {
    let mut code = String::with_capacity(6);
    for _ in 0..2 {
        code.push(char::from(b'A' + rng.next_u64_below(26) as u8));
    }
    for _ in 0..4 {
        code.push(char::from(b'0' + rng.next_u64_below(10) as u8));
    }
    code
}

pub fn is_valid_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 6
        && bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

/// Insert `requested` tags with distinct codes.
///
/// `candidate` proposes a tag; `insert` persists it. A candidate whose code
/// was already proposed, or whose insert fails with a duplicate key, is
/// dropped and another one drawn. Any other insert error is returned as is.
pub fn generate_unique_tags<C, I>(
    requested: usize,
    max_attempts: usize,
    mut candidate: C,
    mut insert: I,
) -> FleetResult<Vec<AssetTag>>
where
    C: FnMut() -> AssetTag,
    I: FnMut(&AssetTag) -> FleetResult<()>,
{
    let max_attempts = max_attempts.max(1);
    if requested > CODE_SPACE {
        return Err(FleetError::CandidateSpaceExhausted { requested, attempts: 0 });
    }

    let mut proposed: HashSet<String> = HashSet::with_capacity(requested);
    let mut tags = Vec::with_capacity(requested);
    let mut total_attempts = 0usize;

    while tags.len() < requested {
        let mut placed = false;
        for _ in 0..max_attempts {
            total_attempts += 1;
            let tag = candidate();
            if !proposed.insert(tag.code.clone()) {
                continue;
            }
            match insert(&tag) {
                Ok(()) => {
                    tags.push(tag);
                    placed = true;
                    break;
                }
                Err(e) if e.is_duplicate_key() => {
                    log::warn!("asset tag {} already stored, drawing a new one", tag.code);
                }
                Err(e) => return Err(e),
            }
        }
        if !placed {
            return Err(FleetError::CandidateSpaceExhausted {
                requested,
                attempts: total_attempts,
            });
        }
    }

    Ok(tags)
}

pub struct AssetTagStep {
    count: usize,
}

impl AssetTagStep {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl GenerationStep for AssetTagStep {
    fn table(&self) -> Table {
        Table::AssetTags
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let tags = generate_unique_tags(
            self.count,
            ctx.max_code_attempts,
            || AssetTag {
                code:        candidate_code(rng),
                status_code: rng.int_between(1, 5),
            },
            |tag| store.insert_asset_tag(tag),
        )?;
        log::info!("asset tags: {} unique codes", tags.len());
        Ok(tags.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_match_the_code_pattern() {
        let mut rng = TableRng::new(11, Table::AssetTags as u64);
        for _ in 0..1_000 {
            let code = candidate_code(&mut rng);
            assert!(is_valid_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn pattern_check_rejects_near_misses() {
        for bad in ["ab1234", "A12345", "ABC123", "AB123", "AB12345", "ÁB1234"] {
            assert!(!is_valid_code(bad), "{bad} should be rejected");
        }
        assert!(is_valid_code("ZZ0000"));
    }

    #[test]
    fn local_repeats_are_skipped() {
        let mut script = ["AA0001", "AA0001", "AA0001", "BB0002"].into_iter();
        let mut stored = Vec::new();
        let tags = generate_unique_tags(
            2,
            8,
            || AssetTag {
                code:        script.next().unwrap_or("CC0003").to_string(),
                status_code: 1,
            },
            |t| {
                stored.push(t.code.clone());
                Ok(())
            },
        )
        .unwrap();
        let codes: Vec<_> = tags.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, ["AA0001", "BB0002"]);
        assert_eq!(stored, ["AA0001", "BB0002"], "repeats never reach the store");
    }

    #[test]
    fn oversized_request_fails_before_any_insert() {
        let err = generate_unique_tags(
            CODE_SPACE + 1,
            8,
            || AssetTag { code: "AA0000".into(), status_code: 1 },
            |_| panic!("insert must not be called"),
        )
        .unwrap_err();
        assert!(matches!(err, FleetError::CandidateSpaceExhausted { attempts: 0, .. }));
    }

    #[test]
    fn stuck_candidate_source_is_bounded() {
        let err = generate_unique_tags(
            2,
            16,
            || AssetTag { code: "QQ7777".into(), status_code: 2 },
            |_| Ok(()),
        )
        .unwrap_err();
        match err {
            FleetError::CandidateSpaceExhausted { requested, attempts } => {
                assert_eq!(requested, 2);
                assert_eq!(attempts, 17, "1 success + 16 failed draws");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn zero_attempt_budget_still_draws_once_per_code() {
        let mut next = 0u32;
        let tags = generate_unique_tags(
            3,
            0,
            || {
                next += 1;
                AssetTag { code: format!("MM{next:04}"), status_code: 1 }
            },
            |_| Ok(()),
        )
        .unwrap();
        assert_eq!(tags.len(), 3);

        let err = generate_unique_tags(
            1,
            0,
            || AssetTag { code: "NN0001".into(), status_code: 1 },
            |_| Err(FleetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code:          rusqlite::ErrorCode::ConstraintViolation,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY,
                },
                None,
            ))),
        )
        .unwrap_err();
        assert!(matches!(err, FleetError::CandidateSpaceExhausted { attempts: 1, .. }));
    }
}
