//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through TableRng instances derived
//! from the single master seed in the generator config.
//!
//! Each table gets its own RNG stream, seeded deterministically
//! from (master_seed XOR table_slot). This means:
//!   - Changing the volume of one table never changes another table's
//!     field distributions.
//!   - Each table's stream is fully reproducible in isolation.

use crate::types::Table;
use chrono::{Duration, NaiveDateTime};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single table's generation step.
pub struct TableRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl TableRng {
    /// Create a table RNG from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot: u64) -> Self {
        let derived_seed = master_seed ^ (slot.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [lo, hi], both ends inclusive.
    pub fn int_between(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform choice from a slice. `None` only for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_u64_below(items.len() as u64) as usize;
        items.get(index)
    }

    /// A datetime in [start, end], whole seconds. Returns `start` when the
    /// range is empty or inverted.
    pub fn datetime_between(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + Duration::seconds(self.int_between(0, span))
    }

    /// A datetime in [start, end), whole seconds. Strictly before `end`
    /// whenever `end` is at least one second after `start`.
    pub fn datetime_before(&mut self, start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        let span = (end - start).num_seconds();
        if span <= 0 {
            return start;
        }
        start + Duration::seconds(self.int_between(0, span - 1))
    }

    /// A version-4 UUID built from this stream's bytes.
    pub fn uuid(&mut self) -> String {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64().to_le_bytes());
        bytes[8..].copy_from_slice(&self.next_u64().to_le_bytes());
        uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
    }
}

/// All table RNGs for a single generation run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_table(&self, table: Table) -> TableRng {
        TableRng::new(self.master_seed, table as u64).with_name(table.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap()
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = RngBank::new(7).for_table(Table::Vehicles);
        let mut b = RngBank::new(7).for_table(Table::Vehicles);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn tables_get_distinct_streams() {
        let bank = RngBank::new(7);
        let mut a = bank.for_table(Table::Accounts);
        let mut b = bank.for_table(Table::Users);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn int_between_is_inclusive() {
        let mut rng = TableRng::new(1, 0);
        let mut seen_lo = false;
        let mut seen_hi = false;
        for _ in 0..2_000 {
            let v = rng.int_between(1, 3);
            assert!((1..=3).contains(&v), "out of range: {v}");
            seen_lo |= v == 1;
            seen_hi |= v == 3;
        }
        assert!(seen_lo && seen_hi, "both bounds should be reachable");
    }

    #[test]
    fn datetime_before_stays_strictly_below_end() {
        let mut rng = TableRng::new(3, 0);
        let start = at(2020, 1, 1);
        let end = start + Duration::seconds(2);
        for _ in 0..500 {
            let t = rng.datetime_before(start, end);
            assert!(t >= start && t < end, "{t} not in [{start}, {end})");
        }
    }

    #[test]
    fn inverted_range_collapses_to_start() {
        let mut rng = TableRng::new(3, 0);
        let start = at(2024, 6, 1);
        assert_eq!(rng.datetime_between(start, at(2024, 1, 1)), start);
        assert_eq!(rng.datetime_before(start, start), start);
    }

    #[test]
    fn uuid_is_well_formed_v4() {
        let mut rng = TableRng::new(9, 0);
        let id = rng.uuid();
        let parsed = uuid::Uuid::parse_str(&id).expect("valid uuid");
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn pick_from_empty_is_none() {
        let mut rng = TableRng::new(1, 1);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }
}
