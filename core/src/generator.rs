//! The dependency-ordered generator.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. table_a  accounts
//!   2. table_b  account profiles      (reads table_a)
//!   3. table_c  service points
//!   4. table_d  contracts             (reads table_a)
//!   5. table_e  users                 (reads table_d)
//!   6. table_f  asset tags
//!   7. table_g  vehicles              (reads table_d, table_f)
//!   8. table_h  user-vehicle links    (reads table_e, table_g)
//!   9. table_i  transactions          (reads table_e, table_f)
//!  10. table_j  transaction items     (reads table_i)
//!
//! RULES:
//!   - A step only references keys it has just read back from the store,
//!     so every foreign key it writes already exists.
//!   - All randomness flows through the RngBank, one stream per table.
//!   - Any error aborts the run. Rows committed before the error stay.

use crate::{
    account_generator::{AccountProfileStep, AccountStep, ContractStep},
    asset_tag_generator::AssetTagStep,
    config::GeneratorConfig,
    error::{FleetError, FleetResult},
    rng::{RngBank, TableRng},
    service_point_generator::ServicePointStep,
    store::DataStore,
    transaction_generator::{TransactionItemStep, TransactionStep},
    types::{RecordId, Table},
    user_generator::UserStep,
    vehicle_generator::{UserVehicleLinkStep, VehicleStep},
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashSet;

/// The contract every table generator must fulfill.
pub trait GenerationStep {
    /// The table this step populates. Also selects its RNG stream.
    fn table(&self) -> Table;

    /// Populate the table. Returns the number of rows written.
    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize>;
}

/// State shared by every step of one run.
pub struct GenerationContext {
    /// Anchor for every "now"-relative date range.
    pub now: NaiveDateTime,
    pub ids: IdAllocator,
    pub max_code_attempts: usize,
}

impl GenerationContext {
    /// `now` is truncated to whole seconds; stored datetimes carry no fraction.
    pub fn new(now: NaiveDateTime, max_code_attempts: usize) -> Self {
        Self {
            now: now.with_nanosecond(0).unwrap_or(now),
            ids: IdAllocator::new(max_code_attempts),
            max_code_attempts,
        }
    }

    pub fn years_ago(&self, years: i64) -> NaiveDateTime {
        self.now - Duration::days(365 * years)
    }

    /// Midnight on January 1st of the current year.
    pub fn start_of_year(&self) -> NaiveDateTime {
        midnight(self.now.year(), self.now)
    }

    /// Midnight on January 1st of the current decade.
    pub fn start_of_decade(&self) -> NaiveDateTime {
        midnight(self.now.year() - self.now.year().rem_euclid(10), self.now)
    }
}

fn midnight(year: i32, fallback: NaiveDateTime) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(fallback)
}

/// Run-wide unique 8-digit ids. Every table draws from the same pool, so
/// an id is never reused across tables.
pub struct IdAllocator {
    issued: HashSet<RecordId>,
    max_attempts: usize,
}

impl IdAllocator {
    pub const MIN: RecordId = 10_000_000;
    pub const MAX: RecordId = 99_999_999;

    pub fn new(max_attempts: usize) -> Self {
        Self {
            issued: HashSet::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn next(&mut self, rng: &mut TableRng) -> FleetResult<RecordId> {
        for _ in 0..self.max_attempts {
            let candidate = rng.int_between(Self::MIN, Self::MAX);
            if self.issued.insert(candidate) {
                return Ok(candidate);
            }
        }
        Err(FleetError::CandidateSpaceExhausted {
            requested: self.issued.len() + 1,
            attempts: self.max_attempts,
        })
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }
}

/// Rows written per table, in execution order.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub rows: Vec<(Table, usize)>,
}

impl GenerationReport {
    pub fn rows_for(&self, table: Table) -> usize {
        self.rows
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    pub fn total_rows(&self) -> usize {
        self.rows.iter().map(|(_, n)| n).sum()
    }
}

pub struct Generator {
    rng_bank: RngBank,
    ctx:      GenerationContext,
    steps:    Vec<Box<dyn GenerationStep>>,
}

impl Generator {
    pub fn new(seed: u64, now: NaiveDateTime, max_code_attempts: usize) -> Self {
        Self {
            rng_bank: RngBank::new(seed),
            ctx:      GenerationContext::new(now, max_code_attempts),
            steps:    Vec::new(),
        }
    }

    /// Build a fully wired generator with all ten steps registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(config: &GeneratorConfig, now: NaiveDateTime) -> Self {
        let mut generator = Generator::new(config.seed, now, config.max_code_attempts);

        // EXECUTION ORDER: fixed, documented, never reordered.
        generator.register(Box::new(AccountStep::new(config.num_accounts)));
        generator.register(Box::new(AccountProfileStep));
        generator.register(Box::new(ServicePointStep::new(config.num_service_points)));
        generator.register(Box::new(ContractStep));
        generator.register(Box::new(UserStep::new(config.users_per_account)));
        generator.register(Box::new(AssetTagStep::new(config.num_asset_tags)));
        generator.register(Box::new(VehicleStep));
        generator.register(Box::new(UserVehicleLinkStep));
        generator.register(Box::new(TransactionStep::new(config.num_transactions)));
        generator.register(Box::new(TransactionItemStep));
        generator
    }

    /// Register a step. Call in the documented execution order.
    pub fn register(&mut self, step: Box<dyn GenerationStep>) {
        self.steps.push(step);
    }

    /// Run every registered step in order. The first error aborts the run.
    pub fn run(&mut self, store: &DataStore) -> FleetResult<GenerationReport> {
        let mut report = GenerationReport::default();
        log::info!("generation: starting ({} steps)", self.steps.len());

        for step in &mut self.steps {
            let table = step.table();
            let mut rng = self.rng_bank.for_table(table);
            log::info!("generation: {} ({})", table.name(), table.label());

            let rows = step.generate(store, &mut self.ctx, &mut rng)?;

            log::info!("generation: {} wrote {rows} rows", table.name());
            report.rows.push((table, rows));
        }

        log::info!(
            "generation: completed, {} rows, {} ids issued",
            report.total_rows(),
            self.ctx.ids.issued()
        );
        Ok(report)
    }
}
