//! Accounts (table_a), their 1:1 profiles (table_b) and contracts (table_d).

use crate::{
    error::FleetResult,
    fake_data::FakeData,
    generator::{GenerationContext, GenerationStep},
    rng::TableRng,
    store::DataStore,
    types::{RecordId, Table},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id:    RecordId,
    pub external_ref:  String,
    pub category_code: i64,
    pub group_code:    i64,
    pub registered_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub profile_id: String,
    pub account_id: RecordId,
    pub legal_form: String,
    pub occupation: String,
    pub city:       String,
}

/// A contract shares its account's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub account_id:   RecordId,
    pub plan_code:    i64,
    /// Always strictly after `started_at`.
    pub reference_at: NaiveDateTime,
    pub started_at:   NaiveDateTime,
    pub status_code:  i64,
}

// ── table_a ──────────────────────────────────────────────────────────────────

pub struct AccountStep {
    count: usize,
}

impl AccountStep {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl GenerationStep for AccountStep {
    fn table(&self) -> Table {
        Table::Accounts
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        for _ in 0..self.count {
            let account = Account {
                account_id:    ctx.ids.next(rng)?,
                external_ref:  rng.uuid(),
                category_code: rng.int_between(1, 100),
                group_code:    rng.int_between(1, 50),
                registered_at: rng.datetime_between(ctx.years_ago(5), ctx.now),
            };
            store.insert_account(&account)?;
        }
        Ok(self.count)
    }
}

// ── table_b ──────────────────────────────────────────────────────────────────

pub struct AccountProfileStep;

impl GenerationStep for AccountProfileStep {
    fn table(&self) -> Table {
        Table::AccountProfiles
    }

    fn generate(
        &mut self,
        store: &DataStore,
        _ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let account_ids = store.account_ids()?;
        for &account_id in &account_ids {
            let profile = AccountProfile {
                profile_id: rng.uuid(),
                account_id,
                legal_form: FakeData::company_suffix(rng).to_string(),
                occupation: FakeData::occupation(rng).to_string(),
                city:       FakeData::city(rng).to_string(),
            };
            store.insert_account_profile(&profile)?;
        }
        Ok(account_ids.len())
    }
}

// ── table_d ──────────────────────────────────────────────────────────────────

pub struct ContractStep;

impl GenerationStep for ContractStep {
    fn table(&self) -> Table {
        Table::Contracts
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let account_ids = store.account_ids()?;
        for &account_id in &account_ids {
            let reference_at = rng.datetime_between(ctx.start_of_year(), ctx.now);
            let contract = Contract {
                account_id,
                plan_code: rng.int_between(1, 5),
                reference_at,
                started_at: rng.datetime_before(ctx.years_ago(5), reference_at),
                status_code: rng.int_between(1, 3),
            };
            store.insert_contract(&contract)?;
        }
        Ok(account_ids.len())
    }
}
