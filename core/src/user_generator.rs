//! Users (table_e): a fixed number per contract.

use crate::{
    error::FleetResult,
    generator::{GenerationContext, GenerationStep},
    rng::TableRng,
    store::DataStore,
    types::{RecordId, Table},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id:      RecordId,
    /// The contract (and account) this user belongs to.
    pub account_id:   RecordId,
    pub role_code:    i64,
    pub enrolled_at:  NaiveDateTime,
    pub last_seen_at: NaiveDateTime,
}

pub struct UserStep {
    per_contract: usize,
}

impl UserStep {
    pub fn new(per_contract: usize) -> Self {
        Self { per_contract }
    }
}

impl GenerationStep for UserStep {
    fn table(&self) -> Table {
        Table::Users
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let contract_ids = store.contract_ids()?;
        let mut written = 0usize;

        for &account_id in &contract_ids {
            for _ in 0..self.per_contract {
                let enrolled_at = rng.datetime_between(ctx.years_ago(2), ctx.now);
                let user = User {
                    user_id: ctx.ids.next(rng)?,
                    account_id,
                    role_code: rng.int_between(1, 5),
                    enrolled_at,
                    last_seen_at: rng.datetime_between(enrolled_at, ctx.now),
                };
                store.insert_user(&user)?;
                written += 1;
            }
        }
        log::debug!("users: {} contracts × {} users", contract_ids.len(), self.per_contract);
        Ok(written)
    }
}
