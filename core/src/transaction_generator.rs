//! Transactions (table_i) and their line items (table_j).
//!
//! Amounts: base uniform in [1000, 500000], jittered by U(0.8, 1.2) for the
//! paid amount and again by U(0.95, 1.05) for the total. One transaction in
//! twenty is an outlier: paid is redrawn from a very-high or very-low band
//! and the total equals the paid amount.
//!
//! Timestamps: every transaction opens at a run-wide start plus 0–730 days;
//! processing follows 0–60 minutes later and closing 1–30 minutes after that.

use crate::{
    error::{FleetError, FleetResult},
    fake_data::{FakeData, DOCUMENT_KINDS, PRICE_KINDS, PRODUCTS},
    generator::{GenerationContext, GenerationStep},
    rng::TableRng,
    store::DataStore,
    types::{RecordId, Table},
};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const OUTLIER_PROBABILITY: f64 = 0.05;
pub const BASE_AMOUNT: (i64, i64) = (1_000, 500_000);
pub const HIGH_OUTLIER: (i64, i64) = (500_000, 1_000_000);
pub const LOW_OUTLIER: (i64, i64) = (100, 999);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id:      RecordId,
    pub account_id:          RecordId,
    pub user_id:             RecordId,
    pub payment_method_code: i64,
    pub authorization_ref:   String,
    pub receipt_ref:         String,
    pub amount_paid:         i64,
    /// Opaque `Type X/Y/Z` enumeration.
    pub document_kind:       String,
    pub channel_code:        i64,
    pub total_amount:        i64,
    pub opened_at:           NaiveDateTime,
    pub processed_at:        NaiveDateTime,
    pub closed_at:           NaiveDateTime,
    pub payment_method:      String,
    pub memo:                String,
    pub tag_code:            String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub transaction_id: RecordId,
    pub line_number:    i64,
    /// 1-based index into `PRODUCTS`.
    pub product_index:  i64,
    pub quantity:       i64,
    pub amount:         i64,
    pub product_name:   String,
    pub price_kind:     String,
    /// Copied from the transaction's processing time.
    pub sold_at:        NaiveDateTime,
    pub discount:       i64,
    pub unit_amount:    i64,
    pub unit_discount:  i64,
    pub recorded_at:    NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amounts {
    pub paid:    i64,
    pub total:   i64,
    pub outlier: bool,
}

/// Draw paid/total amounts for one transaction.
pub fn draw_amounts(rng: &mut TableRng) -> Amounts {
    let base = rng.int_between(BASE_AMOUNT.0, BASE_AMOUNT.1);
    let paid = (base as f64 * rng.uniform(0.8, 1.2)) as i64;
    let total = (paid as f64 * rng.uniform(0.95, 1.05)) as i64;

    if rng.chance(OUTLIER_PROBABILITY) {
        let band = if rng.chance(0.5) { HIGH_OUTLIER } else { LOW_OUTLIER };
        let paid = rng.int_between(band.0, band.1);
        return Amounts { paid, total: paid, outlier: true };
    }
    Amounts { paid, total, outlier: false }
}

// ── table_i ──────────────────────────────────────────────────────────────────

pub struct TransactionStep {
    count: usize,
}

impl TransactionStep {
    pub fn new(count: usize) -> Self {
        Self { count }
    }
}

impl GenerationStep for TransactionStep {
    fn table(&self) -> Table {
        Table::Transactions
    }

    fn generate(
        &mut self,
        store: &DataStore,
        ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        if self.count == 0 {
            return Ok(0);
        }
        let users = store.user_contract_pairs()?;
        if users.is_empty() {
            return Err(FleetError::MissingReference { table: Table::Users.name() });
        }
        let tag_codes = store.asset_tag_codes()?;
        if tag_codes.is_empty() {
            return Err(FleetError::MissingReference { table: Table::AssetTags.name() });
        }

        let start = rng.datetime_between(ctx.years_ago(2), ctx.now);
        let mut outliers = 0usize;

        for _ in 0..self.count {
            let transaction_id = ctx.ids.next(rng)?;
            let (user_id, account_id) = users[rng.next_u64_below(users.len() as u64) as usize];
            let payment_method_code = rng.int_between(1, 10);
            let authorization_ref = rng.uuid();
            let receipt_ref = rng.uuid();
            let amounts = draw_amounts(rng);
            let document_kind = DOCUMENT_KINDS[rng.next_u64_below(3) as usize].to_string();
            let channel_code = rng.int_between(1, 5);

            let opened_at = start + Duration::days(rng.int_between(0, 730));
            let processed_at = opened_at + Duration::minutes(rng.int_between(0, 60));
            let closed_at = processed_at + Duration::minutes(rng.int_between(1, 30));

            let payment_method = FakeData::word(rng).to_string();
            let memo = FakeData::word(rng).to_string();
            let tag_code = tag_codes[rng.next_u64_below(tag_codes.len() as u64) as usize].clone();

            if amounts.outlier {
                outliers += 1;
            }

            store.insert_transaction(&Transaction {
                transaction_id,
                account_id,
                user_id,
                payment_method_code,
                authorization_ref,
                receipt_ref,
                amount_paid: amounts.paid,
                document_kind,
                channel_code,
                total_amount: amounts.total,
                opened_at,
                processed_at,
                closed_at,
                payment_method,
                memo,
                tag_code,
            })?;
        }

        log::info!("transactions: generated {} ({outliers} outliers)", self.count);
        Ok(self.count)
    }
}

// ── table_j ──────────────────────────────────────────────────────────────────

/// 1–3 line items per transaction.
pub struct TransactionItemStep;

impl GenerationStep for TransactionItemStep {
    fn table(&self) -> Table {
        Table::TransactionItems
    }

    fn generate(
        &mut self,
        store: &DataStore,
        _ctx: &mut GenerationContext,
        rng: &mut TableRng,
    ) -> FleetResult<usize> {
        let transactions = store.transaction_processing_times()?;
        let mut written = 0usize;

        for &(transaction_id, processed_at) in &transactions {
            let lines = rng.int_between(1, 3);
            for line_number in 1..=lines {
                let product_index = rng.int_between(1, PRODUCTS.len() as i64);
                let quantity = rng.int_between(1, 50);
                let amount = rng.int_between(1_000, 50_000);
                let price_kind = PRICE_KINDS[rng.next_u64_below(3) as usize].to_string();
                let discount = rng.int_between(0, 1_000);

                store.insert_transaction_item(&TransactionItem {
                    transaction_id,
                    line_number,
                    product_index,
                    quantity,
                    amount,
                    product_name: PRODUCTS[(product_index - 1) as usize].to_string(),
                    price_kind,
                    sold_at: processed_at,
                    discount,
                    unit_amount: amount / quantity,
                    unit_discount: discount / quantity,
                    recorded_at: processed_at,
                })?;
                written += 1;
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_respect_their_bands() {
        let mut rng = TableRng::new(2024, Table::Transactions as u64);
        let mut outliers = 0;
        for _ in 0..10_000 {
            let a = draw_amounts(&mut rng);
            if a.outlier {
                outliers += 1;
                assert_eq!(a.paid, a.total, "outlier total must equal paid");
                let high = (HIGH_OUTLIER.0..=HIGH_OUTLIER.1).contains(&a.paid);
                let low = (LOW_OUTLIER.0..=LOW_OUTLIER.1).contains(&a.paid);
                assert!(high || low, "outlier {} outside both bands", a.paid);
            } else {
                assert!(a.paid >= 800 && a.paid <= 600_000, "paid {}", a.paid);
                assert!(a.total >= (a.paid as f64 * 0.95) as i64 - 1, "total {}", a.total);
                assert!(a.total <= (a.paid as f64 * 1.05) as i64 + 1, "total {}", a.total);
            }
        }
        // 5% of 10k = 500; allow generous sampling noise.
        assert!((350..=650).contains(&outliers), "outliers = {outliers}");
    }
}
