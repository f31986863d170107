//! Read-only aggregate queries for the analysis pipeline.

use super::DataStore;
use crate::{error::FleetResult, types::RecordId};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::params;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date:         NaiveDate,
    pub transactions: i64,
    pub total_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotals {
    pub product:  String,
    pub quantity: i64,
    pub amount:   i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountFrequency {
    pub account_id:   RecordId,
    pub transactions: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodCount {
    pub method:       String,
    pub transactions: i64,
}

/// Per-account purchase aggregates, the churn classifier's input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountActivity {
    pub account_id:    RecordId,
    pub last_purchase: NaiveDateTime,
    pub transactions:  i64,
    pub avg_amount:    f64,
}

impl DataStore {
    pub fn daily_transaction_totals(&self) -> FleetResult<Vec<DailyTotals>> {
        let mut stmt = self.conn.prepare(
            "SELECT DATE(col_i11) AS day, COUNT(*), SUM(col_i10)
             FROM table_i
             GROUP BY DATE(col_i11)
             ORDER BY day",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DailyTotals {
                date:         row.get(0)?,
                transactions: row.get(1)?,
                total_amount: row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn top_products(&self, limit: usize) -> FleetResult<Vec<ProductTotals>> {
        let mut stmt = self.conn.prepare(
            "SELECT col_j6, SUM(col_j4) AS quantity, SUM(col_j5)
             FROM table_j
             GROUP BY col_j6
             ORDER BY quantity DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(ProductTotals {
                product:  row.get(0)?,
                quantity: row.get(1)?,
                amount:   row.get(2)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn top_accounts_by_frequency(&self, limit: usize) -> FleetResult<Vec<AccountFrequency>> {
        let mut stmt = self.conn.prepare(
            "SELECT col_i2, COUNT(*) AS n
             FROM table_i
             GROUP BY col_i2
             ORDER BY n DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(AccountFrequency {
                account_id:   row.get(0)?,
                transactions: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn payment_method_counts(&self) -> FleetResult<Vec<PaymentMethodCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT col_i14, COUNT(*)
             FROM table_i
             GROUP BY col_i14",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(PaymentMethodCount {
                method:       row.get(0)?,
                transactions: row.get(1)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn account_activity(&self) -> FleetResult<Vec<AccountActivity>> {
        let mut stmt = self.conn.prepare(
            "SELECT col_i2, MAX(col_i11), COUNT(*), AVG(col_i10)
             FROM table_i
             GROUP BY col_i2",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(AccountActivity {
                account_id:    row.get(0)?,
                last_purchase: row.get(1)?,
                transactions:  row.get(2)?,
                avg_amount:    row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
