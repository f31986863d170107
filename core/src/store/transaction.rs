use super::DataStore;
use crate::{
    error::FleetResult,
    transaction_generator::{Transaction, TransactionItem},
    types::RecordId,
};
use chrono::NaiveDateTime;
use rusqlite::params;

impl DataStore {
    // ── table_i ────────────────────────────────────────────────

    pub fn insert_transaction(&self, t: &Transaction) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_i (
                col_i1, col_i2, col_i3, col_i4, col_i5, col_i6, col_i7, col_i8,
                col_i9, col_i10, col_i11, col_i12, col_i13, col_i14, col_i15, col_i16
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                t.transaction_id,
                t.account_id,
                t.user_id,
                t.payment_method_code,
                &t.authorization_ref,
                &t.receipt_ref,
                t.amount_paid,
                &t.document_kind,
                t.channel_code,
                t.total_amount,
                t.opened_at,
                t.processed_at,
                t.closed_at,
                &t.payment_method,
                &t.memo,
                &t.tag_code,
            ],
        )?;
        Ok(())
    }

    /// (transaction id, processing time) ordered by transaction id.
    pub fn transaction_processing_times(&self) -> FleetResult<Vec<(RecordId, NaiveDateTime)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT col_i1, col_i12 FROM table_i ORDER BY col_i1")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// (opened, processed, closed) per transaction.
    pub fn transaction_timelines(
        &self,
    ) -> FleetResult<Vec<(NaiveDateTime, NaiveDateTime, NaiveDateTime)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT col_i11, col_i12, col_i13 FROM table_i")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── table_j ────────────────────────────────────────────────

    pub fn insert_transaction_item(&self, j: &TransactionItem) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_j (
                col_j1, col_j2, col_j3, col_j4, col_j5, col_j6,
                col_j7, col_j8, col_j9, col_j10, col_j11, col_j12
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                j.transaction_id,
                j.line_number,
                j.product_index,
                j.quantity,
                j.amount,
                &j.product_name,
                &j.price_kind,
                j.sold_at,
                j.discount,
                j.unit_amount,
                j.unit_discount,
                j.recorded_at,
            ],
        )?;
        Ok(())
    }

    /// Line items per transaction, ascending by transaction id.
    pub fn items_per_transaction(&self) -> FleetResult<Vec<i64>> {
        self.select_column(
            "SELECT COUNT(j.col_j1)
             FROM table_i i LEFT JOIN table_j j ON j.col_j1 = i.col_i1
             GROUP BY i.col_i1 ORDER BY i.col_i1",
        )
    }
}
