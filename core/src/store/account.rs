use super::DataStore;
use crate::{
    account_generator::{Account, AccountProfile, Contract},
    error::FleetResult,
    types::RecordId,
};
use chrono::NaiveDateTime;
use rusqlite::params;

impl DataStore {
    // ── table_a ────────────────────────────────────────────────

    pub fn insert_account(&self, a: &Account) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_a (col_a1, col_a2, col_a3, col_a4, col_a5)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                a.account_id,
                &a.external_ref,
                a.category_code,
                a.group_code,
                a.registered_at,
            ],
        )?;
        Ok(())
    }

    pub fn account_ids(&self) -> FleetResult<Vec<RecordId>> {
        self.select_column("SELECT col_a1 FROM table_a")
    }

    // ── table_b ────────────────────────────────────────────────

    pub fn insert_account_profile(&self, p: &AccountProfile) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_b (col_b1, col_b2, col_b3, col_b4, col_b5)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![&p.profile_id, p.account_id, &p.legal_form, &p.occupation, &p.city],
        )?;
        Ok(())
    }

    // ── table_d ────────────────────────────────────────────────

    pub fn insert_contract(&self, c: &Contract) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_d (col_d1, col_d2, col_d3, col_d4, col_d5)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                c.account_id,
                c.plan_code,
                c.reference_at,
                c.started_at,
                c.status_code,
            ],
        )?;
        Ok(())
    }

    pub fn contract_ids(&self) -> FleetResult<Vec<RecordId>> {
        self.select_column("SELECT col_d1 FROM table_d")
    }

    /// (start, reference) per contract.
    pub fn contract_windows(&self) -> FleetResult<Vec<(NaiveDateTime, NaiveDateTime)>> {
        let mut stmt = self.conn.prepare("SELECT col_d4, col_d3 FROM table_d")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
