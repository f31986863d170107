use super::DataStore;
use crate::{error::FleetResult, types::RecordId, user_generator::User};
use rusqlite::params;

impl DataStore {
    // ── table_e ────────────────────────────────────────────────

    pub fn insert_user(&self, u: &User) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_e (col_e1, col_e2, col_e3, col_e4, col_e5)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![u.user_id, u.account_id, u.role_code, u.enrolled_at, u.last_seen_at],
        )?;
        Ok(())
    }

    /// (user id, contract id) for every user, ordered by user id.
    pub fn user_contract_pairs(&self) -> FleetResult<Vec<(RecordId, RecordId)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT col_e1, col_e2 FROM table_e ORDER BY col_e1")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
