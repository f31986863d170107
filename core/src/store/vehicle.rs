use super::DataStore;
use crate::{
    error::FleetResult,
    types::RecordId,
    vehicle_generator::{UserVehicleLink, Vehicle},
};
use chrono::NaiveDateTime;
use rusqlite::params;

impl DataStore {
    // ── table_g ────────────────────────────────────────────────

    pub fn insert_vehicle(&self, v: &Vehicle) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_g (
                col_g1, col_g2, col_g3, col_g4, col_g5,
                col_g6, col_g7, col_g8, col_g9, col_g10
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                v.account_id,
                v.vehicle_id,
                &v.class_letter,
                v.category_code,
                &v.make,
                v.axle_code,
                &v.model,
                v.valid_from,
                v.valid_until,
                &v.tag_code,
            ],
        )?;
        Ok(())
    }

    /// (contract id, vehicle id) for every vehicle, ordered by vehicle id.
    pub fn vehicle_contract_pairs(&self) -> FleetResult<Vec<(RecordId, RecordId)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT col_g1, col_g2 FROM table_g ORDER BY col_g2")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// (valid from, valid until) per vehicle.
    pub fn vehicle_windows(&self) -> FleetResult<Vec<(NaiveDateTime, NaiveDateTime)>> {
        let mut stmt = self.conn.prepare("SELECT col_g8, col_g9 FROM table_g")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── table_h ────────────────────────────────────────────────

    pub fn insert_user_vehicle_link(&self, l: &UserVehicleLink) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_h (col_h1, col_h2, col_h3, col_h4, col_h5)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![l.user_id, l.account_id, l.vehicle_id, l.primary_flag, l.linked_at],
        )?;
        Ok(())
    }

    /// Links whose user and vehicle sit on different contracts.
    pub fn mismatched_link_count(&self) -> FleetResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*)
             FROM table_h h
             JOIN table_e e ON h.col_h1 = e.col_e1
             JOIN table_g g ON h.col_h3 = g.col_g2
             WHERE e.col_e2 <> h.col_h2 OR g.col_g1 <> h.col_h2",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
