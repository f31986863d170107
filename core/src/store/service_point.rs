use super::DataStore;
use crate::{error::FleetResult, service_point_generator::ServicePoint};
use rusqlite::params;

impl DataStore {
    // ── table_c ────────────────────────────────────────────────

    pub fn insert_service_point(&self, p: &ServicePoint) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_c (
                col_c1, col_c2, col_c3, col_c4, col_c5,
                col_c6, col_c7, col_c8, col_c9, col_c10
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                p.service_point_id,
                &p.address,
                &p.city,
                &p.label,
                &p.region,
                &p.kind,
                p.active,
                p.deactivated_at,
                p.latitude,
                p.longitude,
            ],
        )?;
        Ok(())
    }

    /// (active, has deactivation date) per service point.
    pub fn service_point_states(&self) -> FleetResult<Vec<(bool, bool)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT col_c7, col_c8 IS NOT NULL FROM table_c")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}
