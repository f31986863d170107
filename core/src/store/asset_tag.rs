use super::DataStore;
use crate::{asset_tag_generator::AssetTag, error::FleetResult};
use rusqlite::params;

impl DataStore {
    // ── table_f ────────────────────────────────────────────────

    pub fn insert_asset_tag(&self, t: &AssetTag) -> FleetResult<()> {
        self.execute_write(
            "INSERT INTO table_f (col_f1, col_f2) VALUES (?1, ?2)",
            params![&t.code, t.status_code],
        )?;
        Ok(())
    }

    pub fn asset_tag_codes(&self) -> FleetResult<Vec<String>> {
        self.select_column("SELECT col_f1 FROM table_f ORDER BY col_f1")
    }
}
