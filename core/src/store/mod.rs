//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Generation steps and analyses call store methods; they never
//! execute SQL directly.
//!
//! Every write goes through `execute_write`: one statement, one
//! transaction, committed immediately or rolled back on error.

use crate::{error::FleetResult, types::Table};
use rusqlite::{Connection, Params};

mod account;
mod analytics;
mod asset_tag;
mod service_point;
mod transaction;
mod user;
mod vehicle;

pub use analytics::{
    AccountActivity, AccountFrequency, DailyTotals, PaymentMethodCount, ProductTotals,
};

pub struct DataStore {
    conn: Connection,
}

impl DataStore {
    /// Open (or create) the database at `path`.
    pub fn open(path: &str) -> FleetResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an existing database for analysis. Fails if `path` does not
    /// exist; never creates a file or changes its journal mode.
    pub fn open_read_only(path: &str) -> FleetResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> FleetResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply the schema. Idempotent.
    pub fn migrate(&self) -> FleetResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_schema.sql"))?;
        Ok(())
    }

    /// Release the connection. Call on every exit path of a run.
    pub fn close(self) -> FleetResult<()> {
        self.conn.close().map_err(|(_, e)| e.into())
    }

    // ── Write path ─────────────────────────────────────────────

    /// Execute one parameterized statement and commit it.
    ///
    /// On failure the transaction is rolled back and the error returned
    /// unchanged. No retry happens here; callers that can recover (the
    /// asset-tag uniqueness loop) decide for themselves.
    pub fn execute_write<P: Params>(&self, sql: &str, params: P) -> FleetResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        match tx.execute(sql, params) {
            Ok(changed) => {
                tx.commit()?;
                Ok(changed)
            }
            Err(e) => {
                log::error!("write failed, rolling back: {e}");
                if let Err(rollback_err) = tx.rollback() {
                    log::error!("rollback failed: {rollback_err}");
                }
                Err(e.into())
            }
        }
    }

    // ── Counts ─────────────────────────────────────────────────

    pub fn row_count(&self, table: Table) -> FleetResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.name());
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Rows whose foreign key has no parent, summed over every
    /// generator-written reference.
    pub fn orphaned_reference_count(&self) -> FleetResult<i64> {
        const CHECKS: [&str; 11] = [
            "SELECT COUNT(*) FROM table_b b LEFT JOIN table_a a ON b.col_b2 = a.col_a1 WHERE a.col_a1 IS NULL",
            "SELECT COUNT(*) FROM table_d d LEFT JOIN table_a a ON d.col_d1 = a.col_a1 WHERE a.col_a1 IS NULL",
            "SELECT COUNT(*) FROM table_e e LEFT JOIN table_d d ON e.col_e2 = d.col_d1 WHERE d.col_d1 IS NULL",
            "SELECT COUNT(*) FROM table_g g LEFT JOIN table_d d ON g.col_g1 = d.col_d1 WHERE d.col_d1 IS NULL",
            "SELECT COUNT(*) FROM table_g g LEFT JOIN table_f f ON g.col_g10 = f.col_f1 WHERE f.col_f1 IS NULL",
            "SELECT COUNT(*) FROM table_h h LEFT JOIN table_e e ON h.col_h1 = e.col_e1 WHERE e.col_e1 IS NULL",
            "SELECT COUNT(*) FROM table_h h LEFT JOIN table_g g ON h.col_h3 = g.col_g2 WHERE g.col_g2 IS NULL",
            "SELECT COUNT(*) FROM table_i i LEFT JOIN table_e e ON i.col_i3 = e.col_e1 AND i.col_i2 = e.col_e2 WHERE e.col_e1 IS NULL",
            "SELECT COUNT(*) FROM table_i i LEFT JOIN table_f f ON i.col_i16 = f.col_f1 WHERE f.col_f1 IS NULL",
            "SELECT COUNT(*) FROM table_j j LEFT JOIN table_i i ON j.col_j1 = i.col_i1 WHERE i.col_i1 IS NULL",
            "SELECT COUNT(*) FROM table_j j JOIN table_i i ON j.col_j1 = i.col_i1 WHERE j.col_j8 <> i.col_i12",
        ];
        let mut total = 0i64;
        for sql in CHECKS {
            total += self.conn.query_row(sql, [], |row| row.get::<_, i64>(0))?;
        }
        Ok(total)
    }

    fn select_column<T: rusqlite::types::FromSql>(&self, sql: &str) -> FleetResult<Vec<T>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::params;

    fn store() -> DataStore {
        let store = DataStore::in_memory().unwrap();
        store.migrate().unwrap();
        store
    }

    #[test]
    fn migrate_is_idempotent() {
        let store = store();
        store.migrate().unwrap();
        for table in Table::ALL {
            assert_eq!(store.row_count(table).unwrap(), 0, "{} should be empty", table.name());
        }
    }

    #[test]
    fn write_commits_one_row() {
        let store = store();
        let changed = store
            .execute_write(
                "INSERT INTO table_f (col_f1, col_f2) VALUES (?1, ?2)",
                params!["AB1234", 3],
            )
            .unwrap();
        assert_eq!(changed, 1);
        assert_eq!(store.row_count(Table::AssetTags).unwrap(), 1);
    }

    #[test]
    fn duplicate_write_rolls_back_and_is_recognised() {
        let store = store();
        let sql = "INSERT INTO table_f (col_f1, col_f2) VALUES (?1, ?2)";
        store.execute_write(sql, params!["ZZ0001", 1]).unwrap();

        let err = store.execute_write(sql, params!["ZZ0001", 2]).unwrap_err();
        assert!(err.is_duplicate_key(), "expected duplicate-key error, got {err}");

        // The failed transaction must not linger: the next write succeeds.
        store.execute_write(sql, params!["ZZ0002", 2]).unwrap();
        assert_eq!(store.row_count(Table::AssetTags).unwrap(), 2);
    }

    #[test]
    fn foreign_key_violation_is_not_a_duplicate() {
        let store = store();
        let err = store
            .execute_write(
                "INSERT INTO table_d (col_d1, col_d2, col_d3, col_d4, col_d5)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![12345678i64, 1, "2024-01-01 00:00:00", "2023-01-01 00:00:00", 1],
            )
            .unwrap_err();
        assert!(!err.is_duplicate_key(), "FK failure misread as duplicate: {err}");
        assert_eq!(store.row_count(Table::Contracts).unwrap(), 0);
    }

    #[test]
    fn read_only_open_rejects_missing_file() {
        let path = std::env::temp_dir().join(format!("tagfleet-missing-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let path = path.to_string_lossy().into_owned();

        assert!(DataStore::open_read_only(&path).is_err());
        assert!(!std::path::Path::new(&path).exists(), "{path} was created");
    }

    #[test]
    fn read_only_store_refuses_writes() {
        let path = std::env::temp_dir().join(format!("tagfleet-ro-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let path = path.to_string_lossy().into_owned();
        {
            let store = DataStore::open(&path).unwrap();
            store.migrate().unwrap();
            store.close().unwrap();
        }

        let store = DataStore::open_read_only(&path).unwrap();
        assert_eq!(store.row_count(Table::AssetTags).unwrap(), 0);
        assert!(store
            .execute_write("INSERT INTO table_f (col_f1, col_f2) VALUES (?1, ?2)", params!["AB1234", 1])
            .is_err());
        store.close().unwrap();
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{path}{suffix}"));
        }
    }

    #[test]
    fn malformed_statement_propagates() {
        let store = store();
        let err = store.execute_write("INSERT INTO no_such_table VALUES (1)", []).unwrap_err();
        assert!(!err.is_duplicate_key());
    }
}
