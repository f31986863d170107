use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Candidate space exhausted: {requested} unique values requested, gave up after {attempts} attempts")]
    CandidateSpaceExhausted { requested: usize, attempts: usize },

    #[error("No rows in {table} to reference")]
    MissingReference { table: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FleetError {
    /// True for a primary-key or unique-constraint violation, the one
    /// database error a caller may recover from by retrying with a new key.
    pub fn is_duplicate_key(&self) -> bool {
        use rusqlite::{ffi, ErrorCode};
        match self {
            FleetError::Database(rusqlite::Error::SqliteFailure(e, msg)) => {
                e.code == ErrorCode::ConstraintViolation
                    && (e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        || e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                        || msg
                            .as_deref()
                            .is_some_and(|m| m.starts_with("UNIQUE constraint failed")))
            }
            _ => false,
        }
    }
}

pub type FleetResult<T> = Result<T, FleetError>;
