use std::io;

/// Failures of the persistence layer (settings file, history database, export)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("history database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("corrupt history row {row}: {reason}")]
    Corrupt { row: i64, reason: String },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
