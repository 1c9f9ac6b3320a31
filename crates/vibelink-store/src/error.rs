use thiserror::Error;

/// Failures of the local credential and settings store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// No platform data directory and none configured.
    #[error("No data directory available for the local store")]
    NoDataDir,

    #[error("Could not prepare store directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    /// The saved settings document no longer parses.
    #[error("Corrupt settings snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stored timestamp: {0}")]
    ChronoParse(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, StoreError>;
