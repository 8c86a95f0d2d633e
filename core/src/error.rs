use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Missing configuration: {var} is not set")]
    MissingConfig { var: &'static str },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Backend rejected insert into '{table}' (HTTP {status}): {message}")]
    Backend {
        table: String,
        status: u16,
        message: String,
    },

    #[error("Row count mismatch: sent {expected}, backend reported {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SeedResult<T> = Result<T, SeedError>;
