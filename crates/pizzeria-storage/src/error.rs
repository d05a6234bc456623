//! Storage error types

use thiserror::Error;

/// Result type alias for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Storage-specific error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The write was rejected by the data model (missing reference, bad price, empty field)
    #[error(transparent)]
    Rejected(#[from] pizzeria_core::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] ::rusqlite::Error),
}

impl StorageError {
    /// Whether the write failed because a referenced entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected(e) if e.is_not_found())
    }
}

impl From<pizzeria_core::PriceError> for StorageError {
    fn from(e: pizzeria_core::PriceError) -> Self {
        Self::Rejected(e.into())
    }
}

impl From<pizzeria_core::ValidationError> for StorageError {
    fn from(e: pizzeria_core::ValidationError) -> Self {
        Self::Rejected(e.into())
    }
}
