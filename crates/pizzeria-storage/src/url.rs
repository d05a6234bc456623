//! Connection strings selecting a storage backend
//!
//! Accepted forms:
//!
//! - `sqlite:///app.db` (relative path) and `sqlite:////var/lib/app.db` (absolute)
//! - `sqlite://:memory:` or `sqlite:///:memory:` for a throwaway SQLite database
//! - `memory://` for the in-memory backend

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryStorage;
use crate::traits::StorageBackend;

/// Used when no connection string is configured
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///app.db";

/// A parsed connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseUrl {
    /// SQLite database file
    Sqlite(PathBuf),
    /// SQLite database living only as long as the process
    SqliteMemory,
    /// In-memory backend
    Memory,
}

impl FromStr for DatabaseUrl {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(rest) = s.strip_prefix("sqlite://") {
            let path = rest.strip_prefix('/').unwrap_or(rest);
            return match path {
                ":memory:" => Ok(Self::SqliteMemory),
                "" => Err(StorageError::Connection(format!(
                    "Missing database path in '{}'",
                    s
                ))),
                path => Ok(Self::Sqlite(PathBuf::from(path))),
            };
        }

        if s == "memory://" || s == "memory" {
            return Ok(Self::Memory);
        }

        Err(StorageError::Connection(format!(
            "Unsupported database URL '{}' (expected sqlite:// or memory://)",
            s
        )))
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::Sqlite(PathBuf::from("app.db"))
    }
}

impl std::fmt::Display for DatabaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(path) => write!(f, "sqlite:///{}", path.display()),
            Self::SqliteMemory => write!(f, "sqlite:///:memory:"),
            Self::Memory => write!(f, "memory://"),
        }
    }
}

/// Open the backend a connection string points at
pub async fn open_storage(url: &DatabaseUrl) -> StorageResult<Arc<dyn StorageBackend>> {
    tracing::debug!("Opening storage: {}", url);

    let storage: Arc<dyn StorageBackend> = match url {
        #[cfg(feature = "sqlite")]
        DatabaseUrl::Sqlite(path) => Arc::new(crate::sqlite::SqliteStorage::open(path)?),
        #[cfg(feature = "sqlite")]
        DatabaseUrl::SqliteMemory => Arc::new(crate::sqlite::SqliteStorage::in_memory()?),
        #[cfg(not(feature = "sqlite"))]
        DatabaseUrl::Sqlite(_) | DatabaseUrl::SqliteMemory => {
            return Err(StorageError::Connection(
                "SQLite support was not compiled in".to_string(),
            ))
        }
        DatabaseUrl::Memory => Arc::new(MemoryStorage::new()),
    };

    storage.initialize().await?;
    Ok(storage)
}
