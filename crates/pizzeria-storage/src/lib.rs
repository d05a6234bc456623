//! Pizzeria Storage - Storage backends for the Pizza API
//!
//! This crate provides the entity store: restaurants, pizzas and the
//! restaurant pizzas joining them, with referential checks and cascade
//! deletes, behind the [`StorageBackend`] trait.

#![allow(clippy::result_large_err)]

pub mod error;
pub mod migration;
pub mod traits;
pub mod url;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod memory;

pub use error::{StorageError, StorageResult};
pub use migration::{Migratable, SchemaVersion, CURRENT_VERSION, MIGRATIONS};
pub use traits::StorageBackend;
pub use url::{open_storage, DatabaseUrl, DEFAULT_DATABASE_URL};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

pub use memory::MemoryStorage;
