//! Schema migrations for Pizzeria storage backends
//!
//! Provides version tracking and migration functions for schema changes.

use crate::{StorageError, StorageResult};

/// Current schema version
pub const CURRENT_VERSION: u32 = 2;

/// One step of the schema history
#[derive(Debug, Clone, Copy)]
pub struct SchemaVersion {
    pub version: u32,
    pub description: &'static str,
}

/// Every schema step, oldest first. The last entry is `CURRENT_VERSION`.
pub const MIGRATIONS: &[SchemaVersion] = &[
    SchemaVersion {
        version: 1,
        description: "restaurants, pizzas and restaurant_pizzas tables",
    },
    SchemaVersion {
        version: 2,
        description: "restaurant_pizzas indexes on restaurant_id and pizza_id",
    },
];

/// Schema bookkeeping for a backend that stores its own version number
pub trait Migratable {
    fn get_schema_version(&self) -> StorageResult<u32>;

    fn set_schema_version(&self, version: u32) -> StorageResult<()>;

    /// Apply the DDL of a single step
    fn run_migration(&self, version: u32) -> StorageResult<()>;

    /// Apply every step after the stored version up to `target_version`.
    ///
    /// A database already past the target is left alone; one past the
    /// newest known step is refused.
    fn migrate_to(&self, target_version: u32) -> StorageResult<()> {
        let known = MIGRATIONS.last().map_or(0, |m| m.version);
        if target_version > known {
            return Err(StorageError::Migration(format!(
                "No migration to schema version {} (newest is {})",
                target_version, known
            )));
        }

        let stored = self.get_schema_version()?;
        if stored > target_version {
            tracing::warn!(
                "Schema version {} is ahead of {}, leaving it untouched",
                stored,
                target_version
            );
            return Ok(());
        }

        let pending = MIGRATIONS
            .iter()
            .filter(|m| m.version > stored && m.version <= target_version);
        for step in pending {
            tracing::info!("Applying schema v{}: {}", step.version, step.description);
            self.run_migration(step.version)?;
            self.set_schema_version(step.version)?;
        }

        Ok(())
    }

    fn migrate_to_latest(&self) -> StorageResult<()> {
        self.migrate_to(CURRENT_VERSION)
    }
}
