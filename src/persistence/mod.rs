use crate::entry::ScheduledEntry;
use crate::entry_validation;
use crate::error::PlannerResult;
use serde_json::Error as SerdeJsonError;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Durable home of entries and formats.
///
/// `rename_format` and `remove_format` are atomic: no reader ever sees some
/// entries carrying the old tag and others the new one.
pub trait PlannerStore {
    /// All entries ordered by date, then display order.
    fn list_entries(&self) -> PlannerResult<Vec<ScheduledEntry>>;
    /// Formats in catalog order.
    fn list_formats(&self) -> PlannerResult<Vec<String>>;
    /// Save unsaved entries in one unit, returning them with ids assigned.
    fn insert_entries(&self, entries: &[ScheduledEntry]) -> PlannerResult<Vec<ScheduledEntry>>;
    fn delete_entry(&self, id: i64) -> PlannerResult<bool>;
    fn add_format(&self, name: &str) -> PlannerResult<()>;
    /// Returns the number of entries moved to the new name.
    fn rename_format(&self, old: &str, new: &str) -> PlannerResult<usize>;
    fn remove_format(&self, name: &str) -> PlannerResult<()>;
}

pub fn validate_entries(entries: &[ScheduledEntry]) -> PersistenceResult<()> {
    entry_validation::validate_entry_collection(entries)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn validate_formats(formats: &[String]) -> PersistenceResult<()> {
    entry_validation::validate_format_list(formats)
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub(crate) fn sort_for_listing(entries: &mut [ScheduledEntry]) {
    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| crate::placement::display_order(a, b))
    });
}

pub mod file;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    PlannerSnapshot, load_entries_from_csv, load_snapshot_from_json, save_entries_to_csv,
    save_snapshot_to_json,
};
pub use memory::MemoryPlannerStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqlitePlannerStore;
