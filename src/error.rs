//! Error types shared by the planner, the catalog and the stores.

use crate::persistence::PersistenceError;

/// Error type for every fallible planner operation.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Malformed input such as a month outside 1..=12.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Returned when a format name is already present in the catalog.
    #[error("format '{0}' already exists")]
    DuplicateFormat(String),

    /// Returned when removing a format that entries still reference.
    #[error("format '{format}' is used by {entries} {}", entry_noun(.entries))]
    FormatInUse {
        /// The format that was asked to be removed.
        format: String,
        /// Number of entries still tagged with it.
        entries: usize,
    },

    /// Returned when a format is not part of the catalog.
    #[error("unknown format '{0}'")]
    UnknownFormat(String),

    /// Returned when an entry title is empty or whitespace.
    #[error("entry title must not be empty")]
    EmptyTitle,

    /// Returned when no entry carries the given id.
    #[error("entry {0} not found")]
    EntryNotFound(i64),

    /// Storage or serialization failure.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl PlannerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        PlannerError::InvalidArgument(message.into())
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Persistence(PersistenceError::from(value))
    }
}

impl From<std::io::Error> for PlannerError {
    fn from(value: std::io::Error) -> Self {
        Self::Persistence(PersistenceError::from(value))
    }
}

impl From<csv::Error> for PlannerError {
    fn from(value: csv::Error) -> Self {
        Self::Persistence(PersistenceError::from(value))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PlannerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Persistence(PersistenceError::from(value))
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;

fn entry_noun(count: &usize) -> &'static str {
    if *count == 1 { "entry" } else { "entries" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_duplicate_format() {
        let e = PlannerError::DuplicateFormat("Reels".into());
        assert_eq!(e.to_string(), "format 'Reels' already exists");
    }

    #[test]
    fn error_format_in_use_pluralises() {
        let one = PlannerError::FormatInUse {
            format: "Publi".into(),
            entries: 1,
        };
        assert_eq!(one.to_string(), "format 'Publi' is used by 1 entry");

        let many = PlannerError::FormatInUse {
            format: "Publi".into(),
            entries: 3,
        };
        assert_eq!(many.to_string(), "format 'Publi' is used by 3 entries");
    }

    #[test]
    fn error_invalid_argument() {
        let e = PlannerError::invalid("month 13 is outside 1..=12");
        assert_eq!(e.to_string(), "invalid argument: month 13 is outside 1..=12");
    }

    #[test]
    fn error_persistence_is_transparent() {
        let e = PlannerError::from(PersistenceError::InvalidData("bad date".into()));
        assert_eq!(e.to_string(), "invalid data: bad date");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<PlannerError>();
    }
}
