use crate::entry::ScheduledEntry;
use std::collections::HashSet;

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct EntryValidationError {
    message: String,
}

impl EntryValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn describe(entry: &ScheduledEntry) -> String {
    match entry.id {
        Some(id) => format!("entry {id}"),
        None => format!("entry on {}", entry.date),
    }
}

pub fn validate_entry(entry: &ScheduledEntry) -> Result<(), EntryValidationError> {
    if entry.title.trim().is_empty() {
        return Err(EntryValidationError::new(format!(
            "{} has an empty title",
            describe(entry)
        )));
    }
    if entry.format.trim().is_empty() {
        return Err(EntryValidationError::new(format!(
            "{} '{}' has an empty format",
            describe(entry),
            entry.title
        )));
    }
    Ok(())
}

pub fn validate_entry_collection(entries: &[ScheduledEntry]) -> Result<(), EntryValidationError> {
    let mut seen_ids = HashSet::with_capacity(entries.len());
    for entry in entries {
        if let Some(id) = entry.id {
            if !seen_ids.insert(id) {
                return Err(EntryValidationError::new(format!("duplicate entry id {id}")));
            }
        }
        validate_entry(entry)?;
    }
    Ok(())
}

/// Formats must be non-empty and unique (case-sensitive).
pub fn validate_format_list(formats: &[String]) -> Result<(), EntryValidationError> {
    let mut seen = HashSet::with_capacity(formats.len());
    for name in formats {
        if name.trim().is_empty() {
            return Err(EntryValidationError::new("format names must not be empty"));
        }
        if !seen.insert(name.as_str()) {
            return Err(EntryValidationError::new(format!("duplicate format '{name}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(id: Option<i64>, title: &str) -> ScheduledEntry {
        ScheduledEntry {
            id,
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
            format: "Reels".to_string(),
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = validate_entry(&entry(Some(4), "   ")).unwrap_err();
        assert_eq!(err.to_string(), "entry 4 has an empty title");
    }

    #[test]
    fn unsaved_entries_are_described_by_date() {
        let err = validate_entry(&entry(None, "")).unwrap_err();
        assert_eq!(err.to_string(), "entry on 2024-08-05 has an empty title");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let entries = vec![entry(Some(1), "A"), entry(Some(1), "B")];
        let err = validate_entry_collection(&entries).unwrap_err();
        assert_eq!(err.to_string(), "duplicate entry id 1");
    }

    #[test]
    fn unsaved_entries_never_collide() {
        let entries = vec![entry(None, "A"), entry(None, "B")];
        assert!(validate_entry_collection(&entries).is_ok());
    }

    #[test]
    fn format_list_is_case_sensitive() {
        let formats = vec!["Reels".to_string(), "reels".to_string()];
        assert!(validate_format_list(&formats).is_ok());

        let dupes = vec!["Reels".to_string(), "Reels".to_string()];
        assert!(validate_format_list(&dupes).is_err());
    }
}
