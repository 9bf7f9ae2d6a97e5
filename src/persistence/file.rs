use super::{PersistenceError, PersistenceResult};
use crate::entry::ScheduledEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats and entries exported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerSnapshot {
    pub formats: Vec<String>,
    pub entries: Vec<ScheduledEntry>,
}

impl PlannerSnapshot {
    pub fn new(formats: Vec<String>, entries: Vec<ScheduledEntry>) -> Self {
        Self { formats, entries }
    }

    pub fn validate(&self) -> PersistenceResult<()> {
        super::validate_formats(&self.formats)?;
        super::validate_entries(&self.entries)
    }

    /// Entry formats that are missing from the snapshot's own format list.
    pub fn orphaned_formats(&self) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for entry in &self.entries {
            if !self.formats.contains(&entry.format) && !missing.contains(&entry.format) {
                missing.push(entry.format.clone());
            }
        }
        missing
    }
}

pub fn save_snapshot_to_json<P: AsRef<Path>>(
    snapshot: &PlannerSnapshot,
    path: P,
) -> PersistenceResult<()> {
    snapshot.validate()?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<PlannerSnapshot> {
    let file = File::open(path)?;
    let snapshot: PlannerSnapshot = serde_json::from_reader(file)?;
    snapshot.validate()?;
    Ok(snapshot)
}

#[derive(Default, Serialize, Deserialize)]
struct EntryCsvRecord {
    #[serde(default)]
    id: String,
    title: String,
    date: String,
    format: String,
}

impl From<&ScheduledEntry> for EntryCsvRecord {
    fn from(entry: &ScheduledEntry) -> Self {
        Self {
            id: entry.id.map(|id| id.to_string()).unwrap_or_default(),
            title: entry.title.clone(),
            date: entry.date.format(DATE_FORMAT).to_string(),
            format: entry.format.clone(),
        }
    }
}

impl TryFrom<EntryCsvRecord> for ScheduledEntry {
    type Error = PersistenceError;

    fn try_from(record: EntryCsvRecord) -> Result<Self, Self::Error> {
        let id = parse_optional_i64(&record.id)?;
        let date = NaiveDate::parse_from_str(record.date.trim(), DATE_FORMAT).map_err(|err| {
            PersistenceError::InvalidData(format!("invalid date '{}': {err}", record.date))
        })?;
        Ok(ScheduledEntry {
            id,
            title: record.title,
            date,
            format: record.format,
        })
    }
}

fn parse_optional_i64(value: &str) -> PersistenceResult<Option<i64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|err| PersistenceError::InvalidData(format!("invalid id '{trimmed}': {err}")))
}

pub fn save_entries_to_csv<P: AsRef<Path>>(
    entries: &[ScheduledEntry],
    path: P,
) -> PersistenceResult<()> {
    super::validate_entries(entries)?;
    let mut writer = csv::Writer::from_path(path)?;
    for entry in entries {
        writer.serialize(EntryCsvRecord::from(entry))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_entries_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ScheduledEntry>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();
    for record in reader.deserialize::<EntryCsvRecord>() {
        entries.push(ScheduledEntry::try_from(record?)?);
    }
    super::validate_entries(&entries)?;
    Ok(entries)
}
