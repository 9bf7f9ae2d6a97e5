use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single scheduled piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledEntry {
    /// Assigned by the store; `None` until the entry has been saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub date: NaiveDate,
    /// Tag from the format catalog.
    pub format: String,
}

impl ScheduledEntry {
    pub fn new(title: impl Into<String>, date: NaiveDate, format: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            date,
            format: format.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}
