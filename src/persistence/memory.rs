use parking_lot::Mutex;
use tracing::debug;

use super::PlannerStore;
use crate::entry::ScheduledEntry;
use crate::entry_validation::validate_entry;
use crate::error::{PlannerError, PlannerResult};
use crate::formats::FormatCatalog;

struct MemoryState {
    catalog: FormatCatalog,
    entries: Vec<ScheduledEntry>,
    next_id: i64,
}

/// Process-local store; everything is lost when it is dropped.
pub struct MemoryPlannerStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryPlannerStore {
    fn default() -> Self {
        Self::with_catalog(FormatCatalog::default())
    }
}

impl MemoryPlannerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: FormatCatalog) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                catalog,
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl PlannerStore for MemoryPlannerStore {
    fn list_entries(&self) -> PlannerResult<Vec<ScheduledEntry>> {
        let mut entries = self.state.lock().entries.clone();
        super::sort_for_listing(&mut entries);
        Ok(entries)
    }

    fn list_formats(&self) -> PlannerResult<Vec<String>> {
        Ok(self.state.lock().catalog.as_slice().to_vec())
    }

    fn insert_entries(&self, entries: &[ScheduledEntry]) -> PlannerResult<Vec<ScheduledEntry>> {
        for entry in entries {
            validate_entry(entry).map_err(|err| PlannerError::invalid(err.to_string()))?;
        }
        let mut state = self.state.lock();
        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let id = state.next_id;
            state.next_id += 1;
            let entry = entry.clone().with_id(id);
            state.entries.push(entry.clone());
            saved.push(entry);
        }
        debug!(count = saved.len(), "inserted entries into memory store");
        Ok(saved)
    }

    fn delete_entry(&self, id: i64) -> PlannerResult<bool> {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|e| e.id != Some(id));
        Ok(state.entries.len() != before)
    }

    fn add_format(&self, name: &str) -> PlannerResult<()> {
        self.state.lock().catalog.add(name)?;
        Ok(())
    }

    fn rename_format(&self, old: &str, new: &str) -> PlannerResult<usize> {
        let mut state = self.state.lock();
        let new = state.catalog.rename(old, new)?;
        if new == old {
            return Ok(0);
        }
        let mut moved = 0;
        for entry in state.entries.iter_mut().filter(|e| e.format == old) {
            entry.format = new.clone();
            moved += 1;
        }
        debug!(old, new = %new, moved, "renamed format in memory store");
        Ok(moved)
    }

    fn remove_format(&self, name: &str) -> PlannerResult<()> {
        let mut state = self.state.lock();
        if !state.catalog.contains(name) {
            return Err(PlannerError::UnknownFormat(name.to_string()));
        }
        let in_use = state.entries.iter().filter(|e| e.format == name).count();
        if in_use > 0 {
            return Err(PlannerError::FormatInUse {
                format: name.to_string(),
                entries: in_use,
            });
        }
        state.catalog.remove(name)
    }
}
