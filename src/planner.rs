use chrono::{NaiveDate, Weekday};
use tracing::{info, warn};

use crate::calendar::MonthCursor;
#[cfg(feature = "sqlite")]
use crate::config::PlannerConfig;
use crate::entry::ScheduledEntry;
use crate::error::{PlannerError, PlannerResult};
use crate::formats::normalize_format_name;
use crate::persistence::{MemoryPlannerStore, PlannerSnapshot, PlannerStore};
use crate::placement::{self, EntryIndex, MonthView};
use crate::recurrence::Recurrence;

pub type DynPlannerStore = Box<dyn PlannerStore + Send + Sync>;

/// Application state: where entries live, which month is on screen, and
/// which weekday the grid starts on.
pub struct Planner {
    store: DynPlannerStore,
    cursor: MonthCursor,
    week_start: Weekday,
}

impl Planner {
    pub fn new(store: DynPlannerStore, today: NaiveDate, week_start: Weekday) -> Self {
        Self {
            store,
            cursor: MonthCursor::from_date(today),
            week_start,
        }
    }

    /// Memory-backed planner seeded with the default formats.
    pub fn in_memory(today: NaiveDate) -> Self {
        Self::new(Box::new(MemoryPlannerStore::new()), today, Weekday::Sun)
    }

    /// Open the SQLite database named by `config`.
    #[cfg(feature = "sqlite")]
    pub fn from_config(config: &PlannerConfig, today: NaiveDate) -> PlannerResult<Self> {
        use crate::persistence::SqlitePlannerStore;

        let week_start = config.week_start()?;
        if let Some(parent) = config.database.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = SqlitePlannerStore::with_seed_formats(&config.database, &config.default_formats)?;
        info!(database = %config.database.display(), "planner opened");
        Ok(Self::new(Box::new(store), today, week_start))
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn next_month(&mut self) -> PlannerResult<MonthCursor> {
        self.cursor = self.cursor.next()?;
        Ok(self.cursor)
    }

    pub fn prev_month(&mut self) -> PlannerResult<MonthCursor> {
        self.cursor = self.cursor.prev()?;
        Ok(self.cursor)
    }

    pub fn jump_to(&mut self, year: i32, month: u32) -> PlannerResult<MonthCursor> {
        self.cursor = MonthCursor::new(year, month)?;
        Ok(self.cursor)
    }

    pub fn jump_to_date(&mut self, date: NaiveDate) -> MonthCursor {
        self.cursor = MonthCursor::from_date(date);
        self.cursor
    }

    pub fn formats(&self) -> PlannerResult<Vec<String>> {
        self.store.list_formats()
    }

    pub fn entries(&self) -> PlannerResult<Vec<ScheduledEntry>> {
        self.store.list_entries()
    }

    pub fn entries_on(&self, date: NaiveDate) -> PlannerResult<Vec<ScheduledEntry>> {
        let entries = self.store.list_entries()?;
        Ok(placement::entries_on(date, &entries)
            .into_iter()
            .cloned()
            .collect())
    }

    fn prepare_entry(&self, title: &str, date: NaiveDate, format: &str) -> PlannerResult<ScheduledEntry> {
        let title = title.trim();
        if title.is_empty() {
            return Err(PlannerError::EmptyTitle);
        }
        if !self.store.list_formats()?.iter().any(|f| f == format) {
            return Err(PlannerError::UnknownFormat(format.to_string()));
        }
        Ok(ScheduledEntry::new(title, date, format))
    }

    pub fn schedule(&self, title: &str, date: NaiveDate, format: &str) -> PlannerResult<ScheduledEntry> {
        let entry = self.prepare_entry(title, date, format)?;
        let mut saved = self.store.insert_entries(std::slice::from_ref(&entry))?;
        let saved = saved
            .pop()
            .ok_or_else(|| PlannerError::invalid("store returned no entry"))?;
        info!(id = ?saved.id, date = %saved.date, format = %saved.format, "scheduled entry");
        Ok(saved)
    }

    /// Materialise every occurrence of `recurrence` as its own entry.
    pub fn schedule_recurring(
        &self,
        title: &str,
        start: NaiveDate,
        format: &str,
        recurrence: Recurrence,
    ) -> PlannerResult<Vec<ScheduledEntry>> {
        let template = self.prepare_entry(title, start, format)?;
        let entries: Vec<ScheduledEntry> = recurrence
            .expand(start)?
            .into_iter()
            .map(|date| ScheduledEntry {
                date,
                ..template.clone()
            })
            .collect();
        let saved = self.store.insert_entries(&entries)?;
        info!(
            count = saved.len(),
            frequency = %recurrence.frequency,
            format = %template.format,
            "scheduled recurring entries"
        );
        Ok(saved)
    }

    pub fn delete_entry(&self, id: i64) -> PlannerResult<()> {
        if self.store.delete_entry(id)? {
            info!(id, "deleted entry");
            Ok(())
        } else {
            Err(PlannerError::EntryNotFound(id))
        }
    }

    pub fn add_format(&self, name: &str) -> PlannerResult<()> {
        self.store.add_format(name)?;
        info!(format = name.trim(), "added format");
        Ok(())
    }

    pub fn rename_format(&self, old: &str, new: &str) -> PlannerResult<usize> {
        let moved = self.store.rename_format(old, new)?;
        info!(old, new = new.trim(), moved, "renamed format");
        Ok(moved)
    }

    pub fn remove_format(&self, name: &str) -> PlannerResult<()> {
        match self.store.remove_format(name) {
            Ok(()) => {
                info!(format = name, "removed format");
                Ok(())
            }
            Err(err) => {
                warn!(format = name, error = %err, "format not removed");
                Err(err)
            }
        }
    }

    /// The grid for the month under the cursor.
    pub fn month_view(&self, today: NaiveDate) -> PlannerResult<MonthView> {
        self.view_of(self.cursor, today)
    }

    pub fn month_view_for(&self, year: i32, month: u32, today: NaiveDate) -> PlannerResult<MonthView> {
        self.view_of(MonthCursor::new(year, month)?, today)
    }

    fn view_of(&self, cursor: MonthCursor, today: NaiveDate) -> PlannerResult<MonthView> {
        let grid = cursor.grid(self.week_start)?;
        let index = EntryIndex::build(&self.store.list_entries()?);
        let cells = placement::place_entries(&grid, &index, today);
        Ok(MonthView::new(cursor, self.week_start, cells))
    }

    pub fn export_snapshot(&self) -> PlannerResult<PlannerSnapshot> {
        Ok(PlannerSnapshot::new(
            self.store.list_formats()?,
            self.store.list_entries()?,
        ))
    }

    /// Merge a snapshot: unknown formats are added, entries get fresh ids.
    /// Returns the number of entries imported.
    ///
    /// Format names are trimmed before they are matched against the
    /// catalog, and every entry is checked before the catalog is touched.
    pub fn import_snapshot(&self, snapshot: &PlannerSnapshot) -> PlannerResult<usize> {
        snapshot.validate()?;
        let fresh = fresh_entries(&snapshot.entries)?;
        let known = self.store.list_formats()?;

        let mut missing: Vec<String> = Vec::new();
        let listed = snapshot
            .formats
            .iter()
            .map(|name| normalize_format_name(name))
            .collect::<PlannerResult<Vec<String>>>()?;
        for name in listed.into_iter().chain(fresh.iter().map(|e| e.format.clone())) {
            if !known.contains(&name) && !missing.contains(&name) {
                missing.push(name);
            }
        }

        for name in &missing {
            self.store.add_format(name)?;
        }
        let saved = self.store.insert_entries(&fresh)?;
        info!(count = saved.len(), formats_added = missing.len(), "imported snapshot");
        Ok(saved.len())
    }

    pub fn import_entries(&self, entries: &[ScheduledEntry]) -> PlannerResult<usize> {
        let fresh = fresh_entries(entries)?;
        let known = self.store.list_formats()?;
        if let Some(orphan) = fresh.iter().find(|e| !known.contains(&e.format)) {
            return Err(PlannerError::UnknownFormat(orphan.format.clone()));
        }
        let saved = self.store.insert_entries(&fresh)?;
        info!(count = saved.len(), "imported entries");
        Ok(saved.len())
    }
}

// Unsaved copies with trimmed titles and format names.
fn fresh_entries(entries: &[ScheduledEntry]) -> PlannerResult<Vec<ScheduledEntry>> {
    entries
        .iter()
        .map(|e| {
            let title = e.title.trim();
            if title.is_empty() {
                return Err(PlannerError::EmptyTitle);
            }
            Ok(ScheduledEntry::new(title, e.date, normalize_format_name(&e.format)?))
        })
        .collect()
}
