use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::calendar::{GRID_CELLS, GridDay, MonthCursor, month_name};
use crate::entry::ScheduledEntry;

/// Display order for entries sharing a date: title, then id.
///
/// Titles compare byte-wise so the order never depends on locale. Unsaved
/// entries (no id) sort ahead of saved ones with the same title.
pub fn display_order(a: &ScheduledEntry, b: &ScheduledEntry) -> Ordering {
    a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id))
}

/// Entries occurring exactly on `date`, in display order.
pub fn entries_on<'a>(date: NaiveDate, entries: &'a [ScheduledEntry]) -> Vec<&'a ScheduledEntry> {
    let mut matching: Vec<&ScheduledEntry> = entries.iter().filter(|e| e.date == date).collect();
    matching.sort_by(|a, b| display_order(a, b));
    matching
}

/// Date to entries lookup with the same ordering as [`entries_on`].
#[derive(Debug, Clone, Default)]
pub struct EntryIndex {
    by_date: BTreeMap<NaiveDate, Vec<ScheduledEntry>>,
}

impl EntryIndex {
    pub fn build(entries: &[ScheduledEntry]) -> Self {
        let mut index = Self::default();
        for entry in entries {
            index.insert(entry.clone());
        }
        index
    }

    pub fn insert(&mut self, entry: ScheduledEntry) {
        let day = self.by_date.entry(entry.date).or_default();
        let pos = day
            .binary_search_by(|probe| display_order(probe, &entry))
            .unwrap_or_else(|pos| pos);
        day.insert(pos, entry);
    }

    /// Drop the entry with `id`, returning it when present.
    pub fn remove(&mut self, id: i64) -> Option<ScheduledEntry> {
        let date = self
            .by_date
            .iter()
            .find(|(_, day)| day.iter().any(|e| e.id == Some(id)))
            .map(|(date, _)| *date)?;
        let day = self.by_date.get_mut(&date)?;
        let pos = day.iter().position(|e| e.id == Some(id))?;
        let removed = day.remove(pos);
        if day.is_empty() {
            self.by_date.remove(&date);
        }
        Some(removed)
    }

    pub fn entries_on(&self, date: NaiveDate) -> &[ScheduledEntry] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

/// One rendered day of a month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_current_month: bool,
    pub is_today: bool,
    pub entries: Vec<ScheduledEntry>,
}

pub fn place_entries(grid: &[GridDay], index: &EntryIndex, today: NaiveDate) -> Vec<CalendarCell> {
    grid.iter()
        .map(|day| CalendarCell {
            date: day.date,
            in_current_month: day.in_current_month,
            is_today: day.date == today,
            entries: index.entries_on(day.date).to_vec(),
        })
        .collect()
}

/// A month grid with its entries placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub week_start: Weekday,
    pub cells: Vec<CalendarCell>,
}

impl MonthView {
    pub fn new(cursor: MonthCursor, week_start: Weekday, cells: Vec<CalendarCell>) -> Self {
        debug_assert_eq!(cells.len(), GRID_CELLS);
        Self {
            year: cursor.year(),
            month: cursor.month(),
            week_start,
            cells,
        }
    }

    pub fn title(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }

    /// Cells belonging to the viewed month that carry entries.
    pub fn agenda(&self) -> impl Iterator<Item = &CalendarCell> {
        self.cells
            .iter()
            .filter(|cell| cell.in_current_month && !cell.entries.is_empty())
    }

    pub fn entry_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.in_current_month)
            .map(|cell| cell.entries.len())
            .sum()
    }
}
