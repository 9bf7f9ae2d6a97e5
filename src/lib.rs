pub mod calendar;
pub mod color;
pub mod config;
pub mod entry;
pub(crate) mod entry_validation;
pub mod error;
pub mod formats;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod placement;
pub mod planner;
pub mod recurrence;

pub use calendar::{GRID_CELLS, GridDay, MonthCursor, build_month_grid, days_in_month};
pub use color::{Rgb, color_for};
pub use config::PlannerConfig;
pub use entry::ScheduledEntry;
pub use entry_validation::EntryValidationError;
pub use error::{PlannerError, PlannerResult};
pub use formats::{DEFAULT_FORMATS, FormatCatalog};
#[cfg(feature = "sqlite")]
pub use persistence::SqlitePlannerStore;
pub use persistence::{
    MemoryPlannerStore, PersistenceError, PlannerSnapshot, PlannerStore, load_entries_from_csv,
    load_snapshot_from_json, save_entries_to_csv, save_snapshot_to_json,
};
pub use placement::{CalendarCell, EntryIndex, MonthView, entries_on, place_entries};
pub use planner::Planner;
pub use recurrence::{Frequency, Recurrence};
