use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, PlannerResult};

/// Number of weeks in every month grid.
pub const GRID_WEEKS: usize = 6;
/// Number of cells in every month grid.
pub const GRID_CELLS: usize = GRID_WEEKS * 7;

/// A single date slot of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDay {
    pub date: NaiveDate,
    pub in_current_month: bool,
}

/// Build the 42 dates shown for `year`/`month`, starting on the most recent
/// `week_start` on or before the 1st.
pub fn build_month_grid(year: i32, month: u32, week_start: Weekday) -> PlannerResult<Vec<GridDay>> {
    let start = first_grid_date(year, month, week_start)?;

    let mut grid = Vec::with_capacity(GRID_CELLS);
    for index in 0..GRID_CELLS as u64 {
        let date = start.checked_add_days(Days::new(index)).ok_or_else(|| {
            PlannerError::invalid(format!("grid for {year}-{month:02} exceeds the supported date range"))
        })?;
        grid.push(GridDay {
            date,
            in_current_month: date.year() == year && date.month() == month,
        });
    }
    Ok(grid)
}

/// First date displayed in the grid for `year`/`month`.
pub fn first_grid_date(year: i32, month: u32, week_start: Weekday) -> PlannerResult<NaiveDate> {
    let first = first_of_month(year, month)?;
    let leading = leading_days(first.weekday(), week_start);
    first
        .checked_sub_days(Days::new(leading))
        .ok_or_else(|| PlannerError::invalid(format!("grid for {year}-{month:02} starts before the supported date range")))
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> PlannerResult<u32> {
    let first = first_of_month(year, month)?;
    let next = first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| PlannerError::invalid(format!("year {year} is outside the supported range")))?;
    Ok((next - first).num_days() as u32)
}

fn first_of_month(year: i32, month: u32) -> PlannerResult<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(PlannerError::invalid(format!("month {month} is outside 1..=12")));
    }
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PlannerError::invalid(format!("year {year} is outside the supported range")))
}

// Days between the start of the week and `weekday`.
fn leading_days(weekday: Weekday, week_start: Weekday) -> u64 {
    let from_start = 7 + weekday.num_days_from_monday() - week_start.num_days_from_monday();
    u64::from(from_start % 7)
}

/// The month currently being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> PlannerResult<Self> {
        first_of_month(year, month)?;
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Following month, rolling December over into January.
    pub fn next(&self) -> PlannerResult<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Preceding month, rolling January back into December.
    pub fn prev(&self) -> PlannerResult<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn first_day(&self) -> PlannerResult<NaiveDate> {
        first_of_month(self.year, self.month)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn grid(&self, week_start: Weekday) -> PlannerResult<Vec<GridDay>> {
        build_month_grid(self.year, self.month, week_start)
    }

    pub fn label(&self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Weekdays in display order for a grid starting on `week_start`.
pub fn week_header(week_start: Weekday) -> [Weekday; 7] {
    let mut days = [week_start; 7];
    for idx in 1..7 {
        days[idx] = days[idx - 1].succ();
    }
    days
}
