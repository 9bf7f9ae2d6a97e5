use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PlannerError, PlannerResult};

/// Upper bound on materialised occurrences for one recurring entry.
pub const MAX_OCCURRENCES: u32 = 366;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Frequency::Daily),
            "weekly" | "week" => Ok(Frequency::Weekly),
            "monthly" | "month" => Ok(Frequency::Monthly),
            other => Err(PlannerError::invalid(format!(
                "unknown frequency '{other}' (expected daily, weekly or monthly)"
            ))),
        }
    }
}

/// A recurrence rule that is expanded eagerly into dated entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub occurrences: u32,
}

impl Recurrence {
    pub fn new(frequency: Frequency, occurrences: u32) -> PlannerResult<Self> {
        let rule = Self {
            frequency,
            occurrences,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> PlannerResult<()> {
        if self.occurrences == 0 || self.occurrences > MAX_OCCURRENCES {
            return Err(PlannerError::invalid(format!(
                "occurrences must be between 1 and {MAX_OCCURRENCES}, got {}",
                self.occurrences
            )));
        }
        Ok(())
    }

    /// Dates of every occurrence, starting with `start` itself.
    ///
    /// Monthly steps are taken from `start` rather than from the previous
    /// occurrence, so a 31st clamps to shorter months without drifting.
    pub fn expand(&self, start: NaiveDate) -> PlannerResult<Vec<NaiveDate>> {
        self.validate()?;
        let mut dates = Vec::with_capacity(self.occurrences as usize);
        for step in 0..self.occurrences {
            let date = match self.frequency {
                Frequency::Daily => start.checked_add_days(Days::new(u64::from(step))),
                Frequency::Weekly => start.checked_add_days(Days::new(u64::from(step) * 7)),
                Frequency::Monthly => start.checked_add_months(Months::new(step)),
            }
            .ok_or_else(|| PlannerError::invalid("recurrence runs past the supported date range"))?;
            dates.push(date);
        }
        Ok(dates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_steps_by_seven_days() {
        let rule = Recurrence::new(Frequency::Weekly, 3).unwrap();
        assert_eq!(
            rule.expand(d(2024, 12, 24)).unwrap(),
            vec![d(2024, 12, 24), d(2024, 12, 31), d(2025, 1, 7)]
        );
    }

    #[test]
    fn monthly_clamps_to_month_end() {
        let rule = Recurrence::new(Frequency::Monthly, 4).unwrap();
        assert_eq!(
            rule.expand(d(2024, 1, 31)).unwrap(),
            vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30)]
        );
    }

    #[test]
    fn zero_occurrences_rejected() {
        assert!(matches!(
            Recurrence::new(Frequency::Daily, 0),
            Err(PlannerError::InvalidArgument(_))
        ));
        assert!(Recurrence::new(Frequency::Daily, MAX_OCCURRENCES + 1).is_err());
    }

    #[test]
    fn frequency_parses_aliases() {
        assert_eq!("Weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("month".parse::<Frequency>().unwrap(), Frequency::Monthly);
        assert!("yearly".parse::<Frequency>().is_err());
    }
}
