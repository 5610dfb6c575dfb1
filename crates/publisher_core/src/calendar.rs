use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::Month;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("calendar label {0:?} is not of the form \"Month Year\"")]
    Malformed(String),
    #[error("unknown month name {0:?}")]
    UnknownMonth(String),
    #[error("invalid year {0:?}")]
    InvalidYear(String),
}

/// A displayed calendar page, e.g. "March 2025".
///
/// Ordering follows the calendar (year, then month number), never the
/// spelling of the month name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CalendarLabel {
    month: Month,
    year: i32,
}

impl CalendarLabel {
    pub fn new(month: Month, year: i32) -> Self {
        Self { month, year }
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    fn ordinal(&self) -> (i32, u32) {
        (self.year, self.month.number_from_month())
    }
}

impl Ord for CalendarLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for CalendarLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CalendarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

impl FromStr for CalendarLabel {
    type Err = CalendarError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split_whitespace();
        let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CalendarError::Malformed(raw.to_string()));
        };
        let month =
            Month::from_str(month).map_err(|_| CalendarError::UnknownMonth(month.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| CalendarError::InvalidYear(year.to_string()))?;
        Ok(Self { month, year })
    }
}

/// Compares two "Month Year" labels in calendar order.
///
/// `Ordering::Less` means `left` comes before `right`.
pub fn compare_dates(left: &str, right: &str) -> Result<Ordering, CalendarError> {
    let left: CalendarLabel = left.parse()?;
    let right: CalendarLabel = right.parse()?;
    Ok(left.cmp(&right))
}
