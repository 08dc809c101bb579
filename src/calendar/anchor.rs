use chrono::{Datelike, Local, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};

use super::error::{Error, ErrorKind, Result};

/// Identifies one calendar month. The day of whatever date it was built
/// from is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthAnchor {
    month: Month,
    year: i32,
}

impl MonthAnchor {
    pub fn new(month: Month, year: i32) -> Self {
        MonthAnchor { month, year }
    }

    fn from_ordinal(ordinal: i64) -> Self {
        MonthAnchor {
            month: Month::from_i64(ordinal.rem_euclid(12) + 1).unwrap_or(Month::January),
            year: ordinal.div_euclid(12) as i32,
        }
    }

    /// Months elapsed since January of year 0.
    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.month.number_from_month() as i64 - 1
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number_from_month(), 1).ok_or_else(|| {
            Error::new(
                ErrorKind::DateOutOfRange,
                &format!("{} has no representable first day", self),
            )
        })
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: &MonthAnchor) -> i64 {
        other.ordinal() - self.ordinal()
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year && date.month() == self.month.number_from_month()
    }
}

impl Default for MonthAnchor {
    fn default() -> Self {
        MonthAnchor::from(Local::now())
    }
}

impl<T: Datelike> From<T> for MonthAnchor {
    fn from(d: T) -> Self {
        MonthAnchor::new(
            Month::from_u32(d.month()).unwrap_or(Month::January),
            d.year(),
        )
    }
}

impl Add<u32> for MonthAnchor {
    type Output = MonthAnchor;
    fn add(self, rhs: u32) -> Self::Output {
        MonthAnchor::from_ordinal(self.ordinal() + rhs as i64)
    }
}

impl Sub<u32> for MonthAnchor {
    type Output = MonthAnchor;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthAnchor::from_ordinal(self.ordinal() - rhs as i64)
    }
}

impl PartialOrd for MonthAnchor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthAnchor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for MonthAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month.number_from_month())
    }
}
