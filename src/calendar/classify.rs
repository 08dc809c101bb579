use chrono::Datelike;
use serde::Deserialize;

use super::grid::DayCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    InMonth,
    OutOfMonth,
    Today,
}

/// Which date components must match for a cell to count as today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodayCheck {
    DayMonth,
    DayMonthYear,
}

impl Default for TodayCheck {
    fn default() -> Self {
        TodayCheck::DayMonthYear
    }
}

impl TodayCheck {
    pub fn matches<A: Datelike, B: Datelike>(&self, date: &A, today: &B) -> bool {
        let same_day = date.day() == today.day() && date.month() == today.month();
        match self {
            TodayCheck::DayMonth => same_day,
            TodayCheck::DayMonthYear => same_day && date.year() == today.year(),
        }
    }
}

pub fn is_out_of_month(cell: &DayCell) -> bool {
    !cell.month_anchor().contains(&cell.date())
}

/// Classifies `cell` against its own month and `today`.
///
/// Without a year check a filler cell may only share day and month with
/// today, so month membership is decided first. With the year check a
/// matching filler cell really is today and is reported as such.
pub fn classify<T: Datelike>(cell: &DayCell, today: &T, check: TodayCheck) -> DayKind {
    let out_of_month = is_out_of_month(cell);
    let is_today = check.matches(&cell.date(), today);

    match check {
        TodayCheck::DayMonth if out_of_month => DayKind::OutOfMonth,
        _ if is_today => DayKind::Today,
        _ if out_of_month => DayKind::OutOfMonth,
        _ => DayKind::InMonth,
    }
}
