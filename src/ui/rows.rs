use std::ops::RangeInclusive;

use crate::calendar::{Layout, DAYS_PER_MONTH, DAYS_PER_WEEK};

const WEEKS_PER_MONTH: usize = DAYS_PER_MONTH / DAYS_PER_WEEK;

/// One terminal row of the calendar pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Header unit spanning the full row.
    Header(usize),
    /// Seven day units starting at the given index.
    Week(usize),
    /// Label of a month unit.
    MonthLabel(usize),
    /// One week of a month unit.
    MonthWeek(usize, usize),
}

impl Row {
    /// Window units drawn on this row.
    pub fn units(&self) -> RangeInclusive<usize> {
        match *self {
            Row::Header(index) | Row::MonthLabel(index) | Row::MonthWeek(index, _) => index..=index,
            Row::Week(first) => first..=first + DAYS_PER_WEEK - 1,
        }
    }
}

pub fn rows_per_month(layout: Layout) -> usize {
    match layout {
        Layout::Headered | Layout::Months => WEEKS_PER_MONTH + 1,
        Layout::Days => WEEKS_PER_MONTH,
    }
}

/// Rows needed for `units` window units.
pub fn row_count(layout: Layout, units: usize) -> usize {
    units / layout.stride() * rows_per_month(layout)
}

pub fn row_at(layout: Layout, row: usize) -> Row {
    let per_month = rows_per_month(layout);
    let base = row / per_month * layout.stride();
    let sub = row % per_month;

    match layout {
        Layout::Headered if sub == 0 => Row::Header(base),
        Layout::Headered => Row::Week(base + 1 + (sub - 1) * DAYS_PER_WEEK),
        Layout::Days => Row::Week(base + sub * DAYS_PER_WEEK),
        Layout::Months if sub == 0 => Row::MonthLabel(base),
        Layout::Months => Row::MonthWeek(base, sub - 1),
    }
}

/// Row showing unit `index`, or cell `slot` of it for month units.
pub fn row_of(layout: Layout, index: usize, slot: Option<usize>) -> usize {
    let stride = layout.stride();
    let first_row = index / stride * rows_per_month(layout);
    let within = index % stride;

    first_row
        + match layout {
            Layout::Headered if within == 0 => 0,
            Layout::Headered => 1 + (within - 1) / DAYS_PER_WEEK,
            Layout::Days => within / DAYS_PER_WEEK,
            Layout::Months => 1 + slot.unwrap_or(0) / DAYS_PER_WEEK,
        }
}

/// First and last unit visible when `height` rows starting at `top` are shown.
pub fn visible_units(
    layout: Layout,
    top: usize,
    height: usize,
    units: usize,
) -> Option<(usize, usize)> {
    let rows = row_count(layout, units);
    if height == 0 || top >= rows {
        return None;
    }

    let bottom = (top + height).min(rows) - 1;
    Some((
        *row_at(layout, top).units().start(),
        *row_at(layout, bottom).units().end(),
    ))
}
