use chrono::NaiveDate;
use std::collections::vec_deque::{self, VecDeque};
use std::ops::Range;

use super::anchor::MonthAnchor;
use super::grid::{CalendarItem, CalendarMonth, DayCell, Layout, MonthHeader};

/// Read-only view a renderer lays out from.
pub trait DataSource {
    fn item_count(&self) -> usize;
    fn item_at(&self, index: usize) -> &CalendarItem;
}

/// Receives the exact range of every insertion so already laid out units
/// can be kept in place.
pub trait WindowObserver {
    fn range_inserted(&mut self, range: Range<usize>);
}

/// Where a date lives in the window. `slot` is set for month units only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub slot: Option<usize>,
}

/// Ordered, gap-free sequence of loaded months. Only ever grows.
#[derive(Debug, Clone)]
pub struct CalendarWindow {
    layout: Layout,
    units: VecDeque<CalendarItem>,
}

impl CalendarWindow {
    pub fn new<I>(layout: Layout, units: I) -> Self
    where
        I: IntoIterator<Item = CalendarItem>,
    {
        let window = CalendarWindow {
            layout,
            units: units.into_iter().collect(),
        };
        window.check_layout(0..window.units.len());
        window
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, CalendarItem> {
        self.units.iter()
    }

    /// Inserts `units` after the last unit and returns their new indices.
    pub fn append_at_end(&mut self, units: Vec<CalendarItem>) -> Range<usize> {
        let start = self.units.len();
        self.units.extend(units);
        self.check_layout(start..self.units.len());

        start..self.units.len()
    }

    /// Inserts `units` before the first unit. Every existing index shifts
    /// by the number of inserted units.
    pub fn prepend_at_start(&mut self, units: Vec<CalendarItem>) -> Range<usize> {
        let len = units.len();
        self.units.reserve(len);
        for unit in units.into_iter().rev() {
            self.units.push_front(unit);
        }
        self.check_layout(0..len);

        0..len
    }

    pub fn day_at(&self, index: usize) -> &DayCell {
        match self.item_at(index) {
            CalendarItem::Day(cell) => cell,
            other => panic!("Unit {} is not a day cell: {:?}", index, other),
        }
    }

    pub fn header_at(&self, index: usize) -> &MonthHeader {
        match self.item_at(index) {
            CalendarItem::Header(header) => header,
            other => panic!("Unit {} is not a month header: {:?}", index, other),
        }
    }

    pub fn month_at(&self, index: usize) -> &CalendarMonth {
        match self.item_at(index) {
            CalendarItem::Month(month) => month,
            other => panic!("Unit {} is not a month: {:?}", index, other),
        }
    }

    fn anchor_at(&self, index: usize) -> Option<MonthAnchor> {
        match self.units.get(index)? {
            CalendarItem::Day(cell) => Some(cell.month_anchor()),
            CalendarItem::Month(month) => Some(month.anchor()),
            CalendarItem::Header(_) => self.anchor_at(index + 1),
        }
    }

    pub fn front_anchor(&self) -> Option<MonthAnchor> {
        self.anchor_at(0)
    }

    pub fn back_anchor(&self) -> Option<MonthAnchor> {
        self.anchor_at(self.units.len().checked_sub(1)?)
    }

    /// Month owning the unit at `index`.
    pub fn month_of(&self, index: usize) -> Option<MonthAnchor> {
        let block = index - index % self.layout.stride();
        self.anchor_at(block)
    }

    /// Finds the cell showing `date` inside its own month block.
    pub fn locate(&self, date: NaiveDate) -> Option<Position> {
        let offset = self.front_anchor()?.months_until(&MonthAnchor::from(date));
        if offset < 0 {
            return None;
        }

        let stride = self.layout.stride();
        let block = offset as usize * stride;
        if block >= self.units.len() {
            return None;
        }

        match self.layout {
            Layout::Months => self
                .month_at(block)
                .days()
                .iter()
                .position(|&day| day == date)
                .map(|slot| Position {
                    index: block,
                    slot: Some(slot),
                }),
            Layout::Headered | Layout::Days => (block..(block + stride).min(self.units.len()))
                .find(|&index| {
                    self.units[index]
                        .as_day()
                        .map_or(false, |cell| cell.date() == date)
                })
                .map(|index| Position { index, slot: None }),
        }
    }

    /// Checks header placement of freshly inserted units. Whole months keep
    /// the units outside `inserted` aligned.
    fn check_layout(&self, inserted: Range<usize>) {
        if cfg!(debug_assertions) && self.layout == Layout::Headered {
            let stride = self.layout.stride();
            debug_assert_eq!(
                inserted.len() % stride,
                0,
                "header placement broken: {} units inserted",
                inserted.len()
            );
            for index in inserted {
                debug_assert_eq!(
                    self.units[index].is_header(),
                    index % stride == 0,
                    "header placement broken at unit {}",
                    index
                );
            }
        }
    }
}

impl DataSource for CalendarWindow {
    fn item_count(&self) -> usize {
        self.units.len()
    }

    fn item_at(&self, index: usize) -> &CalendarItem {
        assert!(
            index < self.units.len(),
            "Index {} out of bounds for window of {} units",
            index,
            self.units.len()
        );
        &self.units[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::grid::{generate, GridOptions};
    use chrono::Month;

    fn months(layout: Layout, from: MonthAnchor, n: u32) -> Vec<Vec<CalendarItem>> {
        let options = GridOptions {
            layout,
            ..GridOptions::default()
        };
        (0..n).map(|i| generate(from + i, &options).unwrap()).collect()
    }

    fn seeded(layout: Layout) -> CalendarWindow {
        let anchor = MonthAnchor::new(Month::January, 2024);
        CalendarWindow::new(layout, months(layout, anchor, 3).into_iter().flatten())
    }

    #[test]
    fn seed_holds_three_months() {
        let window = seeded(Layout::Headered);
        assert_eq!(window.item_count(), 3 * 43);
        assert_eq!(window.front_anchor(), Some(MonthAnchor::new(Month::January, 2024)));
        assert_eq!(window.back_anchor(), Some(MonthAnchor::new(Month::March, 2024)));
        assert_eq!(window.header_at(43).label(), "February 2024");
    }

    #[test]
    fn append_reports_tail_range() {
        let mut window = seeded(Layout::Days);
        let april = months(Layout::Days, MonthAnchor::new(Month::April, 2024), 1).remove(0);

        let range = window.append_at_end(april);
        assert_eq!(range, 126..168);
        assert_eq!(window.back_anchor(), Some(MonthAnchor::new(Month::April, 2024)));
    }

    #[test]
    fn prepend_reports_head_range_and_shifts() {
        let mut window = seeded(Layout::Headered);
        let before = *window.day_at(50);
        let december = months(Layout::Headered, MonthAnchor::new(Month::December, 2023), 1).remove(0);

        let range = window.prepend_at_start(december);
        assert_eq!(range, 0..43);
        assert_eq!(window.day_at(50 + 43), &before);
        assert_eq!(window.header_at(0).label(), "December 2023");
        assert_eq!(window.front_anchor(), Some(MonthAnchor::new(Month::December, 2023)));
    }

    #[test]
    fn consecutive_appends_equal_one_append() {
        let extra = months(Layout::Headered, MonthAnchor::new(Month::April, 2024), 2);

        let mut stepwise = seeded(Layout::Headered);
        stepwise.append_at_end(extra[0].clone());
        stepwise.append_at_end(extra[1].clone());

        let mut at_once = seeded(Layout::Headered);
        let range = at_once.append_at_end(extra.concat());

        assert_eq!(range, 129..215);
        assert!(stepwise.iter().eq(at_once.iter()));
    }

    #[test]
    fn consecutive_prepends_equal_one_prepend() {
        let extra = months(Layout::Months, MonthAnchor::new(Month::October, 2023), 2);

        let mut stepwise = seeded(Layout::Months);
        stepwise.prepend_at_start(extra[1].clone());
        stepwise.prepend_at_start(extra[0].clone());

        let mut at_once = seeded(Layout::Months);
        at_once.prepend_at_start(extra.concat());

        assert!(stepwise.iter().eq(at_once.iter()));
        assert_eq!(at_once.month_at(0).anchor(), MonthAnchor::new(Month::October, 2023));
    }

    #[test]
    fn locate_finds_in_month_cell() {
        let window = seeded(Layout::Headered);
        // 1 Feb 2024 is a Thursday, the February block starts on 28 Jan
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let position = window.locate(date).unwrap();

        assert_eq!(position, Position { index: 43 + 1 + 4, slot: None });
        assert_eq!(window.day_at(position.index).date(), date);
        assert_eq!(
            window.month_of(position.index),
            Some(MonthAnchor::new(Month::February, 2024))
        );
    }

    #[test]
    fn locate_in_month_units() {
        let window = seeded(Layout::Months);
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

        let position = window.locate(date).unwrap();
        assert_eq!(position.index, 2);
        assert_eq!(window.month_at(2).cell(position.slot.unwrap()).date(), date);
    }

    #[test]
    fn locate_outside_window_is_none() {
        let window = seeded(Layout::Days);
        assert_eq!(window.locate(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()), None);
        assert_eq!(window.locate(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()), None);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "header placement broken")]
    fn headerless_month_breaks_headered_window() {
        let mut window = seeded(Layout::Headered);
        let april = months(Layout::Days, MonthAnchor::new(Month::April, 2024), 1).remove(0);
        window.append_at_end(april);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "header placement broken")]
    fn misaligned_prepend_is_caught() {
        let mut window = seeded(Layout::Headered);
        let mut december =
            months(Layout::Headered, MonthAnchor::new(Month::December, 2023), 1).remove(0);
        december.remove(0);
        window.prepend_at_start(december);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn index_past_end_panics() {
        let window = seeded(Layout::Days);
        window.item_at(window.item_count());
    }

    #[test]
    #[should_panic(expected = "not a day cell")]
    fn header_slot_is_not_a_day() {
        let window = seeded(Layout::Headered);
        window.day_at(43);
    }
}
