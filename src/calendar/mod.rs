mod anchor;
mod classify;
mod error;
mod grid;
mod watcher;
mod window;

pub use anchor::MonthAnchor;
pub use classify::{classify, is_out_of_month, DayKind, TodayCheck};
pub use error::{Error, ErrorKind, Result};
pub use grid::{
    first_visible_day, generate, month_days, month_label, CalendarItem, CalendarMonth, DayCell,
    GridOptions, LabelLocale, Layout, MonthHeader, DAYS_PER_MONTH, DAYS_PER_WEEK,
};
pub use watcher::{decide, Cursors, Extension, ScrollWatcher};
pub use window::{CalendarWindow, DataSource, Position, WindowObserver};

use chrono::{Datelike, NaiveDate};
use std::ops::Range;

use crate::config::Config;

/// Notified with the date of every resolved tap on a day cell.
pub trait DayPressedListener {
    fn item_pressed(&mut self, day: NaiveDate);
}

impl<F: FnMut(NaiveDate)> DayPressedListener for F {
    fn item_pressed(&mut self, day: NaiveDate) {
        self(day)
    }
}

impl<F: FnMut(Range<usize>)> WindowObserver for F {
    fn range_inserted(&mut self, range: Range<usize>) {
        self(range)
    }
}

/// The infinitely extending calendar: window, cursors and pending
/// extensions, all owned by the thread driving the renderer.
pub struct InfiniteCalendar {
    options: GridOptions,
    today_check: TodayCheck,
    window: CalendarWindow,
    cursors: Cursors,
    watcher: ScrollWatcher,
    listener: Option<Box<dyn DayPressedListener>>,
}

impl InfiniteCalendar {
    /// Seeds the window with the months before, at and after `current`.
    pub fn new(current: MonthAnchor, options: GridOptions, today_check: TodayCheck) -> Result<Self> {
        let mut units = generate(current.prev(), &options)?;
        units.extend(generate(current, &options)?);
        units.extend(generate(current.next(), &options)?);

        log::info!(
            "Seeded {:?} calendar around {} with {} units",
            options.layout,
            current,
            units.len()
        );

        Ok(InfiniteCalendar {
            options,
            today_check,
            window: CalendarWindow::new(options.layout, units),
            cursors: Cursors::around(current),
            watcher: ScrollWatcher::default(),
            listener: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            MonthAnchor::default(),
            config.grid_options(),
            config.today_check,
        )
    }

    pub fn with_listener<L: DayPressedListener + 'static>(mut self, listener: L) -> Self {
        self.set_day_pressed_listener(listener);
        self
    }

    pub fn set_day_pressed_listener<L: DayPressedListener + 'static>(&mut self, listener: L) {
        self.listener = Some(Box::new(listener));
    }

    pub fn window(&self) -> &CalendarWindow {
        &self.window
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn layout(&self) -> Layout {
        self.options.layout
    }

    pub fn cursors(&self) -> Cursors {
        self.cursors
    }

    /// Unit the renderer should scroll to first: the middle of the seed,
    /// so that neither edge is visible yet.
    pub fn initial_position(&self) -> usize {
        self.window.len() / 2
    }

    pub fn classify<T: Datelike>(&self, cell: &DayCell, today: &T) -> DayKind {
        classify(cell, today, self.today_check)
    }

    /// Called by the renderer whenever its visible range changed. Any
    /// resulting extension is only queued, see [`InfiniteCalendar::run_pending`].
    pub fn on_visible_range_changed(&mut self, first: usize, last: usize) -> Option<Extension> {
        self.watcher
            .on_visible_range_changed(first, last, self.window.len())
    }

    pub fn has_pending(&self) -> bool {
        self.watcher.has_pending()
    }

    /// Applies queued extensions in request order and reports every
    /// inserted range to `observer`. Returns the number of months loaded.
    /// A request whose month cannot be generated stays queued.
    pub fn run_pending(&mut self, observer: &mut dyn WindowObserver) -> Result<usize> {
        let mut loaded = 0;

        while let Some(extension) = self.watcher.peek_pending() {
            let (cursors, anchor) = self.cursors.step(extension);
            let units = generate(anchor, &self.options)?;
            self.watcher.next_pending();
            self.cursors = cursors;

            let range = match extension {
                Extension::Forward => self.window.append_at_end(units),
                Extension::Backward => self.window.prepend_at_start(units),
            };

            log::debug!(
                "Loaded {} as units {:?}, window now holds {} units",
                anchor,
                range,
                self.window.len()
            );
            observer.range_inserted(range);
            loaded += 1;
        }

        Ok(loaded)
    }

    fn fire_pressed(&mut self, day: NaiveDate) -> NaiveDate {
        log::debug!("Day {} pressed", day);
        if let Some(listener) = self.listener.as_mut() {
            listener.item_pressed(day);
        }
        day
    }

    /// Resolves a tap on the unit at `index`. Taps on headers and on whole
    /// month units resolve to nothing.
    pub fn on_cell_tapped(&mut self, index: usize) -> Option<NaiveDate> {
        let day = self.window.item_at(index).as_day()?.date();
        Some(self.fire_pressed(day))
    }

    /// Resolves a tap on cell `slot` of the month unit at `index`.
    pub fn on_month_day_tapped(&mut self, index: usize, slot: usize) -> Option<NaiveDate> {
        let day = self.window.item_at(index).as_month()?.cell(slot).date();
        Some(self.fire_pressed(day))
    }
}

impl DataSource for InfiniteCalendar {
    fn item_count(&self) -> usize {
        self.window.item_count()
    }

    fn item_at(&self, index: usize) -> &CalendarItem {
        self.window.item_at(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Month, Weekday};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn calendar(layout: Layout) -> InfiniteCalendar {
        let options = GridOptions {
            layout,
            ..GridOptions::default()
        };
        InfiniteCalendar::new(
            MonthAnchor::new(Month::January, 2024),
            options,
            TodayCheck::default(),
        )
        .unwrap()
    }

    #[test]
    fn seeds_previous_current_and_next() {
        let cal = calendar(Layout::Headered);

        assert_eq!(cal.item_count(), 129);
        assert_eq!(cal.window().header_at(0).label(), "December 2023");
        assert_eq!(cal.window().header_at(43).label(), "January 2024");
        assert_eq!(cal.window().header_at(86).label(), "February 2024");
        assert_eq!(cal.cursors(), Cursors::around(MonthAnchor::new(Month::January, 2024)));
    }

    #[test]
    fn initial_position_is_inside_current_month() {
        let cal = calendar(Layout::Headered);
        let middle = cal.initial_position();

        assert_eq!(middle, 64);
        assert_eq!(
            cal.window().month_of(middle),
            Some(MonthAnchor::new(Month::January, 2024))
        );
        assert_eq!(decide(middle, middle, cal.item_count()), None);
    }

    #[test]
    fn extension_is_deferred_until_run() {
        let mut cal = calendar(Layout::Days);

        assert_eq!(cal.on_visible_range_changed(80, 125), Some(Extension::Forward));
        assert_eq!(cal.item_count(), 126);
        assert!(cal.has_pending());

        let mut inserted = Vec::new();
        let loaded = cal.run_pending(&mut |range: Range<usize>| inserted.push(range)).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(inserted, vec![126..168]);
        assert_eq!(cal.item_count(), 168);
        assert!(!cal.has_pending());
    }

    #[test]
    fn end_reached_appends_one_month_after_forward_cursor() {
        let mut cal = calendar(Layout::Headered);
        let forward = cal.cursors().forward;
        let count = cal.item_count();

        cal.on_visible_range_changed(100, count - 1);
        cal.run_pending(&mut |_: Range<usize>| {}).unwrap();

        assert_eq!(cal.item_count(), count + 43);
        assert_eq!(cal.cursors().forward, forward.next());
        assert_eq!(cal.window().header_at(count).label(), "March 2024");
        assert_eq!(cal.window().back_anchor(), Some(forward.next()));
    }

    #[test]
    fn start_reached_prepends_one_month_and_shifts() {
        let mut cal = calendar(Layout::Headered);
        let backward = cal.cursors().backward;
        let probe = *cal.window().day_at(70);

        cal.on_visible_range_changed(0, 30);
        let mut inserted = Vec::new();
        cal.run_pending(&mut |range: Range<usize>| inserted.push(range)).unwrap();

        assert_eq!(inserted, vec![0..43]);
        assert_eq!(cal.cursors().backward, backward.prev());
        assert_eq!(cal.window().header_at(0).label(), "November 2023");
        assert_eq!(cal.window().day_at(70 + 43), &probe);
    }

    #[test]
    fn failed_extension_stays_queued() {
        let options = GridOptions {
            layout: Layout::Days,
            ..GridOptions::default()
        };
        // The December block would run past the last representable date
        let mut cal = InfiniteCalendar::new(
            MonthAnchor::new(Month::October, 262142),
            options,
            TodayCheck::default(),
        )
        .unwrap();
        let cursors = cal.cursors();

        assert_eq!(cal.on_visible_range_changed(50, 125), Some(Extension::Forward));
        let err = cal.run_pending(&mut |_: Range<usize>| {}).unwrap_err();

        assert!(matches!(err.kind, ErrorKind::DateOutOfRange));
        assert!(cal.has_pending());
        assert_eq!(cal.cursors(), cursors);
        assert_eq!(cal.item_count(), 126);
    }

    #[test]
    fn repeated_triggers_load_consecutive_months() {
        let mut cal = calendar(Layout::Months);

        cal.on_visible_range_changed(1, 2);
        cal.on_visible_range_changed(1, 2);
        cal.on_visible_range_changed(0, 1);
        assert_eq!(cal.run_pending(&mut |_: Range<usize>| {}).unwrap(), 3);

        let anchors: Vec<MonthAnchor> = cal
            .window()
            .iter()
            .map(|unit| unit.as_month().unwrap().anchor())
            .collect();
        let first = MonthAnchor::new(Month::November, 2023);
        assert_eq!(anchors, (0..6).map(|i| first + i).collect::<Vec<_>>());
    }

    #[test]
    fn tap_on_day_fires_listener() {
        let pressed = Rc::new(RefCell::new(Vec::new()));
        let sink = pressed.clone();
        let mut cal = calendar(Layout::Headered)
            .with_listener(move |day: NaiveDate| sink.borrow_mut().push(day));

        let tapped = cal.on_cell_tapped(44);
        assert_eq!(tapped, Some(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
        assert_eq!(cal.on_cell_tapped(43), None);
        assert_eq!(*pressed.borrow(), vec![NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()]);
    }

    #[test]
    fn tap_inside_month_unit() {
        let options = GridOptions {
            week_start: Weekday::Mon,
            layout: Layout::Months,
            ..GridOptions::default()
        };
        let mut cal =
            InfiniteCalendar::new(MonthAnchor::new(Month::July, 2024), options, TodayCheck::DayMonth)
                .unwrap();

        // 1 July 2024 is a Monday
        assert_eq!(
            cal.on_month_day_tapped(1, 0),
            Some(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
        );
        assert_eq!(cal.on_cell_tapped(1), None);
    }

    #[test]
    fn classification_uses_configured_check() {
        let cal = calendar(Layout::Days);
        let cell = *cal.window().day_at(50);
        let today = cell.date().with_year(2030).unwrap();

        assert_eq!(cal.classify(&cell, &today), DayKind::InMonth);
    }
}
