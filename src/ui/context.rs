use chrono::{DateTime, Duration, Local, NaiveDate};
use std::ops::Range;

use unsegen::base::style::*;

use crate::calendar::{
    month_label, DataSource, InfiniteCalendar, Layout, MonthAnchor, Position, Result,
    WindowObserver,
};

use super::rows;

/// Upper bound of months loaded while settling a single frame.
const MAX_EXTENSIONS_PER_FRAME: usize = 12;

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub day_text_style: TextFormatModifier,
    pub out_of_month_style: StyleModifier,
    pub out_of_month_text_style: TextFormatModifier,
    pub focus_day_style: StyleModifier,
    pub focus_day_text_style: TextFormatModifier,
    pub focus_day_char: Option<char>,
    pub today_day_style: StyleModifier,
    pub today_day_text_style: TextFormatModifier,
    pub today_day_char: Option<char>,
    pub month_header_style: StyleModifier,
    pub month_header_text_style: TextFormatModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            day_text_style: TextFormatModifier::default(),
            out_of_month_style: StyleModifier::default().fg_color(Color::LightBlack),
            out_of_month_text_style: TextFormatModifier::default(),
            focus_day_style: StyleModifier::default().invert(true),
            focus_day_text_style: TextFormatModifier::default(),
            focus_day_char: None,
            today_day_style: StyleModifier::default().fg_color(Color::Blue),
            today_day_text_style: TextFormatModifier::default().bold(true),
            today_day_char: Some('*'),
            month_header_style: StyleModifier::default().fg_color(Color::Yellow),
            month_header_text_style: TextFormatModifier::default().bold(true),
        }
    }
}

/// Scroll state of the calendar pane, counted in terminal rows.
#[derive(Debug, Clone)]
pub struct PaneState {
    layout: Layout,
    pub top_row: usize,
    pub height: usize,
    pub scrolloff: usize,
}

impl PaneState {
    pub fn new(layout: Layout, scrolloff: usize) -> Self {
        PaneState {
            layout,
            top_row: 0,
            height: 0,
            scrolloff,
        }
    }

    pub fn visible_units(&self, units: usize) -> Option<(usize, usize)> {
        rows::visible_units(self.layout, self.top_row, self.height, units)
    }

    /// Scrolls just enough to keep `row` at least `scrolloff` rows away
    /// from both pane borders.
    pub fn follow(&mut self, row: usize) {
        let scrolloff = self.scrolloff.min(self.height.saturating_sub(1) / 2);

        if row < self.top_row + scrolloff {
            self.top_row = row.saturating_sub(scrolloff);
        } else if self.height > 0 && row + scrolloff >= self.top_row + self.height {
            self.top_row = row + scrolloff + 1 - self.height;
        }
    }

    pub fn scroll_by(&mut self, rows: isize, units: usize) -> bool {
        let max_top = rows::row_count(self.layout, units).saturating_sub(1);
        let target = if rows < 0 {
            self.top_row.saturating_sub(rows.unsigned_abs())
        } else {
            (self.top_row + rows as usize).min(max_top)
        };

        let moved = target != self.top_row;
        self.top_row = target;
        moved
    }
}

impl WindowObserver for PaneState {
    fn range_inserted(&mut self, range: Range<usize>) {
        // Units in front of the viewport moved everything down, follow them.
        if range.start == 0 {
            self.top_row += rows::row_count(self.layout, range.len());
        }
    }
}

pub struct Context {
    calendar: InfiniteCalendar,
    pub theme: Theme,
    pub pane: PaneState,
    cursor: NaiveDate,
    last_pressed: Option<NaiveDate>,
    now: DateTime<Local>,
}

impl Context {
    pub fn new(calendar: InfiniteCalendar, scrolloff: u32) -> Self {
        let now = Local::now();
        let layout = calendar.layout();
        let mut pane = PaneState::new(layout, scrolloff as usize);
        pane.top_row = rows::row_of(layout, calendar.initial_position(), None);

        let mut context = Context {
            calendar,
            theme: Theme::default(),
            pane,
            cursor: now.date_naive(),
            last_pressed: None,
            now,
        };

        if context.calendar.window().locate(context.cursor).is_none() {
            // Seeded from another month than today's
            if let Some(front) = context.calendar.window().front_anchor() {
                if let Ok(first) = front.next().first_day() {
                    context.cursor = first;
                }
            }
        }

        context
    }

    pub fn calendar(&self) -> &InfiniteCalendar {
        &self.calendar
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn last_pressed(&self) -> Option<NaiveDate> {
        self.last_pressed
    }

    pub fn update(&mut self) {
        self.now = Local::now();
    }

    pub fn resize(&mut self, height: usize) {
        self.pane.height = height;
    }

    fn row_of(&self, position: Position) -> usize {
        rows::row_of(self.calendar.layout(), position.index, position.slot)
    }

    /// Reports the visible range and applies extensions until neither edge
    /// of the window is in view.
    pub fn sync_window(&mut self) -> Result<()> {
        for _ in 0..MAX_EXTENSIONS_PER_FRAME {
            let (first, last) = match self.pane.visible_units(self.calendar.item_count()) {
                Some(range) => range,
                None => break,
            };

            if self.calendar.on_visible_range_changed(first, last).is_none() {
                break;
            }

            self.calendar.run_pending(&mut self.pane)?;
        }

        Ok(())
    }

    /// Moves the selected day. Fails if the target is not loaded yet, in
    /// which case the pane scrolls towards it so the next sync loads it.
    pub fn move_cursor(&mut self, by: Duration) -> std::result::Result<(), ()> {
        let target = self.cursor.checked_add_signed(by).ok_or(())?;
        if self.select(target).is_err() {
            let rows = rows::rows_per_month(self.calendar.layout()) as isize;
            let rows = if by < Duration::zero() { -rows } else { rows };
            self.pane.scroll_by(rows, self.calendar.item_count());
            return Err(());
        }
        Ok(())
    }

    pub fn select(&mut self, date: NaiveDate) -> std::result::Result<(), ()> {
        let position = self.calendar.window().locate(date).ok_or(())?;
        self.cursor = date;
        let row = self.row_of(position);
        self.pane.follow(row);
        Ok(())
    }

    pub fn select_today(&mut self) -> std::result::Result<(), ()> {
        self.select(self.today())
    }

    pub fn scroll_months(&mut self, months: isize) -> bool {
        let rows = months * rows::rows_per_month(self.calendar.layout()) as isize;
        self.pane.scroll_by(rows, self.calendar.item_count())
    }

    /// Taps the cell of the selected day.
    pub fn tap_selected(&mut self) -> Option<NaiveDate> {
        let position = self.calendar.window().locate(self.cursor)?;
        let pressed = match position.slot {
            Some(slot) => self.calendar.on_month_day_tapped(position.index, slot),
            None => self.calendar.on_cell_tapped(position.index),
        };

        if pressed.is_some() {
            self.last_pressed = pressed;
        }
        pressed
    }

    pub fn selected_month_label(&self) -> Result<String> {
        month_label(
            &MonthAnchor::from(self.cursor),
            self.calendar.options().locale,
        )
    }

    /// Month title for the status bar, never blank.
    pub fn status_title(&self) -> String {
        title_or_anchor(self.selected_month_label(), MonthAnchor::from(self.cursor))
    }
}

pub(super) fn title_or_anchor(label: Result<String>, anchor: MonthAnchor) -> String {
    label.unwrap_or_else(|err| {
        log::warn!("{}", err);
        anchor.to_string()
    })
}
