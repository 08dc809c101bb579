use chrono::{Datelike, Weekday};
use std::fmt::{Display, Write};
use unsegen::base::*;
use unsegen::widget::*;

use crate::calendar::{month_label, DataSource, DayCell, DayKind, Layout, DAYS_PER_WEEK};

use super::rows::{self, Row};
use super::context::title_or_anchor;
use super::{Context, Theme};

struct DayView<'a> {
    day_num: u32,
    kind: DayKind,
    selected: bool,
    theme: &'a Theme,
}

impl<'a> DayView<'a> {
    const CELL_WIDTH: usize = 4;

    fn new(cell: &DayCell, context: &Context, theme: &'a Theme) -> Self {
        let cursor = context.cursor();
        DayView {
            day_num: cell.date().day(),
            kind: context.calendar().classify(cell, &context.today()),
            selected: cell.date() == cursor && cell.month_anchor().contains(&cursor),
            theme,
        }
    }

    fn style(&self) -> StyleModifier {
        let theme = self.theme;
        match self.kind {
            DayKind::InMonth => theme.day_style.format(theme.day_text_style),
            DayKind::OutOfMonth => theme
                .out_of_month_style
                .format(theme.out_of_month_text_style),
            DayKind::Today => theme.today_day_style.format(theme.today_day_text_style),
        }
    }
}

impl Display for DayView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arg_today = if self.kind == DayKind::Today {
            self.theme.today_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        let arg_focus = if self.selected {
            self.theme.focus_day_char.unwrap_or(' ')
        } else {
            ' '
        };

        write!(f, "{}{}{:>2}", arg_today, arg_focus, self.day_num)
    }
}

/// Scrolling pane of all loaded months, one week per row.
pub struct CalendarPane<'a> {
    context: &'a Context,
}

impl<'a> CalendarPane<'a> {
    pub const WEEKDAY_ROWS: usize = 1;

    pub fn new(context: &'a Context) -> Self {
        CalendarPane { context }
    }

    fn write_weekdays(&self, cursor: &mut Cursor) {
        let theme = &self.context.theme;
        let saved_style = cursor.get_style_modifier();
        cursor.apply_style_modifier(
            theme
                .month_header_style
                .format(theme.month_header_text_style),
        );

        let mut weekday: Weekday = self.context.calendar().options().week_start;
        for _ in 0..DAYS_PER_WEEK {
            let name = format!("{:?}", weekday);
            if let Err(err) = write!(cursor, "{:>width$}", name, width = DayView::CELL_WIDTH) {
                log::warn!("Error while writing weekday header: {}", err);
            }
            weekday = weekday.succ();
        }

        cursor.set_style_modifier(saved_style);
        cursor.fill_and_wrap_line();
    }

    fn write_label(&self, cursor: &mut Cursor, label: &str) {
        let theme = &self.context.theme;
        let saved_style = cursor.get_style_modifier();
        cursor.apply_style_modifier(
            theme
                .month_header_style
                .format(theme.month_header_text_style),
        );

        let width = DAYS_PER_WEEK * DayView::CELL_WIDTH;
        if let Err(err) = write!(cursor, "{:^width$}", label, width = width) {
            log::warn!("Error while writing month label: {}", err);
        }

        cursor.set_style_modifier(saved_style);
    }

    fn write_days<I: Iterator<Item = DayCell>>(&self, cursor: &mut Cursor, cells: I) {
        let theme = &self.context.theme;
        for cell in cells {
            let view = DayView::new(&cell, self.context, theme);
            let saved_style = cursor.get_style_modifier();
            cursor.apply_style_modifier(view.style());
            if view.selected {
                cursor.apply_style_modifier(
                    theme
                        .focus_day_style
                        .format(theme.focus_day_text_style),
                );
            }

            if let Err(err) = write!(cursor, "{}", view) {
                log::warn!("Error while writing day {}: {}", cell.date(), err);
            }

            cursor.set_style_modifier(saved_style);
        }
    }

    fn write_row(&self, cursor: &mut Cursor, row: Row) {
        let calendar = self.context.calendar();
        let window = calendar.window();

        match row {
            Row::Header(index) => self.write_label(cursor, window.header_at(index).label()),
            Row::MonthLabel(index) => self.write_label(cursor, window.month_at(index).label()),
            Row::Week(first) => self.write_days(
                cursor,
                (first..first + DAYS_PER_WEEK).map(|index| *window.day_at(index)),
            ),
            Row::MonthWeek(index, week) => {
                let month = window.month_at(index);
                self.write_days(
                    cursor,
                    (week * DAYS_PER_WEEK..(week + 1) * DAYS_PER_WEEK).map(|slot| month.cell(slot)),
                )
            }
        }

        // Without headers, label the first week of every month
        if let Row::Week(first) = row {
            if calendar.layout() == Layout::Days && first % Layout::Days.stride() == 0 {
                let anchor = window.day_at(first).month_anchor();
                let label =
                    title_or_anchor(month_label(&anchor, calendar.options().locale), anchor);
                if let Err(err) = write!(cursor, "  {}", label) {
                    log::warn!("Error while writing month marker: {}", err);
                }
            }
        }
    }
}

impl Widget for CalendarPane<'_> {
    fn space_demand(&self) -> Demand2D {
        let layout = self.context.calendar().layout();
        Demand2D {
            width: ColDemand::at_least(DAYS_PER_WEEK * DayView::CELL_WIDTH),
            height: RowDemand::at_least(Self::WEEKDAY_ROWS + rows::rows_per_month(layout)),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let layout = self.context.calendar().layout();
        let units = self.context.calendar().item_count();
        let pane = &self.context.pane;

        let mut cursor = Cursor::new(&mut window).wrapping_mode(WrappingMode::NoWrap);

        self.write_weekdays(&mut cursor);

        let last_row = (pane.top_row + pane.height).min(rows::row_count(layout, units));
        for row in pane.top_row..last_row {
            self.write_row(&mut cursor, rows::row_at(layout, row));
            cursor.fill_and_wrap_line();
        }
    }
}
