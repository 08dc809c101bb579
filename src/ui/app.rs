use chrono::Duration;
use std::fmt::Write;

use crate::calendar::{InfiniteCalendar, Result};
use crate::config::Config;
use crate::events::{Dispatcher, Event};

use super::{CalendarPane, Context};

use unsegen::base::*;
use unsegen::input::{
    Input, Key, Navigatable, NavigateBehavior, OperationResult, ScrollBehavior, Scrollable,
};
use unsegen::widget::*;

const STATUS_ROWS: usize = 1;

pub struct App<'a> {
    config: &'a Config,
    context: Context,
}

impl<'a> App<'a> {
    pub fn new(config: &'a Config, calendar: InfiniteCalendar) -> App<'a> {
        let context = Context::new(calendar, config.scrolloff);
        App { config, context }
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w
    where
        'a: 'w,
    {
        VLayout::new()
            .widget(CalendarPane::new(&self.context))
            .widget(StatusBar::new(&self.context))
    }

    fn redraw(&mut self, term: &mut Terminal) -> Result<()> {
        let root = term.create_root_window();
        let height = root.get_height().raw_value().max(0) as usize;
        self.context
            .resize(height.saturating_sub(STATUS_ROWS + CalendarPane::WEEKDAY_ROWS));
        self.context.sync_window()?;

        self.as_widget().draw(root, RenderingHints::new());
        term.present();
        Ok(())
    }

    /// Returns `false` once the user asked to quit.
    fn handle_input(&mut self, input: Input) -> bool {
        let mut run = true;

        let leftover = input
            .chain((Key::Char('q'), || run = false))
            .chain(
                NavigateBehavior::new(&mut CursorBehaviour(&mut self.context))
                    .down_on(Key::Char('j'))
                    .up_on(Key::Char('k'))
                    .left_on(Key::Char('h'))
                    .right_on(Key::Char('l')),
            )
            .finish();

        let leftover = leftover.and_then(|input| {
            input
                .chain(
                    ScrollBehavior::new(&mut MonthScrollBehaviour(&mut self.context))
                        .forwards_on(Key::Char(']'))
                        .backwards_on(Key::Char('[')),
                )
                .finish()
        });

        if let Some(input) = leftover {
            if input.matches(Key::Char('\n')) || input.matches(Key::Char(' ')) {
                if self.context.tap_selected().is_none() {
                    log::debug!("Selected cell {} is not tappable", self.context.cursor());
                }
            } else if input.matches(Key::Char('t')) && self.context.select_today().is_err() {
                log::info!("Today is not loaded in the calendar window");
            }
        }

        run
    }

    pub fn run(&mut self, dispatcher: Dispatcher, mut term: Terminal) -> Result<()> {
        let mut run = true;
        log::debug!("Starting with tick rate {:?}", self.config.tick_rate);

        while run {
            // Draw first, a resize only shows up on the next event
            self.redraw(&mut term)?;

            match dispatcher.next() {
                Ok(Event::Update) => self.context.update(),
                Ok(Event::Input(input)) => run = self.handle_input(input),
                Err(_) => run = false,
            }
        }

        Ok(())
    }

    /// Draws the calendar once and waits for any key.
    pub fn show(&mut self, dispatcher: Dispatcher, mut term: Terminal) -> Result<()> {
        self.redraw(&mut term)?;

        while let Ok(event) = dispatcher.next() {
            if let Event::Input(_) = event {
                break;
            }
        }

        Ok(())
    }
}

struct StatusBar<'a> {
    context: &'a Context,
}

impl<'a> StatusBar<'a> {
    fn new(context: &'a Context) -> Self {
        StatusBar { context }
    }
}

impl Widget for StatusBar<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(STATUS_ROWS),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let mut cursor = Cursor::new(&mut window)
            .wrapping_mode(WrappingMode::NoWrap)
            .style_modifier(
                theme
                    .month_header_style
                    .format(theme.month_header_text_style),
            );

        let mut status = format!(
            " {} | {}",
            self.context.status_title(),
            self.context.cursor()
        );
        if let Some(pressed) = self.context.last_pressed() {
            status.push_str(&format!(" | pressed {}", pressed));
        }

        if let Err(err) = write!(cursor, "{}", status) {
            log::warn!("Error while writing status bar: {}", err);
        }
        cursor.fill_and_wrap_line();
    }
}

struct CursorBehaviour<'a>(&'a mut Context);

impl CursorBehaviour<'_> {
    fn move_by(&mut self, by: Duration) -> OperationResult {
        self.0.move_cursor(by)
    }
}

impl Navigatable for CursorBehaviour<'_> {
    fn move_down(&mut self) -> OperationResult {
        self.move_by(Duration::weeks(1))
    }

    fn move_left(&mut self) -> OperationResult {
        self.move_by(Duration::days(-1))
    }

    fn move_right(&mut self) -> OperationResult {
        self.move_by(Duration::days(1))
    }

    fn move_up(&mut self) -> OperationResult {
        self.move_by(Duration::weeks(-1))
    }
}

struct MonthScrollBehaviour<'a>(&'a mut Context);

impl Scrollable for MonthScrollBehaviour<'_> {
    fn scroll_backwards(&mut self) -> OperationResult {
        if self.0.scroll_months(-1) {
            Ok(())
        } else {
            Err(())
        }
    }

    fn scroll_forwards(&mut self) -> OperationResult {
        if self.0.scroll_months(1) {
            Ok(())
        } else {
            Err(())
        }
    }
}
