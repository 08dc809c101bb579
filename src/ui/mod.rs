pub mod app;
mod calendar_pane;
mod context;
pub mod rows;

pub use app::App;
pub use calendar_pane::CalendarPane;
pub use context::{Context, PaneState, Theme};
