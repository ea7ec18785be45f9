//! Ratatui front-end: a sidebar form for new users, the user table with a
//! deletion selector, and the statistics panel.

mod app;
mod forms;
mod helpers;
mod terminal;
mod view;

pub use app::{App, StatusKind, StatusMessage};
pub use terminal::run_app;
pub use view::Snapshot;
