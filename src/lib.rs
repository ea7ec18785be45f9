//! Core library surface for the User Registry TUI: a SQLite-backed list of
//! users with a form to add them and a selector to delete them.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Config;

/// Persistence entry points.
pub use db::{Store, StoreError};

pub use models::{Metrics, UserRecord};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, Snapshot};
