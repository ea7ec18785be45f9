//! Binary entry point: resolve paths, start logging, open the store, and drive
//! the Ratatui event loop until the user exits.
use tracing::info;
use user_registry::{logging, run_app, App, Config, Store};

/// Only configuration and terminal failures end the process here. A log file
/// that cannot be opened just disables logging; database errors are shown
/// inside the UI.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    if let Err(err) = logging::init(&config.log_path) {
        eprintln!("logging disabled: {err:#}");
    }
    info!(db = %config.db_path.display(), "starting user registry");

    let mut app = App::new(Store::new(config.db_path));
    run_app(&mut app)
}
