use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Install the global `tracing` subscriber. Output goes to `path` because the
/// terminal UI owns stdout. Nothing is installed when the file cannot be
/// opened; callers treat that as "run without logs".
pub fn init(path: &Path) -> Result<()> {
    let file = open_log_file(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn log_file_and_parents_are_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("app.log");
        open_log_file(&path).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn blocked_log_path_fails_without_installing_a_subscriber() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = init(&blocker.join("app.log")).unwrap_err();
        assert!(err.to_string().contains("log directory"), "{err}");
    }
}
