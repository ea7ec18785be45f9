use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

/// SQLite file name, kept beside the executable unless overridden.
const DB_FILE_NAME: &str = "database.db";
const LOG_FILE_NAME: &str = "user-registry.log";
/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "user_registry=info";

/// Where the application keeps its files.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve paths from `USER_REGISTRY_DB` / `USER_REGISTRY_LOG`, falling
    /// back to the executable directory and the per-user data directory.
    pub fn from_env() -> Result<Self> {
        let db_path = match non_empty_var("USER_REGISTRY_DB") {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };

        let log_path = match non_empty_var("USER_REGISTRY_LOG") {
            Some(path) => PathBuf::from(path),
            None => default_log_path(&db_path),
        };

        Ok(Self { db_path, log_path })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn default_db_path() -> Result<PathBuf> {
    let exe = env::current_exe().context("failed to locate the running executable")?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    Ok(dir.join(DB_FILE_NAME))
}

/// Per-user data directory when a home directory exists, otherwise next to the
/// database.
fn default_log_path(db_path: &Path) -> PathBuf {
    ProjectDirs::from("", "", "user-registry")
        .map(|dirs| dirs.data_local_dir().join(LOG_FILE_NAME))
        .unwrap_or_else(|| {
            db_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(LOG_FILE_NAME)
        })
}
