//! Runtime configuration for front ends embedding the core.
//!
//! Resolution order, later wins: built-in defaults, `LINKLIT_*` environment
//! variables, explicit overrides from the caller (e.g. CLI flags).

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "LINKLIT_DATA_DIR";
pub const LOG_LEVEL_ENV: &str = "LINKLIT_LOG_LEVEL";

const APP_DIR_NAME: &str = "linklit";
const DB_FILE_NAME: &str = "linklit.sqlite3";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Directory holding the store database and logs.
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl CoreConfig {
    /// Defaults: platform data dir (falling back to the current directory)
    /// and the build-mode log level.
    pub fn defaults() -> Self {
        let base = dirs::data_dir()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir: base.join(APP_DIR_NAME),
            log_level: default_log_level().to_string(),
        }
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::defaults().with_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            self.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|value| !value.trim().is_empty()) {
            self.log_level = level.trim().to_string();
        }
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    /// Absolute log directory, as required by `init_logging`.
    pub fn log_dir(&self) -> PathBuf {
        let dir = self.data_dir.join(LOG_DIR_NAME);
        if dir.is_absolute() {
            return dir;
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(&dir))
            .unwrap_or(dir)
    }
}
