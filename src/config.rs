#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use anyhow::{Result, bail};
use tracing::Level;
use typed_builder::TypedBuilder;

use crate::export::DEFAULT_EXPORT_PATH;

/// Default file the application log is appended to.
pub const DEFAULT_LOG_FILE: &str = "student_management.log";

/// Environment variable overriding the default export path.
pub const ENV_EXPORT_PATH: &str = "GRADEBOOK_EXPORT_PATH";
/// Environment variable overriding the log file path; set it empty to disable
/// the file log.
pub const ENV_LOG_FILE: &str = "GRADEBOOK_LOG_FILE";
/// Environment variable setting the log level (`error` .. `trace`).
pub const ENV_LOG_LEVEL: &str = "GRADEBOOK_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
#[builder(doc)]
/// Runtime settings for the grade book application.
pub struct Config {
    /// Where `export` writes when no path is given.
    #[builder(default = PathBuf::from(DEFAULT_EXPORT_PATH), setter(into))]
    export_path: PathBuf,
    /// File the log is appended to, if any.
    #[builder(default = Some(PathBuf::from(DEFAULT_LOG_FILE)), setter(into))]
    log_file:    Option<PathBuf>,
    /// Most verbose level that gets logged.
    #[builder(default = Level::INFO)]
    log_level:   Level,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    /// Builds a config from `GRADEBOOK_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_EXPORT_PATH).map(|s| s.trim().to_owned())
            && !path.is_empty()
        {
            config.export_path = PathBuf::from(path);
        }

        if let Some(path) = lookup(ENV_LOG_FILE) {
            let path = path.trim();
            config.log_file = if path.is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            config.log_level = parse_level(&level)?;
        }

        Ok(config)
    }

    /// Where `export` writes when no path is given.
    pub fn export_path(&self) -> &PathBuf {
        &self.export_path
    }

    /// File the log is appended to, if any.
    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Most verbose level that gets logged.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Returns a copy with a different export path.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Returns a copy with a different (or no) log file.
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Returns a copy logging at `level`.
    pub fn with_log_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }
}

/// Parses a log level name, case-insensitively.
fn parse_level(val: &str) -> Result<Level> {
    match val.trim().to_ascii_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" | "" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        other => bail!("Unknown log level `{other}` in {ENV_LOG_LEVEL}"),
    }
}
