//! Tracker configuration.
//!
//! # Responsibility
//! - Hold the paths and tunables the front end passes into core.
//! - Resolve relative paths against a base directory.
//!
//! # Invariants
//! - After `resolve`, `data_dir` and `log_dir` are absolute.

use crate::logging::default_log_level;
use crate::service::session::DEFAULT_STATUS_RESTORE_DELAY;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Directory holding one snapshot file per month.
    pub data_dir: PathBuf,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// How long a save notice stays on the status line.
    pub status_restore_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: default_log_level().to_string(),
            status_restore_delay: DEFAULT_STATUS_RESTORE_DELAY,
        }
    }
}

impl TrackerConfig {
    /// Returns a copy with relative directories joined onto `base`.
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            data_dir: absolutize(base, &self.data_dir),
            log_dir: absolutize(base, &self.log_dir),
            ..self.clone()
        }
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::TrackerConfig;
    use std::path::PathBuf;

    #[test]
    fn resolve_keeps_absolute_paths_and_joins_relative_ones() {
        let base = std::env::temp_dir();
        let absolute_logs = base.join("elsewhere");
        let config = TrackerConfig {
            log_dir: absolute_logs.clone(),
            ..TrackerConfig::default()
        };

        let resolved = config.resolve(&base);
        assert_eq!(resolved.data_dir, base.join("data"));
        assert_eq!(resolved.log_dir, absolute_logs);
        assert_eq!(resolved.log_level, config.log_level);
    }

    #[test]
    fn defaults_point_at_working_directory_folders() {
        let config = TrackerConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.status_restore_delay.as_millis(), 1000);
    }
}
