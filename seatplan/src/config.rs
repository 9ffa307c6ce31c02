//! Configuration management for the seat plan designer.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::layout::SeatLayout;
use crate::types::{DEFAULT_COL_START_INDEX, DEFAULT_ROW_START_INDEX};
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// New-layout defaults
    pub layout: LayoutConfig,
    /// Logging configuration
    pub log: LogConfig,
}

/// Defaults for layouts created from scratch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Rows of a new layout (clamped to 1..=26)
    pub default_rows: usize,
    /// Columns of a new layout (clamped to 1..=40)
    pub default_cols: usize,
    /// Row letter offset of a new layout
    pub row_start_index: usize,
    /// First seat number of each row of a new layout
    pub col_start_index: u32,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info,seatplan=debug`
    pub filter: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SEATPLAN_DEFAULT_ROWS` | 10 |
    /// | `SEATPLAN_DEFAULT_COLS` | 20 |
    /// | `SEATPLAN_ROW_START_INDEX` | 0 |
    /// | `SEATPLAN_COL_START_INDEX` | 1 |
    /// | `RUST_LOG`, then `SEATPLAN_LOG_LEVEL` | `info,seatplan=debug` |
    ///
    /// Unparsable values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            layout: LayoutConfig {
                default_rows: lookup("SEATPLAN_DEFAULT_ROWS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.layout.default_rows),
                default_cols: lookup("SEATPLAN_DEFAULT_COLS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.layout.default_cols),
                row_start_index: lookup("SEATPLAN_ROW_START_INDEX")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.layout.row_start_index),
                col_start_index: lookup("SEATPLAN_COL_START_INDEX")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.layout.col_start_index),
            },
            log: LogConfig {
                filter: lookup("RUST_LOG")
                    .or_else(|| lookup("SEATPLAN_LOG_LEVEL"))
                    .unwrap_or(defaults.log.filter),
            },
        }
    }

    /// A blank layout with the configured size and numbering
    #[must_use]
    pub fn new_layout(&self) -> SeatLayout {
        SeatLayout::new(self.layout.default_rows, self.layout.default_cols)
            .with_offsets(self.layout.row_start_index, self.layout.col_start_index)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig {
                default_rows: 10,
                default_cols: 20,
                row_start_index: DEFAULT_ROW_START_INDEX,
                col_start_index: DEFAULT_COL_START_INDEX,
            },
            log: LogConfig {
                filter: "info,seatplan=debug".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(|_| None), Config::default());
    }

    #[test]
    fn test_reads_values_and_ignores_garbage() {
        let config = Config::from_lookup(lookup_from(&[
            ("SEATPLAN_DEFAULT_ROWS", "5"),
            ("SEATPLAN_DEFAULT_COLS", "lots"),
            ("SEATPLAN_COL_START_INDEX", "101"),
            ("SEATPLAN_LOG_LEVEL", "warn"),
        ]));
        assert_eq!(config.layout.default_rows, 5);
        assert_eq!(config.layout.default_cols, 20);
        assert_eq!(config.layout.col_start_index, 101);
        assert_eq!(config.log.filter, "warn");
    }

    #[test]
    fn test_rust_log_wins_over_seatplan_log_level() {
        let config = Config::from_lookup(lookup_from(&[
            ("RUST_LOG", "trace"),
            ("SEATPLAN_LOG_LEVEL", "warn"),
        ]));
        assert_eq!(config.log.filter, "trace");
    }

    #[test]
    fn test_new_layout_clamps() {
        let config = Config::from_lookup(lookup_from(&[
            ("SEATPLAN_DEFAULT_ROWS", "99"),
            ("SEATPLAN_ROW_START_INDEX", "10"),
        ]));
        let layout = config.new_layout();
        assert_eq!(layout.rows(), 26);
        assert_eq!(layout.row_start_index(), 0);
    }
}
