//! # Simulation Settings
//!
//! The settings file holds exactly eight integers, one per line, in this order:
//!
//! ```text
//! 3    # number of chefs
//! 2    # number of waiters
//! 10   # number of orders
//! 50   # time of order placement (ms)
//! 200  # time of order preparation (ms)
//! 30   # time of order serving (ms)
//! 4    # size of order placement queue
//! 4    # size of prepared order queue
//! ```
//!
//! Anything after the first `#` on a line is ignored. Blank or whitespace-only lines
//! are rejected, as is any value that is not an integer. Counts and queue sizes must
//! be at least one; durations may be zero.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Number of values a settings file must contain.
pub const SETTINGS_COUNT: usize = 8;

const FIELD_NAMES: [&str; SETTINGS_COUNT] = [
    "number of chefs",
    "number of waiters",
    "number of orders",
    "time of order placement",
    "time of order preparation",
    "time of order serving",
    "size of order placement queue",
    "size of prepared order queue",
];

/// Errors raised while loading the settings. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file format: empty or whitespace-only line at line {line}")]
    EmptyLine { line: usize },

    #[error("invalid file format: line {line} is not an integer: {text:?}")]
    NotAnInteger { line: usize, text: String },

    #[error("expected {} settings, found {found}", SETTINGS_COUNT)]
    WrongCount { found: usize },

    #[error("{field} must be at least {min}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        value: i64,
    },
}

/// Validated simulation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    pub number_of_chefs: usize,
    pub number_of_waiters: usize,
    pub number_of_orders: usize,
    pub time_of_order_placement: Duration,
    pub time_of_order_preparation: Duration,
    pub time_of_order_serving: Duration,
    pub size_of_order_placement_queue: usize,
    pub size_of_prepared_order_queue: usize,
}

impl SimulationConfig {
    /// Builds a config with zero simulated work time.
    pub fn new(
        number_of_chefs: usize,
        number_of_waiters: usize,
        number_of_orders: usize,
        size_of_order_placement_queue: usize,
        size_of_prepared_order_queue: usize,
    ) -> Result<Self, ConfigError> {
        Self::from_values([
            number_of_chefs as i64,
            number_of_waiters as i64,
            number_of_orders as i64,
            0,
            0,
            0,
            size_of_order_placement_queue as i64,
            size_of_prepared_order_queue as i64,
        ])
    }

    /// Replaces the three simulated work durations.
    pub fn with_timings(mut self, placement: Duration, preparation: Duration, serving: Duration) -> Self {
        self.time_of_order_placement = placement;
        self.time_of_order_preparation = preparation;
        self.time_of_order_serving = serving;
        self
    }

    /// Reads and validates a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        text.parse()
    }

    fn from_values(values: [i64; SETTINGS_COUNT]) -> Result<Self, ConfigError> {
        for (index, &value) in values.iter().enumerate() {
            // Indices 3..=5 are durations; everything else is a count or a size.
            let min = if (3..=5).contains(&index) { 0 } else { 1 };
            if value < min {
                return Err(ConfigError::OutOfRange {
                    field: FIELD_NAMES[index],
                    min,
                    value,
                });
            }
        }
        let count = |i: usize| values[i] as usize;
        let millis = |i: usize| Duration::from_millis(values[i] as u64);

        Ok(Self {
            number_of_chefs: count(0),
            number_of_waiters: count(1),
            number_of_orders: count(2),
            time_of_order_placement: millis(3),
            time_of_order_preparation: millis(4),
            time_of_order_serving: millis(5),
            size_of_order_placement_queue: count(6),
            size_of_prepared_order_queue: count(7),
        })
    }
}

impl FromStr for SimulationConfig {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut values = Vec::with_capacity(SETTINGS_COUNT);
        for (index, line) in text.lines().enumerate() {
            let line_number = index + 1;
            if line.trim().is_empty() {
                return Err(ConfigError::EmptyLine { line: line_number });
            }
            let value_part = line.split('#').next().unwrap_or_default().trim();
            let value = value_part
                .parse::<i64>()
                .map_err(|_| ConfigError::NotAnInteger {
                    line: line_number,
                    text: value_part.to_string(),
                })?;
            values.push(value);
        }

        let found = values.len();
        let values: [i64; SETTINGS_COUNT] = values
            .try_into()
            .map_err(|_| ConfigError::WrongCount { found })?;
        Self::from_values(values)
    }
}
