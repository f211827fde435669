use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid parameters: {message}")]
    InvalidParameters {
        message: String,
    },

    #[error("invalid rate interval: end {end} precedes start {start}")]
    InvalidRateInterval {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("no business day within {limit} days of {date}")]
    HolidayShiftExceeded {
        date: NaiveDate,
        limit: u32,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("schedule did not converge after {periods} periods, residual balance {residual}")]
    NonConvergent {
        periods: u32,
        residual: Money,
    },

    #[error("holiday import failed at row {row}: {message}")]
    Import {
        row: usize,
        message: String,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScheduleError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ScheduleError::InvalidParameters {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
