pub mod business_day;

use chrono::{Months, NaiveDate};

use crate::errors::{Result, ScheduleError};

pub use business_day::{is_holiday, shift_to_business_day, BusinessCalendar};

/// add calendar months, clamping to the last day of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ScheduleError::InvalidDate {
            message: format!("{} plus {} months is out of range", date, months),
        })
}

/// day after `date`
pub fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt().ok_or_else(|| ScheduleError::InvalidDate {
        message: format!("no day after {}", date),
    })
}

/// whole days from `start` to `end`, zero if `end` is not after `start`
pub fn days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    (end - start).num_days().max(0) as u32
}
