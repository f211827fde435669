use chrono::NaiveDate;

use crate::errors::{Result, ScheduleError};
use crate::types::{HolidayInterval, HolidayShift};

/// true if any holiday interval covers `date`
pub fn is_holiday(date: NaiveDate, holidays: &[HolidayInterval]) -> bool {
    holidays.iter().any(|h| h.contains(date))
}

/// step one calendar day at a time in `shift` direction until `date` is not a holiday
pub fn shift_to_business_day(
    date: NaiveDate,
    holidays: &[HolidayInterval],
    shift: HolidayShift,
    max_steps: u32,
) -> Result<NaiveDate> {
    let mut current = date;
    let mut steps = 0;

    while is_holiday(current, holidays) {
        if steps >= max_steps {
            return Err(ScheduleError::HolidayShiftExceeded {
                date,
                limit: max_steps,
            });
        }
        let stepped = match shift {
            HolidayShift::Following => current.succ_opt(),
            HolidayShift::Preceding => current.pred_opt(),
        };
        current = stepped.ok_or_else(|| ScheduleError::InvalidDate {
            message: format!("holiday shift from {} left the calendar", date),
        })?;
        steps += 1;
    }

    Ok(current)
}

/// holiday set plus the shift convention used to resolve due dates
#[derive(Debug, Clone)]
pub struct BusinessCalendar<'a> {
    holidays: &'a [HolidayInterval],
    shift: HolidayShift,
    max_steps: u32,
}

impl<'a> BusinessCalendar<'a> {
    pub fn new(holidays: &'a [HolidayInterval], shift: HolidayShift, max_steps: u32) -> Self {
        Self {
            holidays,
            shift,
            max_steps,
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        is_holiday(date, self.holidays)
    }

    /// actual date for a nominal due date
    pub fn adjust(&self, nominal: NaiveDate) -> Result<NaiveDate> {
        shift_to_business_day(nominal, self.holidays, self.shift, self.max_steps)
    }

    pub fn shift(&self) -> HolidayShift {
        self.shift
    }
}
