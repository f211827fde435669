//! tabular import and export around the schedule core
pub mod csv;
pub mod holidays;

pub use self::csv::{schedule_to_csv, write_schedule_csv, SCHEDULE_HEADERS};
pub use holidays::{
    holidays_from_cells, read_holidays_csv, write_holiday_template, HolidayDateCell, HOLIDAY_DATE_COLUMN,
    HOLIDAY_DESC_COLUMN,
};
