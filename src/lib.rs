pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod export;
pub mod interest;
pub mod notes;
pub mod payments;
pub mod schedule;
pub mod types;

// re-export key types
pub use calendar::{is_holiday, shift_to_business_day, BusinessCalendar};
pub use config::ScheduleConfig;
pub use decimal::{Money, Rate};
pub use errors::{Result, ScheduleError};
pub use interest::{rate_on_date, RateTable};
pub use notes::Note;
pub use payments::{annuity_payment, term_for_payment};
pub use schedule::{
    generate_schedule, generate_schedule_with_config, DivergenceReason, RowKind, Schedule, ScheduleOutcome, ScheduleRequest,
    ScheduleRow, Summary,
};
pub use types::{AdjustmentStrategy, HolidayInterval, HolidayShift, LoanParams, RateInterval, RepaymentEvent};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
