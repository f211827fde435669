pub mod accrual;
pub mod rate_table;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate, DAYS_IN_YEAR};

pub use accrual::{ClosedSegment, OpenSegment, SegmentTracker};
pub use rate_table::{rate_on_date, RateTable};

/// one day of simple interest on `balance` at an annual `rate`
pub fn daily_interest(balance: Money, rate: Rate) -> Money {
    balance.apply_rate(rate.as_decimal(), 1)
}

/// `daily_interest` that reports leaving the decimal range as `None`
pub fn checked_daily_interest(balance: Money, rate: Rate) -> Option<Money> {
    balance.checked_apply_rate(rate.as_decimal(), 1)
}

/// balance-weighted annualized rate: interest over the sum of daily balances
pub fn effective_annual_rate(interest: Money, balance_days: Money) -> Rate {
    if !balance_days.is_positive() {
        return Rate::ZERO;
    }
    let rate = interest.as_decimal() / balance_days.as_decimal() * Decimal::from(DAYS_IN_YEAR);
    Rate::from_decimal(rate.round_dp(10))
}
