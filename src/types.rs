use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// direction to move a due date that lands on a holiday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HolidayShift {
    /// next business day
    Following,
    /// previous business day
    Preceding,
}

/// how the loan reacts when rates or repayments perturb the balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdjustmentStrategy {
    /// keep the end date, re-derive the installment
    VariableInstallment,
    /// keep the installment, let the term move
    VariableTenure,
}

/// loan parameters for one schedule computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParams {
    pub principal: Money,
    pub initial_rate: Rate,
    pub tenure_months: u32,
    pub start_date: NaiveDate,
    pub holiday_shift: HolidayShift,
    pub strategy: AdjustmentStrategy,
}

impl LoanParams {
    pub fn new(principal: Money, initial_rate: Rate, tenure_months: u32, start_date: NaiveDate) -> Self {
        Self {
            principal,
            initial_rate,
            tenure_months,
            start_date,
            holiday_shift: HolidayShift::Following,
            strategy: AdjustmentStrategy::VariableInstallment,
        }
    }

    pub fn with_holiday_shift(mut self, shift: HolidayShift) -> Self {
        self.holiday_shift = shift;
        self
    }

    pub fn with_strategy(mut self, strategy: AdjustmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(ScheduleError::invalid(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.initial_rate < Rate::ZERO {
            return Err(ScheduleError::invalid(format!(
                "initial rate must not be negative, got {}",
                self.initial_rate
            )));
        }
        if self.tenure_months == 0 {
            return Err(ScheduleError::invalid("tenure must be at least one month"));
        }
        Ok(())
    }
}

/// inclusive range of non-business days
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayInterval {
    pub id: Uuid,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub label: String,
}

impl HolidayInterval {
    pub fn new(start: NaiveDate, end: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            label: label.into(),
        }
    }

    /// single-day holiday
    pub fn single(date: NaiveDate, label: impl Into<String>) -> Self {
        Self::new(date, date, label)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// annual rate applying from `start`, until `end` or the next interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateInterval {
    pub id: Uuid,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub rate: Rate,
}

impl RateInterval {
    pub fn new(start: NaiveDate, end: Option<NaiveDate>, rate: Rate) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            rate,
        }
    }

    /// open-ended interval, runs until superseded
    pub fn starting(start: NaiveDate, rate: Rate) -> Self {
        Self::new(start, None, rate)
    }
}

/// lump-sum principal repayment on a calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepaymentEvent {
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount: Money,
}

impl RepaymentEvent {
    pub fn new(date: NaiveDate, amount: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            amount,
        }
    }
}
