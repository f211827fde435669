use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};

/// tolerances and ceilings for one schedule computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// balances and payments below this collapse to zero
    pub balance_epsilon: Money,
    /// smallest rate move that counts as a rate change at period start
    pub rate_change_epsilon: Rate,
    /// hard ceiling on simulated periods, 50 years of monthly installments by default
    pub max_periods: u32,
    /// how far a due date may be pushed through consecutive holidays
    pub max_holiday_shift_days: u32,
    /// balance ceiling as a multiple of the principal, past it the loan is
    /// reported as non-convergent
    pub max_balance_multiple: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            balance_epsilon: Money::CENT,
            // 0.001 percentage points
            rate_change_epsilon: Rate::from_decimal(dec!(0.00001)),
            max_periods: 600,
            max_holiday_shift_days: 366,
            max_balance_multiple: 1000,
        }
    }
}

impl ScheduleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_epsilon(mut self, epsilon: Money) -> Self {
        self.balance_epsilon = epsilon;
        self
    }

    pub fn rate_change_epsilon(mut self, epsilon: Rate) -> Self {
        self.rate_change_epsilon = epsilon;
        self
    }

    pub fn max_periods(mut self, periods: u32) -> Self {
        self.max_periods = periods;
        self
    }

    pub fn max_holiday_shift_days(mut self, days: u32) -> Self {
        self.max_holiday_shift_days = days;
        self
    }

    pub fn max_balance_multiple(mut self, multiple: u32) -> Self {
        self.max_balance_multiple = multiple;
        self
    }

    /// highest balance tolerated for a loan of `principal`, `None` when unbounded in practice
    pub fn balance_ceiling(&self, principal: Money) -> Option<Money> {
        principal.checked_mul(self.max_balance_multiple.into())
    }

    /// parse a json document, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScheduleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.balance_epsilon.is_negative() {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!("balance epsilon must not be negative, got {}", self.balance_epsilon),
            });
        }
        if self.rate_change_epsilon < Rate::ZERO {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!("rate change epsilon must not be negative, got {}", self.rate_change_epsilon),
            });
        }
        if self.max_periods == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "max periods must be at least one".to_string(),
            });
        }
        if self.max_holiday_shift_days == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "max holiday shift days must be at least one".to_string(),
            });
        }
        if self.max_balance_multiple == 0 {
            return Err(ScheduleError::InvalidConfiguration {
                message: "max balance multiple must be at least one".to_string(),
            });
        }
        Ok(())
    }
}
