pub mod annuity;

use crate::decimal::{Money, Rate};
use crate::types::AdjustmentStrategy;

pub use annuity::{annuity_payment, term_for_payment};

/// installment sizing state carried across periods
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentPlan {
    strategy: AdjustmentStrategy,
    tenure_months: u32,
    /// rate the current payment was sized at, or last observed under variable tenure
    rate: Rate,
    payment: Money,
}

impl PaymentPlan {
    /// size the payment at origination
    pub fn originate(principal: Money, rate: Rate, tenure_months: u32, strategy: AdjustmentStrategy) -> Self {
        let payment = annuity_payment(principal, rate, tenure_months);
        Self {
            strategy,
            tenure_months,
            rate,
            payment,
        }
    }

    pub fn payment(&self) -> Money {
        self.payment
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn strategy(&self) -> AdjustmentStrategy {
        self.strategy
    }

    /// periods left including `period`, never below one
    pub fn remaining_periods(&self, period: u32) -> u32 {
        self.tenure_months.saturating_sub(period.saturating_sub(1)).max(1)
    }

    /// true when `observed` moved away from the sizing rate by more than `epsilon`
    pub fn rate_moved(&self, observed: Rate, epsilon: Rate) -> bool {
        observed.distance(self.rate) > epsilon
    }

    /// period-start rate change; returns the new payment if it was re-derived
    pub fn on_rate_change(&mut self, observed: Rate, balance: Money, period: u32) -> Option<Money> {
        self.rate = observed;
        match self.strategy {
            AdjustmentStrategy::VariableInstallment => {
                self.payment = annuity_payment(balance, observed, self.remaining_periods(period));
                Some(self.payment)
            }
            AdjustmentStrategy::VariableTenure => None,
        }
    }

    /// lump-sum repayment; returns the new payment if it was re-derived
    pub fn on_repayment(&mut self, day_rate: Rate, balance: Money, period: u32) -> Option<Money> {
        match self.strategy {
            AdjustmentStrategy::VariableInstallment => {
                self.rate = day_rate;
                self.payment = annuity_payment(balance, day_rate, self.remaining_periods(period));
                Some(self.payment)
            }
            AdjustmentStrategy::VariableTenure => None,
        }
    }
}
