use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::decimal::{Money, Rate};
use crate::types::HolidayShift;

/// language-neutral annotations attached to schedule rows
///
/// Presentation layers render these however they like; `Display` gives a
/// plain English rendering used by the csv export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Note {
    /// due date moved off a holiday
    HolidayShifted {
        from: NaiveDate,
        shift: HolidayShift,
    },
    /// resolved date did not fall after the previous due date
    ForcedAfterPrevious {
        resolved: NaiveDate,
    },
    /// rate at period start differs from the rate the payment was sized at
    RateChanged {
        new_rate: Rate,
        payment_recalculated: bool,
    },
    PaymentRecalculated {
        payment: Money,
    },
    ExtraRepayment,
    /// repayment larger than the balance, only the balance was applied
    RepaymentCapped {
        requested: Money,
    },
    /// balance interest accrued against
    Basis {
        balance: Money,
    },
    /// installment retires the remaining balance
    FinalInstallment,
    /// interest exceeded the payment, balance grew by `shortfall`
    NegativeAmortization {
        shortfall: Money,
    },
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::HolidayShifted { from, shift } => {
                let direction = match shift {
                    HolidayShift::Following => "deferred",
                    HolidayShift::Preceding => "advanced",
                };
                write!(f, "{} from {} (holiday)", direction, from.format("%b %-d"))
            }
            Note::ForcedAfterPrevious { resolved } => {
                write!(f, "resolved date {} not after previous due date, moved forward", resolved)
            }
            Note::RateChanged {
                new_rate,
                payment_recalculated: true,
            } => write!(f, "rate changed to {} - payment updated", new_rate),
            Note::RateChanged {
                new_rate,
                payment_recalculated: false,
            } => write!(f, "rate changed to {} - payment held", new_rate),
            Note::PaymentRecalculated { payment } => {
                write!(f, "payment recalculated to {:.2}", payment.round_dp(2))
            }
            Note::ExtraRepayment => write!(f, "extra repayment"),
            Note::RepaymentCapped { requested } => {
                write!(f, "requested {:.2} exceeds balance", requested.round_dp(2))
            }
            Note::Basis { balance } => write!(f, "basis: {:.2}", balance.round_dp(2)),
            Note::FinalInstallment => write!(f, "final installment"),
            Note::NegativeAmortization { shortfall } => {
                write!(f, "interest exceeds payment by {:.2}", shortfall.round_dp(2))
            }
        }
    }
}
