pub mod builder;
pub mod ledger;
pub mod serialization;
pub mod simulator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ScheduleConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::notes::Note;
use crate::types::{HolidayInterval, LoanParams, RateInterval, RepaymentEvent};

pub use builder::{ScheduleRequest, ScheduleRequestBuilder};
pub use ledger::RowLedger;
pub use serialization::{PeriodView, ScheduleView};
pub use simulator::PeriodSimulator;

/// row discriminator with the variant-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowKind {
    /// contractual installment closing one period
    Installment,
    /// lump sum applied on its calendar date
    Repayment { event_id: Uuid },
    /// accrual sub-interval, `start` exclusive and `end` inclusive
    Segment { start: NaiveDate, end: NaiveDate },
}

/// one ledger entry
///
/// For segments `principal` and `total` are zero and `outstanding_balance` is
/// the accrual basis; `effective_rate` is the segment's nominal rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    #[serde(flatten)]
    pub kind: RowKind,
    pub period: u32,
    pub nominal_date: NaiveDate,
    pub effective_date: NaiveDate,
    pub days: u32,
    pub principal: Money,
    pub interest: Money,
    pub total: Money,
    pub outstanding_balance: Money,
    pub effective_rate: Rate,
    pub notes: Vec<Note>,
}

impl ScheduleRow {
    pub fn is_installment(&self) -> bool {
        matches!(self.kind, RowKind::Installment)
    }

    pub fn is_repayment(&self) -> bool {
        matches!(self.kind, RowKind::Repayment { .. })
    }

    pub fn is_segment(&self) -> bool {
        matches!(self.kind, RowKind::Segment { .. })
    }

    /// `(start, end)` for segments
    pub fn segment_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self.kind {
            RowKind::Segment { start, end } => Some((start, end)),
            _ => None,
        }
    }

    pub fn type_label(&self) -> &'static str {
        match self.kind {
            RowKind::Installment => "INSTALLMENT",
            RowKind::Repayment { .. } => "REPAYMENT",
            RowKind::Segment { .. } => "SEGMENT",
        }
    }
}

/// aggregate totals over the whole schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_principal: Money,
    pub total_interest: Money,
    /// installment totals plus applied repayments
    pub total_paid: Money,
    /// first installment that cleared the balance, else the last row's date
    pub payoff_date: NaiveDate,
    pub installment_count: u32,
}

/// how the simulation ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleOutcome {
    PaidOff,
    /// stopped with balance left, payment never outran interest
    NonConvergent {
        periods: u32,
        residual_balance: Money,
        reason: DivergenceReason,
    },
}

/// which guard stopped a non-convergent simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DivergenceReason {
    /// `max_periods` installments were produced
    PeriodLimit,
    /// balance grew past `max_balance_multiple` times the principal
    BalanceCeiling,
    /// an amount left the decimal range, the failing period is dropped
    Overflow,
}

/// result of one computation, produced once and owned by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub params: LoanParams,
    pub rows: Vec<ScheduleRow>,
    pub summary: Summary,
    pub outcome: ScheduleOutcome,
    /// repayments dated after the loan closed
    pub unapplied_repayments: Vec<RepaymentEvent>,
}

impl Schedule {
    pub fn installments(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|row| row.is_installment())
    }

    pub fn segments(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|row| row.is_segment())
    }

    pub fn repayments(&self) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(|row| row.is_repayment())
    }

    pub fn rows_for_period(&self, period: u32) -> impl Iterator<Item = &ScheduleRow> {
        self.rows.iter().filter(move |row| row.period == period)
    }

    pub fn installment(&self, period: u32) -> Option<&ScheduleRow> {
        self.installments().find(|row| row.period == period)
    }

    pub fn final_balance(&self) -> Money {
        self.installments()
            .last()
            .map(|row| row.outstanding_balance)
            .unwrap_or(self.params.principal)
    }

    pub fn is_paid_off(&self) -> bool {
        matches!(self.outcome, ScheduleOutcome::PaidOff)
    }

    /// turn a non-convergent outcome into an error
    pub fn require_paid_off(self) -> Result<Self> {
        match self.outcome {
            ScheduleOutcome::PaidOff => Ok(self),
            ScheduleOutcome::NonConvergent {
                periods,
                residual_balance,
                ..
            } => Err(ScheduleError::NonConvergent {
                periods,
                residual: residual_balance,
            }),
        }
    }
}

/// generate a schedule with the default configuration
pub fn generate_schedule(
    params: &LoanParams,
    holidays: &[HolidayInterval],
    rate_intervals: &[RateInterval],
    repayments: &[RepaymentEvent],
) -> Result<Schedule> {
    generate_schedule_with_config(params, holidays, rate_intervals, repayments, &ScheduleConfig::default())
}

pub fn generate_schedule_with_config(
    params: &LoanParams,
    holidays: &[HolidayInterval],
    rate_intervals: &[RateInterval],
    repayments: &[RepaymentEvent],
    config: &ScheduleConfig,
) -> Result<Schedule> {
    PeriodSimulator::new(params, holidays, rate_intervals, repayments, config)?.run()
}
