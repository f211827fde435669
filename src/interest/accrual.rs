use chrono::NaiveDate;

use crate::calendar::days_between;
use crate::decimal::{Money, Rate};
use crate::interest::checked_daily_interest;

/// accrual sub-interval still collecting interest
///
/// `start` is the boundary day and is not accrued, `end` is the last accrued day.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSegment {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub rate: Rate,
    pub balance: Money,
    pub interest: Money,
}

impl OpenSegment {
    fn new(start: NaiveDate, rate: Rate, balance: Money) -> Self {
        Self {
            start,
            end: start,
            rate,
            balance,
            interest: Money::ZERO,
        }
    }

    pub fn days(&self) -> u32 {
        days_between(self.start, self.end)
    }
}

/// finished segment, rate and balance basis were constant across it
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSegment {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: u32,
    pub rate: Rate,
    pub balance: Money,
    pub interest: Money,
}

/// segment state machine for one period
///
/// Two triggers close the open segment: a rate change (before the day accrues)
/// and a repayment (after the day accrued on the old balance). Zero-length
/// segments are never reported.
#[derive(Debug, Clone)]
pub struct SegmentTracker {
    open: OpenSegment,
}

impl SegmentTracker {
    pub fn open(start: NaiveDate, rate: Rate, balance: Money) -> Self {
        Self {
            open: OpenSegment::new(start, rate, balance),
        }
    }

    pub fn current(&self) -> &OpenSegment {
        &self.open
    }

    /// rate trigger, call before accruing the day the rate applies to
    pub fn on_rate(&mut self, rate: Rate) -> Option<ClosedSegment> {
        if rate == self.open.rate {
            return None;
        }
        let boundary = self.open.end;
        let balance = self.open.balance;
        self.reopen(boundary, rate, balance)
    }

    /// accrue one day at the open segment's rate and basis
    ///
    /// `None` when the day's interest or the segment total overflows; the
    /// segment is left untouched.
    pub fn accrue(&mut self, day: NaiveDate) -> Option<Money> {
        let interest = checked_daily_interest(self.open.balance, self.open.rate)?;
        self.open.interest = self.open.interest.checked_add(interest)?;
        self.open.end = day;
        Some(interest)
    }

    /// repayment trigger, call after the day accrued; reopens on the new basis
    pub fn on_repayment(&mut self, new_balance: Money) -> Option<ClosedSegment> {
        let boundary = self.open.end;
        let rate = self.open.rate;
        self.reopen(boundary, rate, new_balance)
    }

    /// close whatever remains at the end of the period
    pub fn finish(self) -> Option<ClosedSegment> {
        Self::close(self.open)
    }

    fn reopen(&mut self, start: NaiveDate, rate: Rate, balance: Money) -> Option<ClosedSegment> {
        let previous = std::mem::replace(&mut self.open, OpenSegment::new(start, rate, balance));
        Self::close(previous)
    }

    fn close(segment: OpenSegment) -> Option<ClosedSegment> {
        let days = segment.days();
        if days == 0 {
            return None;
        }
        Some(ClosedSegment {
            start: segment.start,
            end: segment.end,
            days,
            rate: segment.rate,
            balance: segment.balance,
            interest: segment.interest,
        })
    }
}
