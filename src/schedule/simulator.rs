use chrono::NaiveDate;
use tracing::{debug, trace, warn};

use crate::calendar::{add_months, days_between, next_day, BusinessCalendar};
use crate::config::ScheduleConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::interest::{effective_annual_rate, ClosedSegment, RateTable, SegmentTracker};
use crate::notes::Note;
use crate::payments::{term_for_payment, PaymentPlan};
use crate::types::{AdjustmentStrategy, HolidayInterval, LoanParams, RateInterval, RepaymentEvent};

use super::{DivergenceReason, RowKind, RowLedger, Schedule, ScheduleOutcome, ScheduleRow, Summary};

/// what one period left behind for the next
struct PeriodClose {
    due_date: NaiveDate,
    interest: Money,
    closing_balance: Money,
}

/// day-by-day accrual loop driving the calendar, rate table and payment plan
pub struct PeriodSimulator<'a> {
    params: &'a LoanParams,
    config: &'a ScheduleConfig,
    calendar: BusinessCalendar<'a>,
    rates: RateTable,
    repayments: &'a [RepaymentEvent],
}

impl<'a> PeriodSimulator<'a> {
    /// validate inputs; nothing is simulated until `run`
    pub fn new(
        params: &'a LoanParams,
        holidays: &'a [HolidayInterval],
        rate_intervals: &[RateInterval],
        repayments: &'a [RepaymentEvent],
        config: &'a ScheduleConfig,
    ) -> Result<Self> {
        params.validate()?;
        config.validate()?;

        for holiday in holidays {
            if holiday.end < holiday.start {
                return Err(ScheduleError::invalid(format!(
                    "holiday '{}' ends {} before it starts {}",
                    holiday.label, holiday.end, holiday.start
                )));
            }
        }

        for event in repayments {
            if !event.amount.is_positive() {
                return Err(ScheduleError::invalid(format!(
                    "repayment on {} must be positive, got {}",
                    event.date, event.amount
                )));
            }
            if event.date <= params.start_date {
                return Err(ScheduleError::invalid(format!(
                    "repayment on {} is not after the start date {}",
                    event.date, params.start_date
                )));
            }
        }

        let rates = RateTable::new(params.initial_rate, rate_intervals)?;

        Ok(Self {
            params,
            config,
            calendar: BusinessCalendar::new(holidays, params.holiday_shift, config.max_holiday_shift_days),
            rates,
            repayments,
        })
    }

    pub fn run(&self) -> Result<Schedule> {
        let params = self.params;
        let mut ledger = RowLedger::new();
        let mut balance = params.principal;
        let mut previous = params.start_date;
        let mut total_interest = Money::ZERO;
        let mut plan = PaymentPlan::originate(
            balance,
            self.rates.rate_on(params.start_date),
            params.tenure_months,
            params.strategy,
        );

        debug!(
            principal = %params.principal,
            tenure = params.tenure_months,
            strategy = ?params.strategy,
            payment = %plan.payment(),
            "generating schedule"
        );

        let ceiling = self.config.balance_ceiling(params.principal);
        let mut period = 0;
        let outcome = loop {
            if period >= self.config.max_periods {
                break diverged(period, balance, DivergenceReason::PeriodLimit);
            }

            // an overflowing period leaves no rows behind
            let mark = ledger.checkpoint();
            let close = self
                .simulate_period(period + 1, previous, balance, &mut plan, &mut ledger)?
                .and_then(|close| Some((total_interest.checked_add(close.interest)?, close)));
            let Some((interest_to_date, close)) = close else {
                ledger.rollback(mark);
                break diverged(period, balance, DivergenceReason::Overflow);
            };

            period += 1;
            total_interest = interest_to_date;
            balance = close.closing_balance;
            previous = close.due_date;

            if balance.is_zero() {
                break ScheduleOutcome::PaidOff;
            }
            if ceiling.map_or(false, |limit| balance > limit) {
                break diverged(period, balance, DivergenceReason::BalanceCeiling);
            }
        };

        let summary = self.summarize(&ledger, total_interest);
        let unapplied_repayments = self
            .repayments
            .iter()
            .filter(|event| event.date > previous)
            .cloned()
            .collect();

        debug!(
            installments = summary.installment_count,
            total_interest = %summary.total_interest,
            payoff = %summary.payoff_date,
            "schedule generated"
        );

        Ok(Schedule {
            params: params.clone(),
            rows: ledger.into_rows(),
            summary,
            outcome,
            unapplied_repayments,
        })
    }

    fn simulate_period(
        &self,
        period: u32,
        previous: NaiveDate,
        opening_balance: Money,
        plan: &mut PaymentPlan,
        ledger: &mut RowLedger,
    ) -> Result<Option<PeriodClose>> {
        let mut notes = Vec::new();
        let (nominal, due_date) = self.resolve_due_date(period, previous, &mut notes)?;

        let opening_rate = self.rates.rate_on(previous);
        if plan.rate_moved(opening_rate, self.config.rate_change_epsilon) {
            let recalculated = plan.on_rate_change(opening_rate, opening_balance, period);
            if recalculated.is_none() {
                let projected = term_for_payment(opening_balance, opening_rate, plan.payment(), self.config.max_periods);
                debug!(period, rate = %opening_rate, projected_periods = ?projected, "rate changed, payment held");
            } else {
                debug!(period, rate = %opening_rate, payment = %plan.payment(), "rate changed, payment updated");
            }
            notes.push(Note::RateChanged {
                new_rate: opening_rate,
                payment_recalculated: recalculated.is_some(),
            });
        }

        let mut balance = opening_balance;
        let mut interest = Money::ZERO;
        let mut balance_days = Money::ZERO;
        let mut tracker = SegmentTracker::open(previous, opening_rate, balance);

        let mut day = previous;
        while day < due_date {
            day = next_day(day)?;
            let day_rate = self.rates.rate_on(day);

            if let Some(segment) = tracker.on_rate(day_rate) {
                self.append_segment(ledger, period, segment);
            }

            let Some(accrued) = tracker.accrue(day) else {
                return Ok(None);
            };
            let (Some(period_interest), Some(weighted)) =
                (interest.checked_add(accrued), balance_days.checked_add(balance))
            else {
                return Ok(None);
            };
            interest = period_interest;
            balance_days = weighted;

            for event in self.repayments.iter().filter(|event| event.date == day) {
                let applied = event.amount.min(balance);
                balance = (balance - applied).clamp_below(self.config.balance_epsilon);

                if let Some(segment) = tracker.on_repayment(balance) {
                    self.append_segment(ledger, period, segment);
                }

                let mut repayment_notes = vec![Note::ExtraRepayment];
                if event.amount > applied {
                    repayment_notes.push(Note::RepaymentCapped {
                        requested: event.amount,
                    });
                }
                if let Some(payment) = plan.on_repayment(day_rate, balance, period) {
                    repayment_notes.push(Note::PaymentRecalculated { payment });
                }

                debug!(period, date = %day, amount = %applied, balance = %balance, "repayment applied");
                ledger.append(ScheduleRow {
                    kind: RowKind::Repayment { event_id: event.id },
                    period,
                    nominal_date: day,
                    effective_date: day,
                    days: 0,
                    principal: applied,
                    interest: Money::ZERO,
                    total: applied,
                    outstanding_balance: balance,
                    effective_rate: Rate::ZERO,
                    notes: repayment_notes,
                });
            }
        }

        if let Some(segment) = tracker.finish() {
            self.append_segment(ledger, period, segment);
        }

        let effective_rate = effective_annual_rate(interest, balance_days);
        let epsilon = self.config.balance_epsilon;
        let payment = plan.payment();
        let Some(owed) = balance.checked_add(interest) else {
            return Ok(None);
        };
        let forced = plan.strategy() == AdjustmentStrategy::VariableInstallment
            && period >= self.params.tenure_months;
        let closes = balance.clamp_below(epsilon).is_zero() || payment >= owed || forced;

        let (principal, total) = if closes {
            notes.push(Note::FinalInstallment);
            (balance, owed)
        } else {
            let principal = payment - interest;
            if principal.is_negative() {
                notes.push(Note::NegativeAmortization { shortfall: -principal });
            }
            (principal, payment)
        };

        let Some(closing_balance) = balance.checked_sub(principal) else {
            return Ok(None);
        };
        let closing_balance = closing_balance.clamp_below(epsilon);

        trace!(
            period,
            due = %due_date,
            principal = %principal,
            interest = %interest,
            balance = %closing_balance,
            "installment"
        );

        ledger.append(ScheduleRow {
            kind: RowKind::Installment,
            period,
            nominal_date: nominal,
            effective_date: due_date,
            days: days_between(previous, due_date),
            principal,
            interest,
            total,
            outstanding_balance: closing_balance,
            effective_rate,
            notes,
        });

        Ok(Some(PeriodClose {
            due_date,
            interest,
            closing_balance,
        }))
    }

    /// nominal and actual due date for `period`
    fn resolve_due_date(
        &self,
        period: u32,
        previous: NaiveDate,
        notes: &mut Vec<Note>,
    ) -> Result<(NaiveDate, NaiveDate)> {
        let nominal = add_months(self.params.start_date, period)?;
        let resolved = self.calendar.adjust(nominal)?;

        let due_date = if resolved <= previous {
            notes.push(Note::ForcedAfterPrevious { resolved });
            next_day(previous)?
        } else {
            resolved
        };

        if due_date != nominal {
            notes.push(Note::HolidayShifted {
                from: nominal,
                shift: self.calendar.shift(),
            });
        }

        Ok((nominal, due_date))
    }

    fn append_segment(&self, ledger: &mut RowLedger, period: u32, segment: ClosedSegment) {
        trace!(
            period,
            start = %segment.start,
            end = %segment.end,
            interest = %segment.interest,
            "segment closed"
        );
        ledger.append(ScheduleRow {
            kind: RowKind::Segment {
                start: segment.start,
                end: segment.end,
            },
            period,
            nominal_date: segment.end,
            effective_date: segment.end,
            days: segment.days,
            principal: Money::ZERO,
            interest: segment.interest,
            total: Money::ZERO,
            outstanding_balance: segment.balance,
            effective_rate: segment.rate,
            notes: vec![Note::Basis {
                balance: segment.balance,
            }],
        });
    }

    fn summarize(&self, ledger: &RowLedger, total_interest: Money) -> Summary {
        let epsilon = self.config.balance_epsilon;
        let installments = || ledger.rows().iter().filter(|row| row.is_installment());

        let payoff_date = installments()
            .find(|row| row.outstanding_balance.clamp_below(epsilon).is_zero())
            .or_else(|| ledger.last())
            .map(|row| row.effective_date)
            .unwrap_or(self.params.start_date);

        Summary {
            total_principal: self.params.principal,
            total_interest,
            total_paid: ledger.total_paid(),
            payoff_date,
            installment_count: installments().count() as u32,
        }
    }
}

fn diverged(periods: u32, residual_balance: Money, reason: DivergenceReason) -> ScheduleOutcome {
    warn!(
        periods,
        residual = %residual_balance,
        reason = ?reason,
        "schedule did not converge, payment never outran interest"
    );
    ScheduleOutcome::NonConvergent {
        periods,
        residual_balance,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::annuity_payment;
    use crate::schedule::generate_schedule;
    use crate::types::HolidayShift;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_params() -> LoanParams {
        LoanParams::new(Money::from_major(100_000), Rate::from_percentage(5), 12, date(2024, 1, 1))
    }

    fn tolerance() -> Money {
        Money::CENT
    }

    #[test]
    fn test_baseline_schedule() {
        let schedule = generate_schedule(&base_params(), &[], &[], &[]).unwrap();

        assert!(schedule.is_paid_off());
        assert_eq!(schedule.installments().count(), 12);
        assert_eq!(schedule.summary.installment_count, 12);
        assert_eq!(schedule.final_balance(), Money::ZERO);

        let first = schedule.installment(1).unwrap();
        assert_eq!(first.effective_date, date(2024, 2, 1));
        assert_eq!(first.days, 31);

        let mut previous = Money::from_major(100_000);
        for row in schedule.installments() {
            assert!(row.outstanding_balance < previous);
            previous = row.outstanding_balance;
        }

        assert_eq!(schedule.summary.payoff_date, date(2025, 1, 1));
    }

    #[test]
    fn test_total_interest_matches_payments() {
        let schedule = generate_schedule(&base_params(), &[], &[], &[]).unwrap();

        let paid: Money = schedule.installments().map(|row| row.total).sum();
        assert_eq!(schedule.summary.total_paid, paid);
        let expected_interest = paid - Money::from_major(100_000);
        assert!((schedule.summary.total_interest - expected_interest).abs() <= tolerance());

        let principal: Money = schedule.installments().map(|row| row.principal).sum();
        assert!((principal - Money::from_major(100_000)).abs() <= tolerance());

        // all but the closing installment pay the annuity amount
        let payment = schedule.installment(1).unwrap().total;
        for row in schedule.installments().take(11) {
            assert_eq!(row.total, payment);
            assert_eq!(row.total, row.principal + row.interest);
        }
        let last = schedule.installment(12).unwrap();
        assert!(last.notes.contains(&Note::FinalInstallment));
        assert_eq!(last.total, last.principal + last.interest);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let params = LoanParams::new(Money::from_major(100_000), Rate::ZERO, 12, date(2024, 1, 1));
        let schedule = generate_schedule(&params, &[], &[], &[]).unwrap();

        assert_eq!(schedule.summary.total_interest, Money::ZERO);
        let share = Money::from_major(100_000) / dec!(12);
        for row in schedule.installments().take(11) {
            assert_eq!(row.principal, share);
            assert_eq!(row.interest, Money::ZERO);
        }
        let principal: Money = schedule.installments().map(|row| row.principal).sum();
        assert_eq!(principal, Money::from_major(100_000));
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_segments_reconcile_with_installments() {
        let rates = vec![RateInterval::starting(date(2024, 4, 15), Rate::from_percentage(7))];
        let repayments = vec![RepaymentEvent::new(date(2024, 6, 10), Money::from_major(10_000))];
        let schedule = generate_schedule(&base_params(), &[], &rates, &repayments).unwrap();

        for installment in schedule.installments() {
            let segments: Vec<&ScheduleRow> = schedule
                .rows_for_period(installment.period)
                .filter(|row| row.is_segment())
                .collect();
            let interest: Money = segments.iter().map(|row| row.interest).sum();
            let days: u32 = segments.iter().map(|row| row.days).sum();

            assert_eq!(interest, installment.interest);
            assert_eq!(days, installment.days);
        }
    }

    #[test]
    fn test_mid_period_rate_change_splits_segments() {
        let rates = vec![RateInterval::starting(date(2024, 4, 15), Rate::from_percentage(7))];
        let schedule = generate_schedule(&base_params(), &[], &rates, &[]).unwrap();

        let segments: Vec<&ScheduleRow> = schedule.rows_for_period(4).filter(|row| row.is_segment()).collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].segment_range(), Some((date(2024, 4, 1), date(2024, 4, 14))));
        assert_eq!(segments[0].effective_rate, Rate::from_percentage(5));
        assert_eq!(segments[1].segment_range(), Some((date(2024, 4, 14), date(2024, 5, 1))));
        assert_eq!(segments[1].effective_rate, Rate::from_percentage(7));

        // blended rate sits between the two nominal rates
        let installment = schedule.installment(4).unwrap();
        assert!(installment.effective_rate > Rate::from_percentage(5));
        assert!(installment.effective_rate < Rate::from_percentage(7));
    }

    #[test]
    fn test_rate_change_variable_installment() {
        let rates = vec![RateInterval::starting(date(2024, 4, 1), Rate::from_percentage(7))];
        let schedule = generate_schedule(&base_params(), &[], &rates, &[]).unwrap();

        assert_eq!(schedule.installments().count(), 12);
        assert_eq!(schedule.final_balance(), Money::ZERO);

        let third = schedule.installment(3).unwrap();
        let fourth = schedule.installment(4).unwrap();
        assert!(fourth.total > third.total);
        assert_eq!(
            fourth.total,
            annuity_payment(third.outstanding_balance, Rate::from_percentage(7), 9)
        );
        assert!(fourth.notes.contains(&Note::RateChanged {
            new_rate: Rate::from_percentage(7),
            payment_recalculated: true,
        }));
        // only reported once
        assert!(schedule.installment(5).unwrap().notes.is_empty());
    }

    #[test]
    fn test_rate_change_variable_tenure() {
        let params = base_params().with_strategy(AdjustmentStrategy::VariableTenure);
        let rates = vec![RateInterval::starting(date(2024, 4, 1), Rate::from_percentage(7))];
        let schedule = generate_schedule(&params, &[], &rates, &[]).unwrap();

        assert!(schedule.is_paid_off());
        assert!(schedule.installments().count() > 12);

        let payment = schedule.installment(1).unwrap().total;
        assert_eq!(schedule.installment(4).unwrap().total, payment);
        assert!(schedule.installment(4).unwrap().notes.contains(&Note::RateChanged {
            new_rate: Rate::from_percentage(7),
            payment_recalculated: false,
        }));
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_rate_interval_on_start_date_applies_from_day_one() {
        let rates = vec![RateInterval::starting(date(2024, 1, 1), Rate::from_percentage(7))];
        let schedule = generate_schedule(&base_params(), &[], &rates, &[]).unwrap();

        let first = schedule.installment(1).unwrap();
        assert!(first.notes.is_empty());
        let segment = schedule.rows_for_period(1).find(|row| row.is_segment()).unwrap();
        assert_eq!(segment.effective_rate, Rate::from_percentage(7));
        assert_eq!(schedule.installments().count(), 12);
    }

    #[test]
    fn test_repayment_on_due_date() {
        let repayments = vec![RepaymentEvent::new(date(2024, 3, 1), Money::from_major(20_000))];
        let schedule = generate_schedule(&base_params(), &[], &[], &repayments).unwrap();

        let index = schedule.rows.iter().position(|row| row.is_repayment()).unwrap();
        let repayment = &schedule.rows[index];
        assert_eq!(repayment.period, 2);
        assert_eq!(repayment.principal, Money::from_major(20_000));
        assert_eq!(repayment.interest, Money::ZERO);
        assert_eq!(repayment.days, 0);

        let before = schedule.installment(1).unwrap().outstanding_balance;
        assert_eq!(repayment.outstanding_balance, before - Money::from_major(20_000));

        // the segment closed by the repayment carries the old basis
        assert_eq!(schedule.rows[index - 1].outstanding_balance, before);

        // next accrual runs on the reduced basis, after installment 2 is paid
        let next_segment = schedule.rows[index + 1..].iter().find(|row| row.is_segment()).unwrap();
        assert_eq!(next_segment.period, 3);
        assert_eq!(next_segment.outstanding_balance, schedule.installment(2).unwrap().outstanding_balance);
        assert!(next_segment.outstanding_balance < repayment.outstanding_balance);

        assert_eq!(schedule.installments().count(), 12);
        assert_eq!(schedule.final_balance(), Money::ZERO);
    }

    #[test]
    fn test_mid_period_repayment_rebases_next_segment() {
        let repayments = vec![RepaymentEvent::new(date(2024, 3, 15), Money::from_major(20_000))];
        let schedule = generate_schedule(&base_params(), &[], &[], &repayments).unwrap();

        let index = schedule.rows.iter().position(|row| row.is_repayment()).unwrap();
        let repayment = &schedule.rows[index];
        let following = &schedule.rows[index + 1];

        assert!(following.is_segment());
        assert_eq!(following.outstanding_balance, repayment.outstanding_balance);
        assert_eq!(following.segment_range().unwrap().0, date(2024, 3, 15));
        assert!(repayment
            .notes
            .iter()
            .any(|note| matches!(note, Note::PaymentRecalculated { .. })));
    }

    #[test]
    fn test_repayment_variable_tenure_shortens_term() {
        let params = base_params().with_strategy(AdjustmentStrategy::VariableTenure);
        let repayments = vec![RepaymentEvent::new(date(2024, 3, 15), Money::from_major(30_000))];
        let schedule = generate_schedule(&params, &[], &[], &repayments).unwrap();

        assert!(schedule.is_paid_off());
        assert!(schedule.installments().count() < 12);
        let payment = schedule.installment(1).unwrap().total;
        assert_eq!(schedule.installment(4).unwrap().total, payment);
    }

    #[test]
    fn test_repayment_larger_than_balance_floors_at_zero() {
        let repayments = vec![RepaymentEvent::new(date(2024, 2, 10), Money::from_major(250_000))];
        let schedule = generate_schedule(&base_params(), &[], &[], &repayments).unwrap();

        let repayment = schedule.repayments().next().unwrap();
        assert_eq!(repayment.outstanding_balance, Money::ZERO);
        assert!(repayment.principal < Money::from_major(250_000));
        assert!(repayment.notes.contains(&Note::RepaymentCapped {
            requested: Money::from_major(250_000),
        }));

        // period 2 settles the interest accrued before the repayment
        assert!(schedule.is_paid_off());
        assert_eq!(schedule.installments().count(), 2);
        let last = schedule.installment(2).unwrap();
        assert_eq!(last.principal, Money::ZERO);
        assert!(last.interest.is_positive());
        assert_eq!(last.total, last.interest);
    }

    #[test]
    fn test_holiday_shifts_due_date() {
        let holidays = vec![HolidayInterval::new(date(2024, 1, 30), date(2024, 2, 4), "closure")];
        let schedule = generate_schedule(&base_params(), &holidays, &[], &[]).unwrap();
        let first = schedule.installment(1).unwrap();
        assert_eq!(first.nominal_date, date(2024, 2, 1));
        assert_eq!(first.effective_date, date(2024, 2, 5));
        assert_eq!(first.days, 35);
        assert!(first.notes.contains(&Note::HolidayShifted {
            from: date(2024, 2, 1),
            shift: HolidayShift::Following,
        }));
        // period 2 is shorter to make up for it
        assert_eq!(schedule.installment(2).unwrap().days, 25);

        let preceding = base_params().with_holiday_shift(HolidayShift::Preceding);
        let schedule = generate_schedule(&preceding, &holidays, &[], &[]).unwrap();
        assert_eq!(schedule.installment(1).unwrap().effective_date, date(2024, 1, 29));
    }

    #[test]
    fn test_preceding_shift_never_reaches_previous_due_date() {
        // every day from the start through the first due date is a holiday
        let holidays = vec![HolidayInterval::new(date(2023, 12, 20), date(2024, 2, 1), "closure")];
        let params = base_params().with_holiday_shift(HolidayShift::Preceding);
        let schedule = generate_schedule(&params, &holidays, &[], &[]).unwrap();

        let first = schedule.installment(1).unwrap();
        assert_eq!(first.effective_date, date(2024, 1, 2));
        assert_eq!(first.days, 1);
        assert!(first.notes.contains(&Note::ForcedAfterPrevious {
            resolved: date(2023, 12, 19),
        }));
    }

    #[test]
    fn test_non_convergent_schedule_is_reported() {
        let params = base_params().with_strategy(AdjustmentStrategy::VariableTenure);
        // interest outruns the fixed payment from period two
        let rates = vec![RateInterval::starting(date(2024, 2, 1), Rate::from_percentage(150))];
        let config = ScheduleConfig::default().max_periods(24);
        let schedule = crate::schedule::generate_schedule_with_config(&params, &[], &rates, &[], &config).unwrap();

        assert!(!schedule.is_paid_off());
        assert_eq!(schedule.installments().count(), 24);
        match &schedule.outcome {
            ScheduleOutcome::NonConvergent {
                periods,
                residual_balance,
                reason,
            } => {
                assert_eq!(*periods, 24);
                assert_eq!(*reason, DivergenceReason::PeriodLimit);
                assert!(*residual_balance > Money::from_major(100_000));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(schedule
            .installment(2)
            .unwrap()
            .notes
            .iter()
            .any(|note| matches!(note, Note::NegativeAmortization { .. })));
        assert!(matches!(
            schedule.require_paid_off(),
            Err(ScheduleError::NonConvergent { periods: 24, .. })
        ));
    }

    #[test]
    fn test_runaway_balance_stops_at_ceiling() {
        let params = base_params().with_strategy(AdjustmentStrategy::VariableTenure);
        let ceiling = Money::from_major(100_000_000);

        for percentage in [120, 150] {
            let rates = vec![RateInterval::starting(date(2024, 2, 1), Rate::from_percentage(percentage))];
            let schedule = generate_schedule(&params, &[], &rates, &[]).unwrap();

            match &schedule.outcome {
                ScheduleOutcome::NonConvergent {
                    periods,
                    residual_balance,
                    reason,
                } => {
                    assert_eq!(*reason, DivergenceReason::BalanceCeiling);
                    assert!(*periods < ScheduleConfig::default().max_periods);
                    assert_eq!(*periods, schedule.summary.installment_count);
                    assert!(*residual_balance > ceiling);
                    assert_eq!(*residual_balance, schedule.final_balance());
                }
                other => panic!("unexpected outcome {:?}", other),
            }
            let before_last = schedule.installment(schedule.summary.installment_count - 1).unwrap();
            assert!(before_last.outstanding_balance <= ceiling);
        }
    }

    #[test]
    fn test_overflowing_period_is_dropped() {
        let principal = Money::from_decimal(dec!(10000000000000000000000000));
        let params = LoanParams::new(principal, Rate::from_decimal(dec!(1000000)), 12, date(2024, 1, 1))
            .with_strategy(AdjustmentStrategy::VariableTenure);
        let schedule = generate_schedule(&params, &[], &[], &[]).unwrap();

        assert!(schedule.rows.is_empty());
        assert_eq!(schedule.summary.total_interest, Money::ZERO);
        assert_eq!(
            schedule.outcome,
            ScheduleOutcome::NonConvergent {
                periods: 0,
                residual_balance: principal,
                reason: DivergenceReason::Overflow,
            }
        );
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let config = ScheduleConfig::default();
        let params = base_params();

        let early = vec![RepaymentEvent::new(date(2024, 1, 1), Money::from_major(10))];
        assert!(matches!(
            PeriodSimulator::new(&params, &[], &[], &early, &config),
            Err(ScheduleError::InvalidParameters { .. })
        ));

        let negative = vec![RepaymentEvent::new(date(2024, 2, 1), Money::from_major(-10))];
        assert!(PeriodSimulator::new(&params, &[], &[], &negative, &config).is_err());

        let backwards = vec![HolidayInterval::new(date(2024, 2, 5), date(2024, 2, 1), "bad")];
        assert!(PeriodSimulator::new(&params, &backwards, &[], &[], &config).is_err());

        let zero = LoanParams { principal: Money::ZERO, ..params };
        assert!(generate_schedule(&zero, &[], &[], &[]).is_err());
    }

    #[test]
    fn test_unapplied_repayments_are_reported() {
        let repayments = vec![RepaymentEvent::new(date(2030, 1, 1), Money::from_major(1000))];
        let schedule = generate_schedule(&base_params(), &[], &[], &repayments).unwrap();

        assert_eq!(schedule.repayments().count(), 0);
        assert_eq!(schedule.unapplied_repayments, repayments);
    }
}
