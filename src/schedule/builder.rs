use chrono::NaiveDate;

use crate::config::ScheduleConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{Result, ScheduleError};
use crate::types::{AdjustmentStrategy, HolidayInterval, HolidayShift, LoanParams, RateInterval, RepaymentEvent};

use super::{generate_schedule_with_config, Schedule};

/// everything one schedule computation needs, owned
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    pub params: LoanParams,
    pub holidays: Vec<HolidayInterval>,
    pub rate_intervals: Vec<RateInterval>,
    pub repayments: Vec<RepaymentEvent>,
    pub config: ScheduleConfig,
}

impl ScheduleRequest {
    pub fn new(params: LoanParams) -> Self {
        Self {
            params,
            holidays: Vec::new(),
            rate_intervals: Vec::new(),
            repayments: Vec::new(),
            config: ScheduleConfig::default(),
        }
    }

    pub fn builder() -> ScheduleRequestBuilder {
        ScheduleRequestBuilder::new()
    }

    pub fn generate(&self) -> Result<Schedule> {
        generate_schedule_with_config(
            &self.params,
            &self.holidays,
            &self.rate_intervals,
            &self.repayments,
            &self.config,
        )
    }
}

#[derive(Debug, Default)]
pub struct ScheduleRequestBuilder {
    principal: Option<Money>,
    rate: Option<Rate>,
    tenure_months: Option<u32>,
    start_date: Option<NaiveDate>,
    holiday_shift: Option<HolidayShift>,
    strategy: Option<AdjustmentStrategy>,
    holidays: Vec<HolidayInterval>,
    rate_intervals: Vec<RateInterval>,
    repayments: Vec<RepaymentEvent>,
    config: Option<ScheduleConfig>,
}

impl ScheduleRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn principal(mut self, principal: Money) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn rate(mut self, rate: Rate) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn tenure_months(mut self, months: u32) -> Self {
        self.tenure_months = Some(months);
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn holiday_shift(mut self, shift: HolidayShift) -> Self {
        self.holiday_shift = Some(shift);
        self
    }

    pub fn strategy(mut self, strategy: AdjustmentStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn holiday(mut self, holiday: HolidayInterval) -> Self {
        self.holidays.push(holiday);
        self
    }

    pub fn holidays(mut self, holidays: impl IntoIterator<Item = HolidayInterval>) -> Self {
        self.holidays.extend(holidays);
        self
    }

    pub fn rate_interval(mut self, interval: RateInterval) -> Self {
        self.rate_intervals.push(interval);
        self
    }

    pub fn repayment(mut self, date: NaiveDate, amount: Money) -> Self {
        self.repayments.push(RepaymentEvent::new(date, amount));
        self
    }

    pub fn config(mut self, config: ScheduleConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// assemble and validate the loan parameters
    pub fn build(self) -> Result<ScheduleRequest> {
        let principal = self.principal.ok_or(ScheduleError::InvalidParameters {
            message: "principal required".to_string(),
        })?;

        let rate = self.rate.ok_or(ScheduleError::InvalidParameters {
            message: "rate required".to_string(),
        })?;

        let tenure = self.tenure_months.ok_or(ScheduleError::InvalidParameters {
            message: "tenure required".to_string(),
        })?;

        let start_date = self.start_date.ok_or(ScheduleError::InvalidParameters {
            message: "start date required".to_string(),
        })?;

        let params = LoanParams::new(principal, rate, tenure, start_date)
            .with_holiday_shift(self.holiday_shift.unwrap_or(HolidayShift::Following))
            .with_strategy(self.strategy.unwrap_or(AdjustmentStrategy::VariableInstallment));
        params.validate()?;

        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ScheduleRequest {
            params,
            holidays: self.holidays,
            rate_intervals: self.rate_intervals,
            repayments: self.repayments,
            config,
        })
    }

    pub fn generate(self) -> Result<Schedule> {
        self.build()?.generate()
    }
}
