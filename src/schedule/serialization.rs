/// serialization support for schedules
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::schedule::{Schedule, ScheduleOutcome, ScheduleRow, Summary};
use crate::types::LoanParams;

/// schedule grouped by period, the shape presentation layers consume
#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleView {
    pub params: LoanParams,
    pub summary: Summary,
    pub outcome: ScheduleOutcome,
    pub periods: Vec<PeriodView>,
}

/// one installment with the segment and repayment rows that led to it
#[derive(Debug, Serialize, Deserialize)]
pub struct PeriodView {
    pub period: u32,
    pub installment: ScheduleRow,
    pub details: Vec<ScheduleRow>,
}

impl ScheduleView {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let periods = schedule
            .installments()
            .map(|installment| PeriodView {
                period: installment.period,
                installment: installment.clone(),
                details: schedule
                    .rows_for_period(installment.period)
                    .filter(|row| !row.is_installment())
                    .cloned()
                    .collect(),
            })
            .collect();

        ScheduleView {
            params: schedule.params.clone(),
            summary: schedule.summary.clone(),
            outcome: schedule.outcome.clone(),
            periods,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Schedule {
    /// flat row ledger as pretty-printed json
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn view(&self) -> ScheduleView {
        ScheduleView::from_schedule(self)
    }
}
