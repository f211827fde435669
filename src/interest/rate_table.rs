use chrono::NaiveDate;

use crate::decimal::Rate;
use crate::errors::{Result, ScheduleError};
use crate::types::RateInterval;

#[derive(Debug, Clone, PartialEq)]
struct RateEntry {
    start: NaiveDate,
    /// `None` is unbounded
    effective_end: Option<NaiveDate>,
    rate: Rate,
}

impl RateEntry {
    fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start && self.effective_end.map_or(true, |end| date <= end)
    }
}

/// floating rate intervals resolved to effective ranges, sorted by start
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    initial: Rate,
    entries: Vec<RateEntry>,
}

impl RateTable {
    /// sort intervals and derive each open-ended interval's effective end
    pub fn new(initial: Rate, intervals: &[RateInterval]) -> Result<Self> {
        for interval in intervals {
            if let Some(end) = interval.end {
                if end < interval.start {
                    return Err(ScheduleError::InvalidRateInterval {
                        start: interval.start,
                        end,
                    });
                }
            }
            if interval.rate < Rate::ZERO {
                return Err(ScheduleError::invalid(format!(
                    "rate interval starting {} has negative rate {}",
                    interval.start, interval.rate
                )));
            }
        }

        let mut sorted: Vec<&RateInterval> = intervals.iter().collect();
        sorted.sort_by_key(|interval| interval.start);

        let entries = sorted
            .iter()
            .enumerate()
            .map(|(i, interval)| {
                let effective_end = interval.end.or_else(|| {
                    sorted
                        .get(i + 1)
                        .and_then(|next| next.start.pred_opt())
                });
                RateEntry {
                    start: interval.start,
                    effective_end,
                    rate: interval.rate,
                }
            })
            .collect();

        Ok(Self { initial, entries })
    }

    /// rate applying on `date`; latest-starting match wins, initial rate if none
    pub fn rate_on(&self, date: NaiveDate) -> Rate {
        self.entries
            .iter()
            .filter(|entry| entry.covers(date))
            .max_by_key(|entry| entry.start)
            .map(|entry| entry.rate)
            .unwrap_or(self.initial)
    }

    pub fn initial_rate(&self) -> Rate {
        self.initial
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// one-off lookup, prefer building a `RateTable` when resolving many dates
pub fn rate_on_date(date: NaiveDate, initial: Rate, intervals: &[RateInterval]) -> Result<Rate> {
    Ok(RateTable::new(initial, intervals)?.rate_on(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_uncovered_dates_use_initial_rate() {
        let table = RateTable::new(Rate::from_percentage(5), &[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.rate_on(date(2030, 1, 1)), Rate::from_percentage(5));
    }

    #[test]
    fn test_open_ended_interval_runs_until_next_start() {
        // supplied out of order on purpose
        let intervals = vec![
            RateInterval::starting(date(2024, 7, 1), Rate::from_percentage(8)),
            RateInterval::starting(date(2024, 4, 1), Rate::from_percentage(7)),
        ];
        let table = RateTable::new(Rate::from_percentage(5), &intervals).unwrap();

        assert_eq!(table.rate_on(date(2024, 3, 31)), Rate::from_percentage(5));
        assert_eq!(table.rate_on(date(2024, 4, 1)), Rate::from_percentage(7));
        assert_eq!(table.rate_on(date(2024, 6, 30)), Rate::from_percentage(7));
        assert_eq!(table.rate_on(date(2024, 7, 1)), Rate::from_percentage(8));
        assert_eq!(table.rate_on(date(2040, 1, 1)), Rate::from_percentage(8));
    }

    #[test]
    fn test_bounded_interval_falls_back_to_initial() {
        let intervals = vec![RateInterval::new(
            date(2024, 4, 1),
            Some(date(2024, 4, 30)),
            Rate::from_percentage(9),
        )];
        let table = RateTable::new(Rate::from_percentage(5), &intervals).unwrap();

        assert_eq!(table.rate_on(date(2024, 4, 30)), Rate::from_percentage(9));
        assert_eq!(table.rate_on(date(2024, 5, 1)), Rate::from_percentage(5));
    }

    #[test]
    fn test_overlap_prefers_latest_start() {
        let intervals = vec![
            RateInterval::new(date(2024, 1, 1), Some(date(2024, 12, 31)), Rate::from_percentage(6)),
            RateInterval::new(date(2024, 6, 1), Some(date(2024, 6, 30)), Rate::from_percentage(4)),
        ];
        assert_eq!(
            rate_on_date(date(2024, 6, 15), Rate::from_percentage(5), &intervals).unwrap(),
            Rate::from_percentage(4)
        );
        assert_eq!(
            rate_on_date(date(2024, 7, 1), Rate::from_percentage(5), &intervals).unwrap(),
            Rate::from_percentage(6)
        );
    }

    #[test]
    fn test_malformed_interval_rejected() {
        let intervals = vec![RateInterval::new(
            date(2024, 5, 1),
            Some(date(2024, 4, 1)),
            Rate::from_percentage(6),
        )];
        assert!(matches!(
            RateTable::new(Rate::from_percentage(5), &intervals),
            Err(ScheduleError::InvalidRateInterval { .. })
        ));
    }
}
