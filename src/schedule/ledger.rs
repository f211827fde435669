use crate::decimal::Money;
use crate::schedule::ScheduleRow;

/// append-only row store filled during one simulation
#[derive(Debug, Default)]
pub struct RowLedger {
    rows: Vec<ScheduleRow>,
}

impl RowLedger {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn append(&mut self, row: ScheduleRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// cash actually paid: installment totals and applied repayments
    ///
    /// Saturates at `Money::MAX`.
    pub fn total_paid(&self) -> Money {
        self.rows
            .iter()
            .filter(|row| !row.is_segment())
            .try_fold(Money::ZERO, |paid, row| paid.checked_add(row.total))
            .unwrap_or(Money::MAX)
    }

    /// position to `rollback` to
    pub fn checkpoint(&self) -> usize {
        self.rows.len()
    }

    /// drop every row appended since `mark`
    pub fn rollback(&mut self, mark: usize) {
        self.rows.truncate(mark);
    }

    pub fn into_rows(self) -> Vec<ScheduleRow> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::schedule::RowKind;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn row(kind: RowKind, total: i64) -> ScheduleRow {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        ScheduleRow {
            kind,
            period: 1,
            nominal_date: date,
            effective_date: date,
            days: 0,
            principal: Money::ZERO,
            interest: Money::ZERO,
            total: Money::from_major(total),
            outstanding_balance: Money::ZERO,
            effective_rate: Rate::ZERO,
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_ledger_keeps_append_order() {
        let mut ledger = RowLedger::new();
        assert!(ledger.is_empty());

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ledger.append(row(RowKind::Segment { start: date, end: date }, 0));
        ledger.append(row(RowKind::Repayment { event_id: Uuid::new_v4() }, 500));
        ledger.append(row(RowKind::Installment, 1200));

        assert_eq!(ledger.len(), 3);
        assert!(ledger.rows()[0].is_segment());
        assert!(ledger.last().unwrap().is_installment());
        assert_eq!(ledger.total_paid(), Money::from_major(1700));

        let rows = ledger.into_rows();
        assert_eq!(rows[1].type_label(), "REPAYMENT");
    }

    #[test]
    fn test_rollback_discards_rows_after_checkpoint() {
        let mut ledger = RowLedger::new();
        ledger.append(row(RowKind::Installment, 1200));

        let mark = ledger.checkpoint();
        ledger.append(row(RowKind::Repayment { event_id: Uuid::new_v4() }, 500));
        ledger.append(row(RowKind::Installment, 1200));
        ledger.rollback(mark);

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_paid(), Money::from_major(1200));
    }

    #[test]
    fn test_total_paid_saturates() {
        let mut ledger = RowLedger::new();
        let mut huge = row(RowKind::Installment, 0);
        huge.total = Money::MAX;
        ledger.append(huge.clone());
        ledger.append(huge);

        assert_eq!(ledger.total_paid(), Money::MAX);
    }
}
