use std::io;

use crate::errors::{Result, ScheduleError};
use crate::schedule::{RowKind, Schedule, ScheduleRow};

pub const SCHEDULE_HEADERS: [&str; 11] = [
    "type",
    "period",
    "date",
    "end_date",
    "days",
    "effective_rate_pct",
    "principal_or_basis",
    "interest",
    "total",
    "balance",
    "notes",
];

/// write every row in ledger order, one csv record each
pub fn write_schedule_csv<W: io::Write>(schedule: &Schedule, writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_HEADERS)?;

    for row in &schedule.rows {
        wtr.write_record(&record(row))?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn schedule_to_csv(schedule: &Schedule) -> Result<String> {
    let mut buffer = Vec::new();
    write_schedule_csv(schedule, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| ScheduleError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn record(row: &ScheduleRow) -> [String; 11] {
    // segments report their range, other rows a single date
    let (date, end_date) = match row.kind {
        RowKind::Segment { start, end } => (start.to_string(), end.to_string()),
        _ => (row.effective_date.to_string(), String::new()),
    };

    let principal_or_basis = if row.is_segment() {
        row.outstanding_balance
    } else {
        row.principal
    };

    let notes = row
        .notes
        .iter()
        .map(|note| note.to_string())
        .collect::<Vec<_>>()
        .join("; ");

    [
        row.type_label().to_string(),
        row.period.to_string(),
        date,
        end_date,
        row.days.to_string(),
        row.effective_rate.as_percentage().round_dp(4).normalize().to_string(),
        format!("{:.2}", principal_or_basis.round_dp(2)),
        format!("{:.2}", row.interest.round_dp(2)),
        format!("{:.2}", row.total.round_dp(2)),
        format!("{:.2}", row.outstanding_balance.round_dp(2)),
        notes,
    ]
}
