use std::io;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ScheduleError};
use crate::types::HolidayInterval;

pub const HOLIDAY_DATE_COLUMN: &str = "HOLIDAY_DATE";
pub const HOLIDAY_DESC_COLUMN: &str = "HOLIDAY_DESC";

const DEFAULT_LABEL: &str = "Holiday";

const TEMPLATE_HEADERS: [&str; 10] = [
    "HOLIDAY_AREA_CODE",
    "HOLIDAY_TYPE",
    "HOLIDAY_DESC",
    "APPLY_IND",
    "HOLIDAY_DATE",
    "COMPANY",
    "TRAN_TIMESTAMP",
    "HUB_BATCH_FLAG",
    "CNY_YEAR_END_SETTLE",
    "COUNTRY",
];

const TEMPLATE_ROWS: [[&str; 10]; 2] = [
    [
        "ABW",
        "S",
        "New Years Day",
        "B",
        "2024-01-01",
        "ALL",
        "2023-12-09 00:00:00.000000",
        "N",
        "N",
        "CN",
    ],
    [
        "ABW",
        "S",
        "Spring Festival",
        "B",
        "2024-02-10",
        "ALL",
        "2023-12-09 00:00:00.000000",
        "N",
        "N",
        "CN",
    ],
];

/// spreadsheet serial day zero
fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// date cell as a spreadsheet hands it over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HolidayDateCell {
    /// ISO `YYYY-MM-DD` (slashes accepted), or a serial written as text
    Text(String),
    Date(NaiveDate),
    /// days since 1899-12-30, fractional part is time of day
    Serial(f64),
}

impl HolidayDateCell {
    /// `None` for blank text, error for anything unparseable
    pub fn to_date(&self) -> std::result::Result<Option<NaiveDate>, String> {
        match self {
            HolidayDateCell::Date(date) => Ok(Some(*date)),
            HolidayDateCell::Serial(serial) => from_serial(*serial).map(Some),
            HolidayDateCell::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    return Ok(Some(date));
                }
                if let Ok(date) = NaiveDate::parse_from_str(text, "%Y/%m/%d") {
                    return Ok(Some(date));
                }
                match text.parse::<f64>() {
                    Ok(serial) => from_serial(serial).map(Some),
                    Err(_) => Err(format!("unrecognised date '{}'", text)),
                }
            }
        }
    }
}

fn from_serial(serial: f64) -> std::result::Result<NaiveDate, String> {
    if !serial.is_finite() || serial < 1.0 {
        return Err(format!("serial {} is not a date", serial));
    }
    serial_epoch()
        .checked_add_signed(Duration::days(serial.floor() as i64))
        .ok_or_else(|| format!("serial {} is out of range", serial))
}

/// single-day holidays from `(date, description)` cells
///
/// Rows without a date are skipped. `row` in errors is 1-based.
pub fn holidays_from_cells<I>(rows: I) -> Result<Vec<HolidayInterval>>
where
    I: IntoIterator<Item = (Option<HolidayDateCell>, Option<String>)>,
{
    let mut holidays = Vec::new();

    for (index, (cell, description)) in rows.into_iter().enumerate() {
        let Some(cell) = cell else { continue };
        let date = cell
            .to_date()
            .map_err(|message| ScheduleError::Import { row: index + 1, message })?;
        let Some(date) = date else { continue };

        holidays.push(HolidayInterval::single(date, label(description)));
    }

    Ok(holidays)
}

/// holidays from a csv sheet with `HOLIDAY_DATE` and optional `HOLIDAY_DESC`
///
/// `row` in errors is the line number in the file, header included.
pub fn read_holidays_csv<R: io::Read>(reader: R) -> Result<Vec<HolidayInterval>> {
    let mut rdr = ::csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let date_column = headers
        .iter()
        .position(|h| h.trim() == HOLIDAY_DATE_COLUMN)
        .ok_or_else(|| ScheduleError::Import {
            row: 1,
            message: format!("missing {} column", HOLIDAY_DATE_COLUMN),
        })?;
    let desc_column = headers.iter().position(|h| h.trim() == HOLIDAY_DESC_COLUMN);

    let mut holidays = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 2;

        let cell = HolidayDateCell::Text(record.get(date_column).unwrap_or_default().to_string());
        let date = cell.to_date().map_err(|message| ScheduleError::Import { row, message })?;
        let Some(date) = date else { continue };

        let description = desc_column.and_then(|i| record.get(i)).map(str::to_string);
        holidays.push(HolidayInterval::single(date, label(description)));
    }

    Ok(holidays)
}

/// blank import sheet with two sample rows
pub fn write_holiday_template<W: io::Write>(writer: W) -> Result<()> {
    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(TEMPLATE_HEADERS)?;
    for row in TEMPLATE_ROWS {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn label(description: Option<String>) -> String {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| DEFAULT_LABEL.to_string())
}
