/// holidays and repayments - import a holiday sheet, add a lump sum, export csv and json
use chrono::NaiveDate;
use loan_schedule_rs::export::{read_holidays_csv, schedule_to_csv};
use loan_schedule_rs::{HolidayShift, Money, Rate, ScheduleRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HOLIDAY_SHEET: &str = "\
HOLIDAY_AREA_CODE,HOLIDAY_DESC,HOLIDAY_DATE
ABW,Spring Festival,2024-02-12
ABW,Spring Festival,2024-02-13
ABW,Labour Day,2024-05-01
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("loan_schedule_rs=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let holidays = read_holidays_csv(HOLIDAY_SHEET.as_bytes())?;

    let schedule = ScheduleRequest::builder()
        .principal(Money::from_major(50_000))
        .rate(Rate::from_percentage(6))
        .tenure_months(12)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 12).ok_or("bad date")?)
        .holiday_shift(HolidayShift::Following)
        .holidays(holidays)
        .repayment(NaiveDate::from_ymd_opt(2024, 3, 20).ok_or("bad date")?, Money::from_major(10_000))
        .generate()?
        .require_paid_off()?;

    print!("{}", schedule_to_csv(&schedule)?);
    println!();
    println!("{}", schedule.view().to_json_pretty()?);

    Ok(())
}
