/// floating rate - compare both adjustment strategies under a mid-life rate rise
use chrono::NaiveDate;
use loan_schedule_rs::{AdjustmentStrategy, Money, Rate, RateInterval, ScheduleRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("loan_schedule_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let hike = NaiveDate::from_ymd_opt(2024, 4, 15).ok_or("bad date")?;

    for strategy in [AdjustmentStrategy::VariableInstallment, AdjustmentStrategy::VariableTenure] {
        let schedule = ScheduleRequest::builder()
            .principal(Money::from_major(100_000))
            .rate(Rate::from_percentage(5))
            .tenure_months(12)
            .start_date(start)
            .strategy(strategy)
            .rate_interval(RateInterval::starting(hike, Rate::from_percentage(7)))
            .generate()?;

        println!(
            "{:?}: {} installments, interest {:.2}, payoff {}",
            strategy,
            schedule.summary.installment_count,
            schedule.summary.total_interest.round_dp(2),
            schedule.summary.payoff_date
        );

        // period 4 straddles the change, two segments feed one installment
        for row in schedule.rows_for_period(4) {
            println!(
                "  {:<11} {} {:>4}d {:>8} {:>10.2}",
                row.type_label(),
                row.effective_date,
                row.days,
                row.effective_rate.to_string(),
                row.interest.round_dp(2)
            );
        }
    }

    Ok(())
}
