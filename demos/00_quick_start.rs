/// quick start - minimal example to get started
use chrono::NaiveDate;
use loan_schedule_rs::{generate_schedule, LoanParams, Money, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // $100,000 over 12 months at 5%
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad date")?;
    let params = LoanParams::new(Money::from_major(100_000), Rate::from_percentage(5), 12, start);

    let schedule = generate_schedule(&params, &[], &[], &[])?;

    for row in schedule.installments() {
        println!(
            "{:>3} {} {:>10.2} {:>10.2} {:>12.2}",
            row.period,
            row.effective_date,
            row.principal.round_dp(2),
            row.interest.round_dp(2),
            row.outstanding_balance.round_dp(2)
        );
    }

    println!("total interest: {:.2}", schedule.summary.total_interest.round_dp(2));

    Ok(())
}
