use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

/// fixed periodic payment that amortizes `balance` over `remaining_periods` months
///
/// PMT = B * r / (1 - (1 + r)^-n) with r the monthly rate, written as
/// B * r * (c / (c - 1)) with c = (1 + r)^n to stay in decimal arithmetic.
/// Once c leaves the decimal range (1 + r)^-n is zero for all practical
/// purposes and the payment is the monthly interest B * r.
pub fn annuity_payment(balance: Money, annual_rate: Rate, remaining_periods: u32) -> Money {
    if remaining_periods == 0 {
        return balance.max(Money::ZERO);
    }

    if annual_rate.is_zero() {
        return (balance / Decimal::from(remaining_periods)).max(Money::ZERO);
    }

    if !balance.is_positive() {
        return Money::ZERO;
    }

    let r = annual_rate.monthly_rate().as_decimal();
    let interest_only = balance.checked_mul(r).unwrap_or(Money::MAX);

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..remaining_periods {
        match compound.checked_mul(base) {
            Some(next) => compound = next,
            None => return interest_only,
        }
    }

    let ratio = compound / (compound - Decimal::ONE);
    interest_only.checked_mul(ratio).unwrap_or(Money::MAX)
}

/// number of monthly payments of `payment` needed to retire `balance`
///
/// `None` when the payment never covers the monthly interest.
pub fn term_for_payment(balance: Money, annual_rate: Rate, payment: Money, max_periods: u32) -> Option<u32> {
    if !balance.is_positive() {
        return Some(0);
    }
    if !payment.is_positive() {
        return None;
    }

    let r = annual_rate.monthly_rate().as_decimal();
    match balance.checked_mul(r) {
        Some(interest) if interest < payment => {}
        _ => return None,
    }

    let mut remaining = balance;
    let mut months = 0;

    while remaining.is_positive() {
        if months >= max_periods {
            return None;
        }
        let interest = remaining.checked_mul(r)?;
        remaining = (remaining.checked_add(interest)? - payment).max(Money::ZERO);
        months += 1;
    }

    Some(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_payment() {
        let payment = annuity_payment(Money::from_major(100_000), Rate::from_percentage(5), 12);

        // 100k at 5% over 12 months
        assert_eq!(payment.round_dp(2), Money::from_decimal(dec!(8560.75)));
    }

    #[test]
    fn test_long_tenure_at_high_rate_tends_to_interest_only() {
        let balance = Money::from_major(100_000);
        let rate = Rate::from_percentage(150);

        // (1 + 0.125)^600 is past the decimal range
        assert_eq!(annuity_payment(balance, rate, 600), Money::from_major(12_500));

        let payment = annuity_payment(balance, rate, 300);
        assert!((payment - Money::from_major(12_500)).abs() < Money::CENT);
        assert_eq!(term_for_payment(Money::MAX, rate, payment, 600), None);
    }

    #[test]
    fn test_zero_rate_splits_evenly() {
        let payment = annuity_payment(Money::from_major(12_000), Rate::ZERO, 12);
        assert_eq!(payment, Money::from_major(1000));
    }

    #[test]
    fn test_non_positive_balance_pays_nothing() {
        assert_eq!(annuity_payment(Money::ZERO, Rate::from_percentage(5), 12), Money::ZERO);
        assert_eq!(annuity_payment(Money::from_major(-5), Rate::from_percentage(5), 12), Money::ZERO);
    }

    #[test]
    fn test_last_period_pays_whole_balance_plus_interest() {
        let payment = annuity_payment(Money::from_major(1000), Rate::from_percentage(12), 1);
        assert_eq!(payment, Money::from_major(1010));

        assert_eq!(annuity_payment(Money::from_major(1000), Rate::from_percentage(12), 0), Money::from_major(1000));
    }

    #[test]
    fn test_term_for_payment() {
        let balance = Money::from_major(100_000);
        let rate = Rate::from_percentage(5);
        let payment = annuity_payment(balance, rate, 24);

        let term = term_for_payment(balance, rate, payment, 600).unwrap();
        assert!((23..=25).contains(&term));

        // interest alone is ~416.67 a month
        assert_eq!(term_for_payment(balance, rate, Money::from_major(400), 600), None);
        assert_eq!(term_for_payment(Money::ZERO, rate, payment, 600), Some(0));
    }
}
