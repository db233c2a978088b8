use refinance_core::amortization::generate_schedule;
use refinance_core::annuity::{compute_monthly_payment, monthly_rate};
use refinance_core::break_even::compute_break_even;
use refinance_core::costs::compute_loan_costs;
use refinance_core::Money;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Annuity identity
// ===========================================================================

#[test]
fn test_interest_plus_principal_equals_payment_every_month() {
    let schedule = generate_schedule(dec!(25_000), dec!(4.9), 84).unwrap();
    for entry in &schedule {
        assert_eq!(entry.principal_portion + entry.interest_portion, entry.payment);
    }
}

#[test]
fn test_principal_repaid_within_rounding() {
    for (principal, rate, term) in [
        (dec!(10_000), dec!(5.5), 120),
        (dec!(10_000), dec!(6), 120),
        (dec!(200_000), dec!(3.5), 360),
        (dec!(100_000), dec!(12), 12),
    ] {
        let schedule = generate_schedule(principal, rate, term).unwrap();
        let r = monthly_rate(rate);
        let mut balance = principal;
        let mut repaid = Decimal::ZERO;
        for entry in &schedule {
            repaid += entry.payment - balance * r;
            balance = entry.remaining_balance;
        }
        // rounding the payment to cents drifts by well under a unit per term
        assert!(
            (repaid - principal).abs() < dec!(1),
            "{principal} @ {rate}% x {term}: repaid {repaid}"
        );
    }
}

#[test]
fn test_schedule_always_has_term_rows() {
    for term in [1_u32, 2, 12, 13, 60, 360] {
        assert_eq!(generate_schedule(dec!(5_000), dec!(3), term).unwrap().len(), term as usize);
    }
}

#[test]
fn test_last_balance_settles_to_zero() {
    for (principal, rate, term) in [
        (dec!(10_000), dec!(5.5), 120),
        (dec!(10_000), dec!(4.2), 120),
        (dec!(200_000), dec!(3.5), 360),
        (dec!(12_000), Decimal::ZERO, 12),
    ] {
        let schedule = generate_schedule(principal, rate, term).unwrap();
        assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }
}

// ===========================================================================
// Straight-line and cost identities
// ===========================================================================

#[test]
fn test_zero_rate_payment_is_principal_over_term() {
    for (p, n) in [(dec!(1_000), 3_u32), (dec!(10_000), 7), (dec!(99_999.99), 240)] {
        assert_eq!(
            compute_monthly_payment(p, Decimal::ZERO, n).unwrap(),
            p / Decimal::from(n)
        );
    }
}

#[test]
fn test_total_interest_identity() {
    for (p, r, n, fees) in [
        (dec!(10_000), dec!(5.5), 120_u32, Decimal::ZERO),
        (dec!(10_000), dec!(4.7), 120, dec!(550)),
        (dec!(350_000), dec!(2.9), 300, dec!(3_000)),
    ] {
        let c = compute_loan_costs(p, r, n, fees).unwrap();
        assert_eq!(c.total_interest, c.total_cost - c.additional_fees - p);
        assert_eq!(c.total_payments, c.monthly_payment * Decimal::from(n));
    }
}

// ===========================================================================
// Break-even
// ===========================================================================

#[test]
fn test_break_even_examples() {
    assert_eq!(compute_break_even(dec!(100), dec!(100), dec!(500)), None);
    assert_eq!(compute_break_even(dec!(150), dec!(100), dec!(500)), Some(10));
    assert_eq!(compute_break_even(dec!(150), dec!(100), dec!(501)), Some(11));
}

#[test]
fn test_lower_rate_means_lower_payment() {
    let rates = [dec!(3), dec!(4.2), dec!(4.5), dec!(4.7), dec!(6)];
    let payments: Vec<Money> = rates
        .iter()
        .map(|r| compute_monthly_payment(dec!(10_000), *r, 120).unwrap())
        .collect();
    for pair in payments.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}
