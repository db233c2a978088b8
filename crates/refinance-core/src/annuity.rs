use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RefinanceError;
use crate::types::{round_cents, with_metadata, ComputationOutput, LoanTerms, Money, Months, Percent, Rate};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub monthly_payment: Money,
    pub monthly_rate: Rate,
    pub term_months: Months,
    pub total_of_payments: Money,
    /// True when the rate is zero and the principal is simply split evenly.
    pub straight_line: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Convert an annual percentage into a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Fails once the factor leaves the range `Decimal` can represent.
pub(crate) fn compound(rate: Rate, n: Months) -> RefinanceResult<Decimal> {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result = result.checked_mul(factor).ok_or_else(|| overflow(rate, n))?;
    }
    Ok(result)
}

fn overflow(rate: Rate, n: Months) -> RefinanceError {
    RefinanceError::invalid(
        "term_months",
        format!("Compound factor overflows for monthly rate {rate} over {n} months."),
    )
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Fixed monthly payment that fully amortizes `principal` over `term_months`.
///
/// A zero rate falls back to straight-line division, which is returned exactly
/// as `principal / term_months`. Otherwise the annuity formula
/// `P * r * (1+r)^n / ((1+r)^n - 1)` is applied and rounded to cents.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
) -> RefinanceResult<Money> {
    if term_months == 0 {
        return Err(RefinanceError::invalid(
            "term_months",
            "Term must be at least one month.",
        ));
    }

    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return Ok(principal / Decimal::from(term_months));
    }

    let factor = compound(r, term_months)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(RefinanceError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    let payment = r
        .checked_mul(factor)
        .and_then(|rf| rf.checked_mul(principal))
        .and_then(|numerator| numerator.checked_div(denominator))
        .ok_or_else(|| overflow(r, term_months))?;
    Ok(round_cents(payment))
}

/// Monthly payment for a set of loan terms, wrapped in the output envelope.
pub fn calculate_payment(terms: &LoanTerms) -> RefinanceResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    terms.validate()?;

    if terms.principal.is_zero() {
        warnings.push("Principal is zero, so the monthly payment is zero".into());
    }

    let monthly_payment = compute_monthly_payment(
        terms.principal,
        terms.annual_interest_rate_percent,
        terms.term_months,
    )?;
    let rate = monthly_rate(terms.annual_interest_rate_percent);

    let output = PaymentOutput {
        monthly_payment,
        monthly_rate: rate,
        term_months: terms.term_months,
        total_of_payments: monthly_payment * Decimal::from(terms.term_months),
        straight_line: rate.is_zero(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate annuity payment (monthly compounding)",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ten_year_loan_at_five_and_a_half_percent() {
        let pmt = compute_monthly_payment(dec!(10_000), dec!(5.5), 120).unwrap();
        assert_eq!(pmt, dec!(108.53));
    }

    #[test]
    fn test_known_payments() {
        assert_eq!(compute_monthly_payment(dec!(10_000), dec!(6), 120).unwrap(), dec!(111.02));
        assert_eq!(compute_monthly_payment(dec!(100_000), dec!(12), 12).unwrap(), dec!(8884.88));
        assert_eq!(compute_monthly_payment(dec!(200_000), dec!(3.5), 360).unwrap(), dec!(898.09));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = compute_monthly_payment(dec!(12_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(1000));

        let uneven = compute_monthly_payment(dec!(10_000), Decimal::ZERO, 7).unwrap();
        assert_eq!(uneven, dec!(10_000) / dec!(7));
    }

    #[test]
    fn test_zero_term_is_rejected() {
        let err = compute_monthly_payment(dec!(10_000), dec!(5), 0).unwrap_err();
        match err {
            RefinanceError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_compound_overflow_is_an_error() {
        // 100% a year over 1000 months: (1 + 1/12)^1000 is far past Decimal::MAX
        let err = compute_monthly_payment(dec!(10_000), dec!(100), 1000).unwrap_err();
        match err {
            RefinanceError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_payment_overflow_is_an_error() {
        // the factor fits but principal * r * factor does not
        let result = compute_monthly_payment(dec!(1_000_000_000_000_000_000_000_000), dec!(24), 1000);
        assert!(result.is_err());
    }

    #[test]
    fn test_compound_matches_repeated_multiplication() {
        assert_eq!(compound(dec!(0.01), 2).unwrap(), dec!(1.0201));
        assert_eq!(compound(dec!(0.05), 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_zero_principal_gives_zero_payment() {
        let pmt = compute_monthly_payment(Decimal::ZERO, dec!(4.2), 120).unwrap();
        assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn test_single_month_term() {
        // one payment = principal plus one month of interest
        let pmt = compute_monthly_payment(dec!(1_200), dec!(12), 1).unwrap();
        assert_eq!(pmt, dec!(1212));
    }

    #[test]
    fn test_calculate_payment_envelope() {
        let terms = LoanTerms::new(dec!(10_000), dec!(5.5), 120);
        let out = calculate_payment(&terms).unwrap();
        assert_eq!(out.result.monthly_payment, dec!(108.53));
        assert_eq!(out.result.total_of_payments, dec!(13023.60));
        assert!(!out.result.straight_line);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_calculate_payment_warns_on_zero_principal() {
        let terms = LoanTerms::new(Decimal::ZERO, dec!(5.5), 120);
        let out = calculate_payment(&terms).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }
}
