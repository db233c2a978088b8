use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::compute_monthly_payment;
use crate::error::RefinanceError;
use crate::types::{with_metadata, ComputationOutput, LoanTerms, Money, Months, Percent};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Total cost profile of a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanCostSummary {
    pub principal: Money,
    pub monthly_payment: Money,
    /// `monthly_payment * term_months`
    pub total_payments: Money,
    /// `total_payments - principal`
    pub total_interest: Money,
    pub additional_fees: Money,
    /// `total_payments + additional_fees`
    pub total_cost: Money,
}

impl LoanCostSummary {
    /// Summarise a loan from an already-known monthly payment.
    pub fn from_payment(
        principal: Money,
        monthly_payment: Money,
        term_months: Months,
        additional_fees: Money,
    ) -> Self {
        let total_payments = monthly_payment * Decimal::from(term_months);
        Self {
            principal,
            monthly_payment,
            total_payments,
            total_interest: total_payments - principal,
            additional_fees,
            total_cost: total_payments + additional_fees,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCostsInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// One-time fees added on top of the payments.
    #[serde(default)]
    pub additional_fees: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Payments, interest and total cost for a loan priced at `annual_rate_percent`.
pub fn compute_loan_costs(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
    additional_fees: Money,
) -> RefinanceResult<LoanCostSummary> {
    let monthly_payment = compute_monthly_payment(principal, annual_rate_percent, term_months)?;
    Ok(LoanCostSummary::from_payment(
        principal,
        monthly_payment,
        term_months,
        additional_fees,
    ))
}

pub fn calculate_loan_costs(
    input: &LoanCostsInput,
) -> RefinanceResult<ComputationOutput<LoanCostSummary>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    input.terms.validate()?;
    if input.additional_fees < Decimal::ZERO {
        return Err(RefinanceError::invalid(
            "additional_fees",
            "Fees cannot be negative.",
        ));
    }

    let output = compute_loan_costs(
        input.terms.principal,
        input.terms.annual_interest_rate_percent,
        input.terms.term_months,
        input.additional_fees,
    )?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Total loan cost (payments + one-time fees)",
        input,
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_costs_without_fees() {
        let costs = compute_loan_costs(dec!(10_000), dec!(5.5), 120, Decimal::ZERO).unwrap();
        assert_eq!(costs.monthly_payment, dec!(108.53));
        assert_eq!(costs.total_payments, dec!(13023.60));
        assert_eq!(costs.total_interest, dec!(3023.60));
        assert_eq!(costs.total_cost, dec!(13023.60));
    }

    #[test]
    fn test_fees_add_to_total_cost_only() {
        let costs = compute_loan_costs(dec!(10_000), dec!(4.2), 120, dec!(500)).unwrap();
        assert_eq!(costs.total_payments, dec!(12264.00));
        assert_eq!(costs.total_interest, dec!(2264.00));
        assert_eq!(costs.total_cost, dec!(12764.00));
    }

    #[test]
    fn test_interest_identity() {
        let costs = compute_loan_costs(dec!(75_000), dec!(3.9), 240, dec!(1_250)).unwrap();
        assert_eq!(
            costs.total_interest,
            costs.total_cost - costs.additional_fees - costs.principal
        );
    }

    #[test]
    fn test_from_known_payment() {
        let costs = LoanCostSummary::from_payment(dec!(10_000), dec!(111.02), 120, Decimal::ZERO);
        assert_eq!(costs.total_payments, dec!(13322.40));
        assert_eq!(costs.total_cost, dec!(13322.40));
    }

    #[test]
    fn test_negative_fees_rejected() {
        let input = LoanCostsInput {
            terms: LoanTerms::new(dec!(10_000), dec!(4), 60),
            additional_fees: dec!(-1),
        };
        match calculate_loan_costs(&input).unwrap_err() {
            RefinanceError::InvalidInput { field, .. } => assert_eq!(field, "additional_fees"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
