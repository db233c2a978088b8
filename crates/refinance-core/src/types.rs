use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::RefinanceError;
use crate::RefinanceResult;

/// All monetary values, in a single abstract currency unit.
pub type Money = Decimal;

/// Annual interest rates as quoted to borrowers (4.2 = 4.2%).
pub type Percent = Decimal;

/// Per-period rates as decimal fractions (0.0035 = 0.35% per month).
pub type Rate = Decimal;

/// Whole months.
pub type Months = u32;

/// Round a monetary amount to cents, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The economic parameters of a fixed-rate loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_interest_rate_percent: Percent,
    pub term_months: Months,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_interest_rate_percent: Percent, term_months: Months) -> Self {
        Self {
            principal,
            annual_interest_rate_percent,
            term_months,
        }
    }

    pub fn validate(&self) -> RefinanceResult<()> {
        if self.principal < Decimal::ZERO {
            return Err(RefinanceError::invalid(
                "principal",
                "Principal cannot be negative.",
            ));
        }
        if self.annual_interest_rate_percent < Decimal::ZERO {
            return Err(RefinanceError::invalid(
                "annual_interest_rate_percent",
                "Interest rate cannot be negative.",
            ));
        }
        if self.term_months == 0 {
            return Err(RefinanceError::invalid(
                "term_months",
                "Term must be at least one month.",
            ));
        }
        Ok(())
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_midpoint_goes_up() {
        assert_eq!(round_cents(dec!(108.525)), dec!(108.53));
        assert_eq!(round_cents(dec!(108.524999)), dec!(108.52));
        assert_eq!(round_cents(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn test_zero_term_rejected() {
        let terms = LoanTerms::new(dec!(10_000), dec!(5), 0);
        match terms.validate().unwrap_err() {
            RefinanceError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_rate_is_valid() {
        let terms = LoanTerms::new(dec!(10_000), Decimal::ZERO, 12);
        assert!(terms.validate().is_ok());
    }
}
