//! Boundary between free-text form fields and the typed engine input.
//!
//! Empty or non-numeric fields coerce to zero instead of failing, matching
//! the calculator's established behaviour. Use the typed inputs directly when
//! strict validation is wanted.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analysis::{analyze_refinancing, RefinancingAnalysis};
use crate::offers::catalog::{CustomOffer, OfferCatalog};
use crate::offers::ranking::{CurrentLoan, RefinancingInput};
use crate::types::{ComputationOutput, Months};
use crate::RefinanceResult;

/// Parse a numeric field, treating empty or invalid text as zero.
pub fn coerce_number(raw: &str) -> Decimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Whole months for a term given in (possibly fractional) years.
pub fn years_to_months(years: Decimal) -> Months {
    (years * dec!(12))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

fn present(field: &str) -> bool {
    !field.trim().is_empty()
}

/// Raw text of the calculator form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanForm {
    pub remaining_debt: String,
    pub interest_rate: String,
    pub repayment_term_years: String,
    pub monthly_payment: String,
    pub desired_term_years: String,
    pub custom_bank: String,
    pub custom_interest_rate: String,
    pub custom_refinancing_cost: String,
}

impl LoanForm {
    /// A monthly payment can be derived from debt, rate and term.
    pub fn can_derive_payment(&self) -> bool {
        present(&self.remaining_debt)
            && present(&self.interest_rate)
            && self.repayment_term_months() > 0
    }

    /// Remaining debt, a monthly payment (typed or derivable) and a non-zero
    /// term are all filled in.
    pub fn is_ready(&self) -> bool {
        present(&self.remaining_debt)
            && self.repayment_term_months() > 0
            && (present(&self.monthly_payment) || self.can_derive_payment())
    }

    pub fn repayment_term_months(&self) -> Months {
        years_to_months(coerce_number(&self.repayment_term_years))
    }

    fn custom_offer(&self) -> Option<CustomOffer> {
        if !present(&self.custom_bank) || !present(&self.custom_interest_rate) {
            return None;
        }
        // a zero or unparsable cost falls back to the default custom cost
        let cost = coerce_number(&self.custom_refinancing_cost);
        Some(CustomOffer {
            bank: self.custom_bank.trim().to_string(),
            interest_rate_percent: Some(coerce_number(&self.custom_interest_rate)),
            refinancing_cost: (!cost.is_zero()).then_some(cost),
        })
    }

    /// Coerce every field into a typed request. A typed monthly payment
    /// wins; otherwise it is left for the engine to derive.
    pub fn to_input(&self, catalog: Option<OfferCatalog>) -> RefinancingInput {
        RefinancingInput {
            current_loan: CurrentLoan {
                remaining_debt: coerce_number(&self.remaining_debt),
                interest_rate_percent: coerce_number(&self.interest_rate),
                repayment_term_months: self.repayment_term_months(),
                monthly_payment: present(&self.monthly_payment)
                    .then(|| coerce_number(&self.monthly_payment)),
            },
            desired_term_months: present(&self.desired_term_years)
                .then(|| years_to_months(coerce_number(&self.desired_term_years))),
            custom_offer: self.custom_offer(),
            catalog,
        }
    }
}

/// Run the analysis for a form, or return `None` while required fields are
/// still missing.
pub fn analyze_form(
    form: &LoanForm,
    catalog: Option<OfferCatalog>,
) -> RefinanceResult<Option<ComputationOutput<RefinancingAnalysis>>> {
    if !form.is_ready() {
        return Ok(None);
    }
    analyze_refinancing(&form.to_input(catalog)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> LoanForm {
        LoanForm {
            remaining_debt: "10000".into(),
            interest_rate: "6".into(),
            repayment_term_years: "10".into(),
            desired_term_years: "10".into(),
            ..LoanForm::default()
        }
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number("1500.50"), dec!(1500.50));
        assert_eq!(coerce_number("  42 "), dec!(42));
        assert_eq!(coerce_number("1e3"), dec!(1000));
        assert_eq!(coerce_number(""), Decimal::ZERO);
        assert_eq!(coerce_number("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_years_to_months_rounds() {
        assert_eq!(years_to_months(dec!(10)), 120);
        assert_eq!(years_to_months(dec!(2.5)), 30);
        assert_eq!(years_to_months(dec!(1.04)), 12);
        assert_eq!(years_to_months(dec!(1.0417)), 13);
        assert_eq!(years_to_months(dec!(-1)), 0);
    }

    #[test]
    fn test_gating() {
        assert!(!LoanForm::default().is_ready());
        assert!(filled_form().is_ready());

        let no_term = LoanForm {
            repayment_term_years: String::new(),
            ..filled_form()
        };
        assert!(!no_term.is_ready());

        let no_rate_no_payment = LoanForm {
            interest_rate: String::new(),
            ..filled_form()
        };
        assert!(!no_rate_no_payment.is_ready());

        let typed_payment = LoanForm {
            monthly_payment: "111.02".into(),
            ..no_rate_no_payment
        };
        assert!(typed_payment.is_ready());
    }

    #[test]
    fn test_custom_offer_needs_bank_and_rate() {
        let form = LoanForm {
            custom_bank: "My Bank".into(),
            ..filled_form()
        };
        assert!(form.to_input(None).custom_offer.is_none());

        let form = LoanForm {
            custom_interest_rate: "3.9".into(),
            ..form
        };
        let custom = form.to_input(None).custom_offer.unwrap();
        assert_eq!(custom.interest_rate_percent, Some(dec!(3.9)));
        assert_eq!(custom.refinancing_cost, None);
    }

    #[test]
    fn test_invalid_debt_coerces_to_zero() {
        let form = LoanForm {
            remaining_debt: "ten thousand".into(),
            ..filled_form()
        };
        let input = form.to_input(None);
        assert_eq!(input.current_loan.remaining_debt, Decimal::ZERO);
    }

    #[test]
    fn test_analyze_form_skips_incomplete_input() {
        assert!(analyze_form(&LoanForm::default(), None).unwrap().is_none());
    }

    #[test]
    fn test_analyze_form_derives_payment() {
        let out = analyze_form(&filled_form(), None).unwrap().unwrap();
        assert_eq!(out.result.current_monthly_payment, dec!(111.02));
        assert_eq!(out.result.offers.len(), 3);
    }
}
