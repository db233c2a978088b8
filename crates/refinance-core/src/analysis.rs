use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RefinanceError;
use crate::offers::catalog::{CustomOffer, OfferCatalog};
use crate::offers::ranking::{generate_offers, validate_input, CurrentLoan, RankedOffer, RefinancingInput};
use crate::savings::{cumulative_savings, YearlySavingsPoint};
use crate::types::{with_metadata, ComputationOutput, Money, Months};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the best offer should be presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Refinancing lowers the total cost.
    Refinance {
        bank: String,
        total_savings: Money,
        new_term_months: Months,
    },
    /// Even the best offer costs more overall; report the extra cost and the
    /// change in monthly payment.
    CostIncrease {
        bank: String,
        extra_cost: Money,
        monthly_reduction: Money,
        new_term_months: Months,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinancingAnalysis {
    pub current_monthly_payment: Money,
    pub new_term_months: Months,
    /// Best first.
    pub offers: Vec<RankedOffer>,
    pub recommendation: Option<Recommendation>,
    /// Cumulative savings of the best offer over the current term.
    pub cumulative_savings: Vec<YearlySavingsPoint>,
}

impl RefinancingAnalysis {
    pub fn best(&self) -> Option<&RankedOffer> {
        self.offers.first()
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Recompute the whole comparison from the current inputs.
///
/// Callers invoke this whenever any loan parameter changes. Nothing is cached
/// between calls, so identical inputs give identical results.
pub fn analyze_refinancing(
    input: &RefinancingInput,
) -> RefinanceResult<ComputationOutput<RefinancingAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let default_catalog;
    let catalog = match &input.catalog {
        Some(c) => c,
        None => {
            default_catalog = OfferCatalog::default();
            &default_catalog
        }
    };
    catalog.validate()?;

    let current_monthly_payment = input.current_loan.resolved_monthly_payment()?;
    if input.current_loan.remaining_debt.is_zero() || current_monthly_payment.is_zero() {
        return Err(RefinanceError::InsufficientData(
            "Remaining debt and a non-zero monthly payment are required to compare offers.".into(),
        ));
    }

    let current_loan = CurrentLoan {
        monthly_payment: Some(current_monthly_payment),
        ..input.current_loan.clone()
    };
    let new_term_months = input.new_term_months();

    let offers = generate_offers(
        &current_loan,
        input.desired_term_months,
        input.custom_offer.as_ref(),
        catalog,
    )?;

    let recommendation = offers.first().map(|best| recommend(best, new_term_months));
    let savings_series = offers
        .first()
        .map(|best| {
            cumulative_savings(
                current_monthly_payment,
                best.new_monthly_payment,
                current_loan.repayment_term_months,
            )
        })
        .unwrap_or_default();

    if let Some(Recommendation::CostIncrease { bank, .. }) = &recommendation {
        warnings.push(format!(
            "No offer reduces the total cost; {bank} is the least expensive alternative"
        ));
    }
    if new_term_months != current_loan.repayment_term_months {
        warnings.push(format!(
            "Offers are priced over {new_term_months} months against a current term of {} months",
            current_loan.repayment_term_months
        ));
    }

    debug!(
        "analysis: {} offers, best {:?}",
        offers.len(),
        offers.first().map(|o| (&o.offer.bank, o.total_savings))
    );

    let output = RefinancingAnalysis {
        current_monthly_payment,
        new_term_months,
        offers,
        recommendation,
        cumulative_savings: savings_series,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "remaining_debt": current_loan.remaining_debt.to_string(),
        "current_term_months": current_loan.repayment_term_months,
        "current_monthly_payment": current_monthly_payment.to_string(),
        "current_payment_derived": input.current_loan.monthly_payment.is_none(),
        "new_term_months": new_term_months,
        "catalog_size": catalog.offers.len(),
        "custom_offer_included": input.custom_offer.as_ref().is_some_and(CustomOffer::is_complete),
    });

    Ok(with_metadata(
        "Refinancing comparison (annuity pricing, ranked by total savings)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

fn recommend(best: &RankedOffer, new_term_months: Months) -> Recommendation {
    if best.total_savings > Decimal::ZERO {
        Recommendation::Refinance {
            bank: best.offer.bank.clone(),
            total_savings: best.total_savings,
            new_term_months,
        }
    } else {
        Recommendation::CostIncrease {
            bank: best.offer.bank.clone(),
            extra_cost: best.total_savings.abs(),
            monthly_reduction: best.monthly_net_savings,
            new_term_months,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> RefinancingInput {
        RefinancingInput {
            current_loan: CurrentLoan {
                remaining_debt: dec!(10_000),
                interest_rate_percent: dec!(6),
                repayment_term_months: 120,
                monthly_payment: Some(dec!(111.02)),
            },
            desired_term_months: Some(120),
            custom_offer: None,
            catalog: None,
        }
    }

    #[test]
    fn test_recommends_best_offer() {
        let out = analyze_refinancing(&input()).unwrap();
        let analysis = &out.result;
        assert_eq!(analysis.best().unwrap().offer.bank, "Erste Bank");
        assert_eq!(
            analysis.recommendation,
            Some(Recommendation::Refinance {
                bank: "Erste Bank".into(),
                total_savings: dec!(558.40),
                new_term_months: 120,
            })
        );
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_savings_series_tracks_best_offer() {
        let out = analyze_refinancing(&input()).unwrap();
        let series = &out.result.cumulative_savings;
        assert_eq!(series.len(), 10);
        // 8.82 a month for 120 months
        assert_eq!(series[9].cumulative_savings, dec!(1058.40));
    }

    #[test]
    fn test_cost_increase_when_nothing_saves() {
        let mut inp = input();
        inp.current_loan.interest_rate_percent = dec!(3);
        inp.current_loan.monthly_payment = None;
        inp.current_loan.repayment_term_months = 60;
        let out = analyze_refinancing(&inp).unwrap();
        match out.result.recommendation.unwrap() {
            Recommendation::CostIncrease {
                bank,
                extra_cost,
                monthly_reduction,
                ..
            } => {
                assert_eq!(bank, "Erste Bank");
                assert!(extra_cost > Decimal::ZERO);
                assert!(monthly_reduction > Decimal::ZERO);
            }
            other => panic!("Expected CostIncrease, got {other:?}"),
        }
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_zero_debt_is_not_analyzed() {
        let mut inp = input();
        inp.current_loan.remaining_debt = Decimal::ZERO;
        let err = analyze_refinancing(&inp).unwrap_err();
        assert!(matches!(err, RefinanceError::InsufficientData(_)));
    }

    #[test]
    fn test_zero_payment_is_not_analyzed() {
        let mut inp = input();
        inp.current_loan.monthly_payment = Some(Decimal::ZERO);
        assert!(analyze_refinancing(&inp).is_err());
    }
}
