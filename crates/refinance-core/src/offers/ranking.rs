use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{generate_schedule, AmortizationEntry};
use crate::annuity::compute_monthly_payment;
use crate::break_even::break_even_point;
use crate::costs::{compute_loan_costs, LoanCostSummary};
use crate::error::RefinanceError;
use crate::offers::catalog::{CustomOffer, OfferCatalog, RefinancingOffer};
use crate::types::{with_metadata, ComputationOutput, Money, Months, Percent};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// The loan being refinanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLoan {
    /// Outstanding principal to be refinanced.
    pub remaining_debt: Money,
    #[serde(default)]
    pub interest_rate_percent: Percent,
    pub repayment_term_months: Months,
    /// Known current payment. Derived from rate and term when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
}

impl CurrentLoan {
    /// The stated monthly payment, or the annuity payment implied by the
    /// loan's own rate and term.
    pub fn resolved_monthly_payment(&self) -> RefinanceResult<Money> {
        match self.monthly_payment {
            Some(payment) => Ok(payment),
            None => compute_monthly_payment(
                self.remaining_debt,
                self.interest_rate_percent,
                self.repayment_term_months,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinancingInput {
    pub current_loan: CurrentLoan,
    /// New term; falls back to the current term when absent or zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_term_months: Option<Months>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_offer: Option<CustomOffer>,
    /// Candidate offers; the built-in catalog when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<OfferCatalog>,
}

impl RefinancingInput {
    pub fn new_term_months(&self) -> Months {
        self.desired_term_months
            .filter(|m| *m > 0)
            .unwrap_or(self.current_loan.repayment_term_months)
    }
}

/// A candidate offer with its full cost comparison against the current loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedOffer {
    #[serde(flatten)]
    pub offer: RefinancingOffer,
    pub new_monthly_payment: Money,
    pub current_loan_costs: LoanCostSummary,
    pub new_loan_costs: LoanCostSummary,
    /// Current total cost minus new total cost; negative means refinancing
    /// costs more overall.
    pub total_savings: Money,
    pub monthly_net_savings: Money,
    pub break_even_months: Option<Months>,
    pub break_even_years: Option<Decimal>,
    pub savings_percentage: Decimal,
    pub amortization_schedule: Vec<AmortizationEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersOutput {
    pub current_monthly_payment: Money,
    pub new_term_months: Months,
    /// Best first.
    pub offers: Vec<RankedOffer>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

fn evaluate_offer(
    offer: RefinancingOffer,
    current_loan_costs: &LoanCostSummary,
    principal: Money,
    new_term_months: Months,
) -> RefinanceResult<RankedOffer> {
    let current_monthly_payment = current_loan_costs.monthly_payment;
    let new_monthly_payment =
        compute_monthly_payment(principal, offer.interest_rate_percent, new_term_months)?;
    let new_loan_costs = compute_loan_costs(
        principal,
        offer.interest_rate_percent,
        new_term_months,
        offer.refinancing_cost,
    )?;

    let total_savings = current_loan_costs.total_cost - new_loan_costs.total_cost;
    let monthly_net_savings = current_monthly_payment - new_monthly_payment;
    let break_even = break_even_point(
        current_monthly_payment,
        new_monthly_payment,
        offer.refinancing_cost,
    );

    let savings_percentage = if current_loan_costs.total_cost.is_zero() {
        warn!(
            "current loan total cost is zero; savings percentage for {} reported as 0",
            offer.bank
        );
        Decimal::ZERO
    } else {
        total_savings / current_loan_costs.total_cost * dec!(100)
    };

    debug!(
        "{}: payment {} -> {} (monthly saving {}), total cost {} -> {}, savings {} ({}%)",
        offer.bank,
        current_monthly_payment,
        new_monthly_payment,
        monthly_net_savings,
        current_loan_costs.total_cost,
        new_loan_costs.total_cost,
        total_savings,
        savings_percentage.round_dp(2),
    );

    let amortization_schedule =
        generate_schedule(principal, offer.interest_rate_percent, new_term_months)?;

    Ok(RankedOffer {
        offer,
        new_monthly_payment,
        current_loan_costs: current_loan_costs.clone(),
        new_loan_costs,
        total_savings,
        monthly_net_savings,
        break_even_months: break_even.as_ref().map(|b| b.months),
        break_even_years: break_even.map(|b| b.years),
        savings_percentage,
        amortization_schedule,
    })
}

/// Price every candidate against the current loan and sort best first.
///
/// The current loan's cost is its stated monthly payment times its current
/// term; each candidate is priced over `desired_term_months` (or the current
/// term) with its refinancing cost as a one-time fee. A missing current
/// payment counts as zero. Candidates are sorted by total savings, largest
/// first; the sort is stable so ties keep candidate order.
pub fn generate_offers(
    current_loan: &CurrentLoan,
    desired_term_months: Option<Months>,
    custom_offer: Option<&CustomOffer>,
    catalog: &OfferCatalog,
) -> RefinanceResult<Vec<RankedOffer>> {
    let principal = current_loan.remaining_debt;
    let current_term = current_loan.repayment_term_months;
    let current_monthly_payment = current_loan.monthly_payment.unwrap_or(Decimal::ZERO);
    let new_term_months = desired_term_months
        .filter(|m| *m > 0)
        .unwrap_or(current_term);

    debug!(
        "generating offers: remaining debt {}, current term {}, current rate {}%, current payment {}, new term {}",
        principal,
        current_term,
        current_loan.interest_rate_percent,
        current_monthly_payment,
        new_term_months,
    );

    let current_loan_costs =
        LoanCostSummary::from_payment(principal, current_monthly_payment, current_term, Decimal::ZERO);

    let mut ranked = catalog
        .candidates(custom_offer)
        .into_iter()
        .map(|offer| evaluate_offer(offer, &current_loan_costs, principal, new_term_months))
        .collect::<RefinanceResult<Vec<_>>>()?;

    ranked.sort_by(|a, b| b.total_savings.cmp(&a.total_savings));
    Ok(ranked)
}

/// Rank all candidate offers for a refinancing request.
pub fn rank_offers(
    input: &RefinancingInput,
) -> RefinanceResult<ComputationOutput<OffersOutput>> {
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

    if new_term_months != current_loan.repayment_term_months {
        warnings.push(format!(
            "Offers are priced over {new_term_months} months against a current term of {} months",
            current_loan.repayment_term_months
        ));
    }
    if offers.iter().all(|o| o.total_savings <= Decimal::ZERO) {
        warnings.push("No offer reduces the total cost of the loan".into());
    }

    let output = OffersOutput {
        current_monthly_payment,
        new_term_months,
        offers,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "current_cost_basis": "current monthly payment x current term",
        "new_cost_basis": "annuity payment x new term + refinancing cost",
        "new_term_months": new_term_months,
        "custom_offer_included": input.custom_offer.as_ref().is_some_and(CustomOffer::is_complete),
    });

    Ok(with_metadata(
        "Refinancing offer ranking by total savings",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

pub(crate) fn validate_input(input: &RefinancingInput) -> RefinanceResult<()> {
    let loan = &input.current_loan;
    if loan.remaining_debt < Decimal::ZERO {
        return Err(RefinanceError::invalid(
            "remaining_debt",
            "Remaining debt cannot be negative.",
        ));
    }
    if loan.interest_rate_percent < Decimal::ZERO {
        return Err(RefinanceError::invalid(
            "interest_rate_percent",
            "Interest rate cannot be negative.",
        ));
    }
    if let Some(payment) = loan.monthly_payment {
        if payment < Decimal::ZERO {
            return Err(RefinanceError::invalid(
                "monthly_payment",
                "Monthly payment cannot be negative.",
            ));
        }
    }
    if input.new_term_months() == 0 {
        return Err(RefinanceError::invalid(
            "desired_term_months",
            "A new term or a current repayment term of at least one month is required.",
        ));
    }
    if let Some(custom) = &input.custom_offer {
        if custom.interest_rate_percent.is_some_and(|r| r < Decimal::ZERO) {
            return Err(RefinanceError::invalid(
                "custom_offer.interest_rate_percent",
                "Interest rate cannot be negative.",
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
