use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use refinance_core::analysis;
use refinance_core::form::years_to_months;
use refinance_core::offers::{self, CurrentLoan, CustomOffer, OfferCatalog, RefinancingInput};

use crate::input;

/// Arguments for offer ranking and the full refinancing analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RefinanceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Offer catalog file (JSON or YAML); the built-in catalog otherwise
    #[arg(long)]
    pub catalog: Option<String>,

    /// Omit per-offer amortization schedules from the output
    #[arg(long)]
    pub summary: bool,

    /// Outstanding debt on the current loan
    #[arg(long)]
    pub remaining_debt: Option<Decimal>,

    /// Current annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Current remaining term in months
    #[arg(long, conflicts_with = "term_years")]
    pub term_months: Option<u32>,

    /// Current remaining term in years (rounded to whole months)
    #[arg(long)]
    pub term_years: Option<Decimal>,

    /// Current monthly payment (derived from rate and term when omitted)
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// New term in months (defaults to the current term)
    #[arg(long, conflicts_with = "desired_term_years")]
    pub desired_term_months: Option<u32>,

    /// New term in years (rounded to whole months)
    #[arg(long)]
    pub desired_term_years: Option<Decimal>,

    /// Bank name of a custom offer
    #[arg(long)]
    pub custom_bank: Option<String>,

    /// Annual rate of a custom offer in percent
    #[arg(long)]
    pub custom_rate: Option<Decimal>,

    /// One-time cost of a custom offer (defaults to 500)
    #[arg(long)]
    pub custom_cost: Option<Decimal>,
}

/// Arguments for printing the built-in offer catalog
#[derive(Args)]
pub struct CatalogArgs {
    /// Validate this catalog file instead of printing the built-in one
    #[arg(long)]
    pub file: Option<String>,
}

fn refinancing_input(args: &RefinanceArgs) -> Result<RefinancingInput, Box<dyn std::error::Error>> {
    let mut req: RefinancingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let repayment_term_months = match (args.term_months, args.term_years) {
            (Some(m), _) => m,
            (None, Some(y)) => years_to_months(y),
            (None, None) => return Err("--term-months or --term-years is required (or provide --input)".into()),
        };
        let custom_offer = args.custom_bank.as_ref().map(|bank| CustomOffer {
            bank: bank.clone(),
            interest_rate_percent: args.custom_rate,
            refinancing_cost: args.custom_cost,
        });
        RefinancingInput {
            current_loan: CurrentLoan {
                remaining_debt: args
                    .remaining_debt
                    .ok_or("--remaining-debt is required (or provide --input)")?,
                interest_rate_percent: args.rate.unwrap_or(Decimal::ZERO),
                repayment_term_months,
                monthly_payment: args.monthly_payment,
            },
            desired_term_months: args
                .desired_term_months
                .or(args.desired_term_years.map(years_to_months)),
            custom_offer,
            catalog: None,
        }
    };

    if let Some(ref path) = args.catalog {
        req.catalog = Some(input::file::read_catalog(path)?);
    }
    Ok(req)
}

/// Drop the `amortization_schedule` of every ranked offer.
fn strip_schedules(value: &mut Value) {
    if let Some(Value::Array(offers)) = value.pointer_mut("/result/offers") {
        for offer in offers {
            if let Value::Object(map) = offer {
                map.remove("amortization_schedule");
            }
        }
    }
}

pub fn run_offers(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = refinancing_input(&args)?;
    let result = offers::rank_offers(&req)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_schedules(&mut value);
    }
    Ok(value)
}

pub fn run_analyze(args: RefinanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let req = refinancing_input(&args)?;
    let result = analysis::analyze_refinancing(&req)?;
    let mut value = serde_json::to_value(result)?;
    if args.summary {
        strip_schedules(&mut value);
    }
    Ok(value)
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = match args.file {
        Some(ref path) => input::file::read_catalog(path)?,
        None => OfferCatalog::default(),
    };
    Ok(serde_json::to_value(catalog)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_schedules() {
        let mut value = json!({
            "result": {
                "offers": [
                    { "bank": "PBZ", "amortization_schedule": [{ "month": 1 }] },
                    { "bank": "Erste Bank", "amortization_schedule": [] }
                ]
            }
        });
        strip_schedules(&mut value);
        assert_eq!(
            value,
            json!({ "result": { "offers": [{ "bank": "PBZ" }, { "bank": "Erste Bank" }] } })
        );
    }
}
