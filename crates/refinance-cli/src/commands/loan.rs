use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use refinance_core::amortization;
use refinance_core::annuity;
use refinance_core::break_even::{self, BreakEvenInput};
use refinance_core::costs::{self, LoanCostsInput};
use refinance_core::LoanTerms;

use crate::input;

/// Loan terms shared by the payment, schedule and cost commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanTermsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Principal (outstanding amount)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (4.2 = 4.2%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in whole months
    #[arg(long)]
    pub term_months: Option<u32>,
}

/// Arguments for total loan cost
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CostsArgs {
    #[command(flatten)]
    pub terms: LoanTermsArgs,

    /// One-time fees added to the total cost
    #[arg(long)]
    pub fees: Option<Decimal>,
}

/// Arguments for break-even analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BreakEvenArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Current monthly payment
    #[arg(long)]
    pub current_payment: Option<Decimal>,

    /// New monthly payment
    #[arg(long)]
    pub new_payment: Option<Decimal>,

    /// One-time refinancing cost
    #[arg(long)]
    pub cost: Option<Decimal>,
}

fn loan_terms(args: &LoanTermsArgs) -> Result<LoanTerms, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }
    Ok(LoanTerms {
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        annual_interest_rate_percent: args
            .rate
            .ok_or("--rate is required (or provide --input)")?,
        term_months: args
            .term_months
            .ok_or("--term-months is required (or provide --input)")?,
    })
}

pub fn run_payment(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(&args)?;
    let result = annuity::calculate_payment(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanTermsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = loan_terms(&args)?;
    let result = amortization::build_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_costs(args: CostsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let costs_input: LoanCostsInput = if let Some(ref path) = args.terms.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanCostsInput {
            terms: loan_terms(&args.terms)?,
            additional_fees: args.fees.unwrap_or(Decimal::ZERO),
        }
    };
    let result = costs::calculate_loan_costs(&costs_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let be_input: BreakEvenInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        BreakEvenInput {
            current_monthly_payment: args
                .current_payment
                .ok_or("--current-payment is required (or provide --input)")?,
            new_monthly_payment: args
                .new_payment
                .ok_or("--new-payment is required (or provide --input)")?,
            refinancing_cost: args.cost.ok_or("--cost is required (or provide --input)")?,
        }
    };
    let result = break_even::analyze_break_even(&be_input)?;
    Ok(serde_json::to_value(result)?)
}
