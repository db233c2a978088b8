use log::warn;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RefinanceError;
use crate::types::{with_metadata, ComputationOutput, Money, Months};
use crate::RefinanceResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub current_monthly_payment: Money,
    pub new_monthly_payment: Money,
    pub refinancing_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakEven {
    pub months: Months,
    pub years: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenOutput {
    pub monthly_savings: Money,
    /// None when the new payment is not lower than the current one.
    pub break_even: Option<BreakEven>,
}

/// Months of savings needed to recover a one-time refinancing cost.
///
/// Returns `None` when the monthly saving is zero or negative, or when the
/// recovery period does not fit in a month count.
pub fn compute_break_even(
    current_monthly_payment: Money,
    new_monthly_payment: Money,
    refinancing_cost: Money,
) -> Option<Months> {
    let monthly_savings = current_monthly_payment - new_monthly_payment;
    if monthly_savings <= Decimal::ZERO {
        return None;
    }
    let months = refinancing_cost.checked_div(monthly_savings).map(|m| m.ceil());
    // a zero or negative cost is recovered immediately
    if months.is_some_and(|m| m <= Decimal::ZERO) {
        return Some(0);
    }
    let months = months.and_then(|m| m.to_u32());
    if months.is_none() {
        warn!(
            "Break-even for cost {refinancing_cost} at {monthly_savings}/month exceeds the representable month range"
        );
    }
    months
}

/// Break-even point in months and years.
pub fn break_even_point(
    current_monthly_payment: Money,
    new_monthly_payment: Money,
    refinancing_cost: Money,
) -> Option<BreakEven> {
    compute_break_even(current_monthly_payment, new_monthly_payment, refinancing_cost).map(|months| {
        BreakEven {
            months,
            years: Decimal::from(months) / dec!(12),
        }
    })
}

pub fn analyze_break_even(
    input: &BreakEvenInput,
) -> RefinanceResult<ComputationOutput<BreakEvenOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.refinancing_cost < Decimal::ZERO {
        return Err(RefinanceError::invalid(
            "refinancing_cost",
            "Refinancing cost cannot be negative.",
        ));
    }

    let monthly_savings = input.current_monthly_payment - input.new_monthly_payment;
    let break_even = break_even_point(
        input.current_monthly_payment,
        input.new_monthly_payment,
        input.refinancing_cost,
    );
    if break_even.is_none() {
        if monthly_savings > Decimal::ZERO {
            warnings.push("Monthly savings are too small to recover the refinancing cost".into());
        } else {
            warnings.push("New payment is not lower; the refinancing cost is never recovered".into());
        }
    }

    let output = BreakEvenOutput {
        monthly_savings,
        break_even,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Break-even: ceil(refinancing cost / monthly savings)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
