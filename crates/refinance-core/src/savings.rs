use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Months};

/// Cumulative payments on both loans at the end of a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlySavingsPoint {
    pub year: u32,
    pub current_loan_cumulative: Money,
    pub refinanced_cumulative: Money,
    pub cumulative_savings: Money,
}

/// Year-by-year series of cumulative payments under the current loan and a
/// refinanced one, for charting.
///
/// Both payments are accumulated for `months` months. A year covered only
/// partially (the last one when `months` is not a multiple of 12) reports
/// the totals at its final month.
pub fn cumulative_savings(
    current_monthly_payment: Money,
    new_monthly_payment: Money,
    months: Months,
) -> Vec<YearlySavingsPoint> {
    let mut series: Vec<YearlySavingsPoint> = Vec::new();
    let mut current_total = Decimal::ZERO;
    let mut new_total = Decimal::ZERO;

    for month in 1..=months {
        current_total += current_monthly_payment;
        new_total += new_monthly_payment;

        let year = month.div_ceil(12);
        if series.last().is_some_and(|p| p.year == year) {
            series.pop();
        }
        series.push(YearlySavingsPoint {
            year,
            current_loan_cumulative: current_total,
            refinanced_cumulative: new_total,
            cumulative_savings: current_total - new_total,
        });
    }

    series
}
