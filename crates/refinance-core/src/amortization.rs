use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::annuity::{compute_monthly_payment, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, LoanTerms, Money, Months, Percent, Rate};
use crate::RefinanceResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// 1-based month number.
    pub month: Months,
    /// 1-based year number, `ceil(month / 12)`.
    pub year: u32,
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// Balance after this payment, never below zero.
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub final_balance: Money,
    pub entries: Vec<AmortizationEntry>,
}

/// Lazily walks a fixed-payment schedule one month at a time.
///
/// Each entry depends on the balance left by the previous one, so the
/// iterator is strictly sequential and cannot be restarted.
#[derive(Debug, Clone)]
pub struct AmortizationIter {
    payment: Money,
    rate: Rate,
    balance: Money,
    month: Months,
    term_months: Months,
}

impl AmortizationIter {
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        term_months: Months,
    ) -> RefinanceResult<Self> {
        let payment = compute_monthly_payment(principal, annual_rate_percent, term_months)?;
        Ok(Self {
            payment,
            rate: monthly_rate(annual_rate_percent),
            balance: principal,
            month: 0,
            term_months,
        })
    }

    pub fn payment(&self) -> Money {
        self.payment
    }
}

impl Iterator for AmortizationIter {
    type Item = AmortizationEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.term_months {
            return None;
        }
        self.month += 1;

        let interest_portion = self.balance * self.rate;
        let principal_portion = self.payment - interest_portion;
        self.balance = (self.balance - principal_portion).max(Decimal::ZERO);

        Some(AmortizationEntry {
            month: self.month,
            year: self.month.div_ceil(12),
            payment: self.payment,
            principal_portion,
            interest_portion,
            remaining_balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.term_months - self.month) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for AmortizationIter {}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Month-by-month principal/interest breakdown, exactly `term_months` rows.
pub fn generate_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: Months,
) -> RefinanceResult<Vec<AmortizationEntry>> {
    Ok(AmortizationIter::new(principal, annual_rate_percent, term_months)?.collect())
}

/// Full schedule plus totals, wrapped in the output envelope.
pub fn build_schedule(terms: &LoanTerms) -> RefinanceResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    terms.validate()?;

    let iter = AmortizationIter::new(
        terms.principal,
        terms.annual_interest_rate_percent,
        terms.term_months,
    )?;
    let monthly_payment = iter.payment();
    let entries: Vec<AmortizationEntry> = iter.collect();

    let total_paid: Money = entries.iter().map(|e| e.payment).sum();
    let total_interest: Money = entries.iter().map(|e| e.interest_portion).sum();
    let final_balance = entries
        .last()
        .map(|e| e.remaining_balance)
        .unwrap_or(terms.principal);

    if !final_balance.is_zero() {
        warnings.push(format!(
            "Rounding the payment to cents leaves {final_balance} outstanding after the last month"
        ));
    }

    let output = ScheduleOutput {
        monthly_payment,
        total_paid,
        total_interest,
        final_balance,
        entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortization schedule",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
