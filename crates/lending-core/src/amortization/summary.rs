use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::payment::{calculate_periodic_payment, LoanTerms, PaymentCalculation};
use super::schedule::{
    calculate_end_date, generate_amortization_schedule, generate_flat_interest_schedule,
    PaymentScheduleEntry,
};
use crate::calendar::deserialize_day;
use crate::rounding::{checked_mul, round_money, CENT};
use crate::types::*;
use crate::LendingResult;

/// Input for a full loan summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummaryInput {
    pub terms: LoanTerms,
    #[serde(deserialize_with = "deserialize_day")]
    pub first_due_date: NaiveDate,
}

/// Payment figures, schedule and end date for one loan or personal debt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub calculation: PaymentCalculation,
    pub schedule: Vec<PaymentScheduleEntry>,
    pub end_date: NaiveDate,
    pub total_principal: Money,
    pub total_scheduled: Money,
}

/// Price a loan and lay out every installment.
///
/// Loans and personal debts both go through this entry point so their
/// figures can never diverge. Simple-interest loans get a flat schedule,
/// French loans a declining-interest one. A warning is raised when closing
/// the balance moves the final interest portion by more than a cent per
/// period, or makes it negative.
pub fn summarize_loan(input: &LoanSummaryInput) -> LendingResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let terms = &input.terms;

    let calculation = calculate_periodic_payment(terms)?;
    let generate = match terms.interest_method {
        InterestMethod::Simple => generate_flat_interest_schedule,
        InterestMethod::French => generate_amortization_schedule,
    };
    let schedule = generate(
        terms.principal,
        calculation.periodic_rate,
        calculation.payment_amount,
        terms.term_length,
        terms.term_unit,
        input.first_due_date,
    )?;
    let end_date = calculate_end_date(input.first_due_date, terms.term_length, terms.term_unit)?;

    if let Some(last) = schedule.last() {
        let accrual_base = match terms.interest_method {
            InterestMethod::Simple => terms.principal,
            InterestMethod::French => schedule
                .iter()
                .rev()
                .nth(1)
                .map(|e| e.remaining_balance)
                .unwrap_or(terms.principal),
        };
        let accrued = round_money(checked_mul(accrual_base, calculation.periodic_rate, "principal")?);
        let tolerance = CENT * Decimal::from(terms.term_length);
        if (last.interest_portion - accrued).abs() > tolerance {
            warnings.push(format!(
                "Installment {}: interest adjusted from {} to {} to close the balance",
                last.payment_number, accrued, last.interest_portion
            ));
        }
        if last.interest_portion < Decimal::ZERO {
            warnings.push(format!(
                "Installment {}: rounded installment overpays principal by {}",
                last.payment_number,
                last.interest_portion.abs()
            ));
        }
    }

    let total_principal: Money = schedule.iter().map(|e| e.principal_portion).sum();
    let total_scheduled: Money = schedule.iter().map(|e| e.total_payment).sum();

    let output = LoanSummary {
        calculation,
        schedule,
        end_date,
        total_principal,
        total_scheduled,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        match terms.interest_method {
            InterestMethod::Simple => "Simple interest on original principal",
            InterestMethod::French => "French annuity amortization",
        },
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_interest_rate_pct": terms.annual_interest_rate.to_string(),
            "term": terms.term_length,
            "unit": terms.term_unit.to_string(),
            "first_due_date": input.first_due_date.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
