use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::payment::{validate_principal, validate_term};
use crate::calendar::advance_periods;
use crate::error::LendingError;
use crate::rounding::{checked_mul, round_money};
use crate::types::*;
use crate::LendingResult;

/// One installment of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub total_payment: Money,
    pub remaining_balance: Money,
}

/// Which balance a period's interest is charged on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterestBase {
    Outstanding,
    Original,
}

/// Expand a loan into its period-by-period schedule.
///
/// Interest accrues on the outstanding balance each period and the rest of
/// the installment retires principal. The final entry pays off whatever
/// balance remains, absorbing accumulated rounding drift into its interest
/// portion, so the schedule always closes at exactly zero.
///
/// A zero installment is accepted (a tiny principal over a long term
/// rounds to one); an installment below the first period's interest is
/// rejected since the balance would grow.
pub fn generate_amortization_schedule(
    principal: Money,
    periodic_rate: Rate,
    payment_amount: Money,
    term_length: u32,
    term_unit: TermUnit,
    first_due_date: NaiveDate,
) -> LendingResult<Vec<PaymentScheduleEntry>> {
    build_schedule(
        InterestBase::Outstanding,
        principal,
        periodic_rate,
        payment_amount,
        term_length,
        term_unit,
        first_due_date,
    )
}

/// Schedule for simple-interest loans: every installment carries the same
/// interest, charged on the original principal, with the same final-entry
/// correction as [`generate_amortization_schedule`].
pub fn generate_flat_interest_schedule(
    principal: Money,
    periodic_rate: Rate,
    payment_amount: Money,
    term_length: u32,
    term_unit: TermUnit,
    first_due_date: NaiveDate,
) -> LendingResult<Vec<PaymentScheduleEntry>> {
    build_schedule(
        InterestBase::Original,
        principal,
        periodic_rate,
        payment_amount,
        term_length,
        term_unit,
        first_due_date,
    )
}

fn build_schedule(
    base: InterestBase,
    principal: Money,
    periodic_rate: Rate,
    payment_amount: Money,
    term_length: u32,
    term_unit: TermUnit,
    first_due_date: NaiveDate,
) -> LendingResult<Vec<PaymentScheduleEntry>> {
    validate_principal(principal)?;
    validate_term(term_length)?;
    if payment_amount < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "payment_amount".into(),
            reason: "Installment cannot be negative".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(LendingError::NegativeRate {
            field: "periodic_rate".into(),
            value: periodic_rate,
        });
    }
    // Both bases start at the full principal, so period one carries the most interest
    let first_interest = round_money(checked_mul(principal, periodic_rate, "principal")?);
    if first_interest > payment_amount {
        return Err(LendingError::InvalidInput {
            field: "payment_amount".into(),
            reason: format!(
                "Installment {payment_amount} does not cover first-period interest {first_interest}"
            ),
        });
    }

    let mut entries = Vec::with_capacity(term_length as usize);
    let mut balance = principal;

    for payment_number in 1..=term_length {
        let accrual_base = match base {
            InterestBase::Outstanding => balance,
            InterestBase::Original => principal,
        };
        let mut interest_portion = round_money(checked_mul(accrual_base, periodic_rate, "principal")?);
        let mut principal_portion = round_money(payment_amount - interest_portion);

        if payment_number == term_length {
            principal_portion = round_money(balance);
            interest_portion = round_money(payment_amount - principal_portion);
            if interest_portion < Decimal::ZERO {
                warn!(
                    payment_number,
                    %interest_portion,
                    "final installment smaller than remaining balance"
                );
            }
        } else if principal_portion > balance {
            // Rounded-up installments can retire the balance early
            principal_portion = balance;
            interest_portion = round_money(payment_amount - principal_portion);
        }

        balance = round_money(balance - principal_portion).max(Decimal::ZERO);

        entries.push(PaymentScheduleEntry {
            payment_number,
            due_date: advance_periods(first_due_date, term_unit, payment_number - 1)?,
            principal_portion,
            interest_portion,
            total_payment: payment_amount,
            remaining_balance: balance,
        });
    }

    debug!(
        entries = entries.len(),
        ?base,
        %first_due_date,
        "generated amortization schedule"
    );
    Ok(entries)
}

/// Due date of the last installment.
///
/// A single-period loan ends on its first due date.
pub fn calculate_end_date(
    first_due_date: NaiveDate,
    term_length: u32,
    term_unit: TermUnit,
) -> LendingResult<NaiveDate> {
    validate_term(term_length)?;
    advance_periods(first_due_date, term_unit, term_length - 1)
}
