use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Instant;

use super::late_fee::{assess_penalty, PenaltyRegime, PenaltyResult, PenaltyType};
use super::status::PenaltyStatus;
use crate::calendar::{deserialize_day, deserialize_optional_day, today};
use crate::types::*;
use crate::LendingResult;

/// Status carried by a stored installment row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Partial,
    Overdue,
}

impl PaymentStatus {
    /// Whether penalties still accrue on an installment in this status.
    pub fn is_open(self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Overdue)
    }
}

/// Snapshot of one stored installment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentRecord {
    pub payment_number: u32,
    #[serde(deserialize_with = "deserialize_day")]
    pub due_date: NaiveDate,
    pub amount: Money,
    #[serde(default)]
    pub status: PaymentStatus,
    /// Penalty stored by the last assessment
    #[serde(default)]
    pub penalty_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassessmentInput {
    pub installments: Vec<InstallmentRecord>,
    pub regime: PenaltyRegime,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReassessedInstallment {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub previous_status: PaymentStatus,
    pub status: PaymentStatus,
    pub penalty_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<PenaltyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub penalty_status: Option<PenaltyStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReassessmentOutput {
    pub as_of: NaiveDate,
    pub installments: Vec<ReassessedInstallment>,
    pub overdue_count: u32,
    pub total_penalties: Money,
}

/// Refresh penalties and statuses for every open installment of a loan.
///
/// Pending and overdue rows are reassessed as of `as_of` (today when
/// omitted); a pending row that is past due becomes overdue. Paid and
/// partial rows pass through untouched. Output is ordered by payment number.
/// A regime of type `none` charges nothing, so every row passes through
/// with its stored status and penalty.
pub fn reassess_installments(
    input: &ReassessmentInput,
) -> LendingResult<ComputationOutput<ReassessmentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let as_of = input.as_of.unwrap_or_else(today);

    let mut records: Vec<&InstallmentRecord> = input.installments.iter().collect();
    records.sort_by_key(|r| r.payment_number);

    let mut seen = BTreeSet::new();
    for record in &records {
        if !seen.insert(record.payment_number) {
            warnings.push(format!(
                "Duplicate payment number {} in input",
                record.payment_number
            ));
        }
    }

    let mut installments = Vec::with_capacity(records.len());
    let mut overdue_count = 0u32;
    let mut total_penalties = Decimal::ZERO;

    for record in records {
        let reassessed = if record.status.is_open() && input.regime.penalty_type != PenaltyType::None {
            let result = assess_penalty(record.due_date, record.amount, &input.regime, as_of)?;
            let status = if result.is_overdue && record.status == PaymentStatus::Pending {
                PaymentStatus::Overdue
            } else {
                record.status
            };
            total_penalties += result.penalty_amount;
            ReassessedInstallment {
                payment_number: record.payment_number,
                due_date: record.due_date,
                amount: record.amount,
                previous_status: record.status,
                status,
                penalty_amount: result.penalty_amount,
                penalty_status: Some(PenaltyStatus::from(&result)),
                assessment: Some(result),
            }
        } else {
            ReassessedInstallment {
                payment_number: record.payment_number,
                due_date: record.due_date,
                amount: record.amount,
                previous_status: record.status,
                status: record.status,
                penalty_amount: record.penalty_amount,
                assessment: None,
                penalty_status: None,
            }
        };
        if reassessed.status == PaymentStatus::Overdue {
            overdue_count += 1;
        }
        installments.push(reassessed);
    }

    let output = ReassessmentOutput {
        as_of,
        installments,
        overdue_count,
        total_penalties,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Late penalty reassessment of open installments",
        &serde_json::json!({
            "as_of": as_of.to_string(),
            "grace_period_days": input.regime.grace_period_days,
            "penalty_type": input.regime.penalty_type.to_string(),
            "penalty_rate_pct": input.regime.penalty_rate.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
