use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::calendar::{days_between, deserialize_day, deserialize_optional_day, today};
use crate::error::LendingError;
use crate::rounding::{checked_add, checked_mul, round_money};
use crate::types::*;
use crate::LendingResult;

/// How a late installment accrues its penalty once the grace period ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyType {
    #[default]
    None,
    /// One-off charge regardless of how late
    Fixed,
    /// Charged for every day past grace
    Daily,
    /// Charged for every started week past grace
    Weekly,
}

impl fmt::Display for PenaltyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyType::None => write!(f, "none"),
            PenaltyType::Fixed => write!(f, "fixed"),
            PenaltyType::Daily => write!(f, "daily"),
            PenaltyType::Weekly => write!(f, "weekly"),
        }
    }
}

impl FromStr for PenaltyType {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(PenaltyType::None),
            "fixed" => Ok(PenaltyType::Fixed),
            "daily" => Ok(PenaltyType::Daily),
            "weekly" => Ok(PenaltyType::Weekly),
            other => Err(LendingError::InvalidInput {
                field: "penalty_type".into(),
                reason: format!("expected none, fixed, daily or weekly, got '{other}'"),
            }),
        }
    }
}

/// Late-payment policy attached to a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRegime {
    #[serde(default)]
    pub grace_period_days: u32,
    #[serde(default)]
    pub penalty_type: PenaltyType,
    /// Percentage of the installment charged per accrual unit (5 = 5%)
    #[serde(default)]
    pub penalty_rate: Percent,
}

/// A single installment checked against a late-payment policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyInput {
    #[serde(deserialize_with = "deserialize_day")]
    pub due_date: NaiveDate,
    pub installment_amount: Money,
    pub regime: PenaltyRegime,
    /// Reference day; today's local date when omitted
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub current_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyResult {
    pub is_overdue: bool,
    pub days_overdue: u32,
    pub days_after_grace: u32,
    pub penalty_amount: Money,
    pub total_with_penalty: Money,
}

impl PenaltyResult {
    fn not_penalized(is_overdue: bool, days_overdue: u32, installment_amount: Money) -> Self {
        PenaltyResult {
            is_overdue,
            days_overdue,
            days_after_grace: 0,
            penalty_amount: Decimal::ZERO,
            total_with_penalty: installment_amount,
        }
    }
}

/// Compute how late an installment is and what penalty it has accrued.
///
/// Uses `input.current_date`, falling back to the local clock. Pass the
/// date explicitly whenever the result must be reproducible.
pub fn calculate_late_penalty(input: &PenaltyInput) -> LendingResult<PenaltyResult> {
    let current_date = input.current_date.unwrap_or_else(today);
    assess_penalty(
        input.due_date,
        input.installment_amount,
        &input.regime,
        current_date,
    )
}

/// Penalty for an installment as of a fixed calendar day.
pub fn assess_penalty(
    due_date: NaiveDate,
    installment_amount: Money,
    regime: &PenaltyRegime,
    current_date: NaiveDate,
) -> LendingResult<PenaltyResult> {
    if installment_amount <= Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "installment_amount".into(),
            reason: "Installment amount must be positive".into(),
        });
    }
    if regime.penalty_rate < Decimal::ZERO {
        return Err(LendingError::NegativeRate {
            field: "penalty_rate".into(),
            value: regime.penalty_rate,
        });
    }

    let elapsed = days_between(due_date, current_date);
    if elapsed <= 0 {
        return Ok(PenaltyResult::not_penalized(false, 0, installment_amount));
    }
    let days_overdue = u32::try_from(elapsed).map_err(|_| {
        LendingError::DateError(format!("{elapsed} days overdue exceeds supported range"))
    })?;

    let days_after_grace = days_overdue.saturating_sub(regime.grace_period_days);
    if days_after_grace == 0 || regime.penalty_type == PenaltyType::None {
        return Ok(PenaltyResult::not_penalized(true, days_overdue, installment_amount));
    }

    let rate_fraction = regime.penalty_rate / dec!(100);
    let base = checked_mul(installment_amount, rate_fraction, "installment_amount")?;
    let penalty = match regime.penalty_type {
        PenaltyType::None => Decimal::ZERO,
        PenaltyType::Fixed => base,
        PenaltyType::Daily => checked_mul(base, Decimal::from(days_after_grace), "penalty_amount")?,
        PenaltyType::Weekly => checked_mul(
            base,
            Decimal::from(days_after_grace.div_ceil(7)),
            "penalty_amount",
        )?,
    };

    let penalty_amount = round_money(penalty);
    let result = PenaltyResult {
        is_overdue: true,
        days_overdue,
        days_after_grace,
        penalty_amount,
        total_with_penalty: round_money(checked_add(
            installment_amount,
            penalty_amount,
            "total_with_penalty",
        )?),
    };
    debug!(
        %due_date,
        %current_date,
        penalty_type = %regime.penalty_type,
        days_overdue,
        days_after_grace,
        penalty = %result.penalty_amount,
        "assessed late penalty"
    );
    Ok(result)
}
