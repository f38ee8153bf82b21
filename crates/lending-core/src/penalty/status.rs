use serde::{Deserialize, Serialize};
use std::fmt;

use super::late_fee::PenaltyResult;

/// Where an installment sits on the lateness timeline.
///
/// `Current -> OverdueInGrace -> OverduePenalized`, driven purely by the
/// dates in a [`PenaltyResult`]. Recompute it rather than storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyStatus {
    Current,
    OverdueInGrace,
    OverduePenalized,
}

impl From<&PenaltyResult> for PenaltyStatus {
    fn from(result: &PenaltyResult) -> Self {
        if !result.is_overdue {
            PenaltyStatus::Current
        } else if result.days_after_grace == 0 {
            PenaltyStatus::OverdueInGrace
        } else {
            PenaltyStatus::OverduePenalized
        }
    }
}

impl fmt::Display for PenaltyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyStatus::Current => write!(f, "current"),
            PenaltyStatus::OverdueInGrace => write!(f, "overdue_in_grace"),
            PenaltyStatus::OverduePenalized => write!(f, "overdue_penalized"),
        }
    }
}

/// One-line, human-readable status of a penalty assessment.
pub fn describe_penalty_status(result: &PenaltyResult) -> String {
    let days = result.days_overdue;
    let unit = if days == 1 { "day" } else { "days" };
    match PenaltyStatus::from(result) {
        PenaltyStatus::Current => "Up to date".to_string(),
        PenaltyStatus::OverdueInGrace => format!("Overdue {days} {unit} (in grace period)"),
        PenaltyStatus::OverduePenalized => format!(
            "Overdue {days} {unit} - penalty {:.2}",
            result.penalty_amount
        ),
    }
}
