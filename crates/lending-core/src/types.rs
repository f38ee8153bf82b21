use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LendingError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.02 = 2%).
pub type Rate = Decimal;

/// Rates as entered by users (24 = 24%). Converted to `Rate` before use.
pub type Percent = Decimal;

/// Length of one repayment period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermUnit {
    Weeks,
    #[default]
    Months,
}

impl TermUnit {
    pub fn periods_per_year(self) -> u32 {
        match self {
            TermUnit::Weeks => 52,
            TermUnit::Months => 12,
        }
    }
}

impl fmt::Display for TermUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermUnit::Weeks => write!(f, "weeks"),
            TermUnit::Months => write!(f, "months"),
        }
    }
}

impl FromStr for TermUnit {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weeks" | "week" | "weekly" => Ok(TermUnit::Weeks),
            "months" | "month" | "monthly" => Ok(TermUnit::Months),
            other => Err(LendingError::InvalidInput {
                field: "term_unit".into(),
                reason: format!("expected 'weeks' or 'months', got '{other}'"),
            }),
        }
    }
}

/// How interest is charged over the life of a loan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestMethod {
    /// Interest charged once on the original principal, spread evenly
    #[default]
    Simple,
    /// Constant annuity installment, interest on the outstanding balance
    French,
}

impl fmt::Display for InterestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterestMethod::Simple => write!(f, "simple"),
            InterestMethod::French => write!(f, "french"),
        }
    }
}

impl FromStr for InterestMethod {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(InterestMethod::Simple),
            "french" | "annuity" => Ok(InterestMethod::French),
            other => Err(LendingError::InvalidInput {
                field: "interest_method".into(),
                reason: format!("expected 'simple' or 'french', got '{other}'"),
            }),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit_cents".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_unit_periods() {
        assert_eq!(TermUnit::Weeks.periods_per_year(), 52);
        assert_eq!(TermUnit::Months.periods_per_year(), 12);
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("Weeks".parse::<TermUnit>().unwrap(), TermUnit::Weeks);
        assert_eq!(" months ".parse::<TermUnit>().unwrap(), TermUnit::Months);
        assert_eq!("french".parse::<InterestMethod>().unwrap(), InterestMethod::French);
        assert!("days".parse::<TermUnit>().is_err());
        assert!("compound".parse::<InterestMethod>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&InterestMethod::French).unwrap();
        assert_eq!(json, "\"french\"");
        let unit: TermUnit = serde_json::from_str("\"weeks\"").unwrap();
        assert_eq!(unit, TermUnit::Weeks);
    }
}
