use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::LendingError;
use crate::types::Money;
use crate::LendingResult;

/// Smallest representable monetary step.
pub const CENT: Money = dec!(0.01);

/// Round a monetary amount to cents, half away from zero.
///
/// Every monetary value the engine reports passes through here, including
/// intermediate schedule portions, so amortization and penalty figures
/// always round identically.
pub fn round_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `lhs * rhs`, or `InvalidInput` on `field` when the product leaves the
/// decimal range.
pub(crate) fn checked_mul(lhs: Decimal, rhs: Decimal, field: &str) -> LendingResult<Decimal> {
    lhs.checked_mul(rhs)
        .ok_or_else(|| out_of_range(field, format!("{lhs} * {rhs}")))
}

pub(crate) fn checked_div(lhs: Decimal, rhs: Decimal, field: &str) -> LendingResult<Decimal> {
    lhs.checked_div(rhs)
        .ok_or_else(|| out_of_range(field, format!("{lhs} / {rhs}")))
}

pub(crate) fn checked_add(lhs: Decimal, rhs: Decimal, field: &str) -> LendingResult<Decimal> {
    lhs.checked_add(rhs)
        .ok_or_else(|| out_of_range(field, format!("{lhs} + {rhs}")))
}

fn out_of_range(field: &str, expr: String) -> LendingError {
    LendingError::InvalidInput {
        field: field.into(),
        reason: format!("{expr} overflows decimal range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_rounds_away_from_zero() {
        assert_eq!(round_money(dec!(2.005)), dec!(2.01));
        assert_eq!(round_money(dec!(2.675)), dec!(2.68));
        assert_eq!(round_money(dec!(-2.005)), dec!(-2.01));
    }

    #[test]
    fn test_below_midpoint_truncates() {
        assert_eq!(round_money(dec!(933.3333333)), dec!(933.33));
        assert_eq!(round_money(dec!(0.004999)), dec!(0.00));
    }

    #[test]
    fn test_already_rounded_is_unchanged() {
        assert_eq!(round_money(dec!(100)), dec!(100));
        assert_eq!(round_money(dec!(40.10)), dec!(40.10));
    }

    #[test]
    fn test_checked_ops_report_field() {
        assert_eq!(checked_mul(dec!(1.5), dec!(2), "x").unwrap(), dec!(3.0));
        assert_eq!(checked_add(dec!(1), dec!(2), "x").unwrap(), dec!(3));
        assert!(matches!(
            checked_mul(Decimal::MAX, dec!(2), "principal"),
            Err(LendingError::InvalidInput { ref field, .. }) if field == "principal"
        ));
        assert!(checked_add(Decimal::MAX, Decimal::MAX, "total").is_err());
        assert!(checked_div(Decimal::MAX, dec!(0.0001), "ratio").is_err());
        assert!(checked_div(dec!(1), Decimal::ZERO, "ratio").is_err());
    }
}
