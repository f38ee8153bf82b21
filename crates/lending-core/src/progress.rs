use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LendingError;
use crate::rounding::{checked_div, checked_mul, round_money};
use crate::types::{Money, Percent};
use crate::LendingResult;

/// Share of a loan's total already repaid, as a percentage rounded to cents.
///
/// A zero total reports 0% rather than dividing by zero.
pub fn calculate_payment_progress(paid_amount: Money, total_amount: Money) -> LendingResult<Percent> {
    if paid_amount < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "paid_amount".into(),
            reason: "Paid amount cannot be negative".into(),
        });
    }
    if total_amount < Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: "total_amount".into(),
            reason: "Total amount cannot be negative".into(),
        });
    }
    if total_amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let share = checked_div(paid_amount, total_amount, "total_amount")?;
    Ok(round_money(checked_mul(share, dec!(100), "paid_amount")?))
}
