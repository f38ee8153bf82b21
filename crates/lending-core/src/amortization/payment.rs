use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LendingError;
use crate::rounding::{checked_add, checked_div, checked_mul, round_money};
use crate::types::*;
use crate::LendingResult;

/// Terms of a loan or personal debt as captured from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a percentage (24 = 24%)
    pub annual_interest_rate: Percent,
    pub term_length: u32,
    #[serde(default)]
    pub term_unit: TermUnit,
    #[serde(default)]
    pub interest_method: InterestMethod,
}

impl LoanTerms {
    /// Annual percentage converted to a per-period decimal rate.
    pub fn periodic_rate(&self) -> Rate {
        self.annual_interest_rate / dec!(100) / Decimal::from(self.term_unit.periods_per_year())
    }
}

/// Installment amount and totals for a set of loan terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentCalculation {
    pub payment_amount: Money,
    pub total_interest: Money,
    pub total_amount: Money,
    /// Unrounded per-period rate, fed back into schedule generation
    pub periodic_rate: Rate,
}

pub(crate) fn validate_principal(principal: Money) -> LendingResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LendingError::NonPositivePrincipal(principal));
    }
    Ok(())
}

pub(crate) fn validate_term(term_length: u32) -> LendingResult<()> {
    if term_length == 0 {
        return Err(LendingError::InvalidTerm(term_length));
    }
    Ok(())
}

fn validate_terms(terms: &LoanTerms) -> LendingResult<()> {
    validate_principal(terms.principal)?;
    validate_term(terms.term_length)?;
    if terms.annual_interest_rate < Decimal::ZERO {
        return Err(LendingError::NegativeRate {
            field: "annual_interest_rate".into(),
            value: terms.annual_interest_rate,
        });
    }
    Ok(())
}

/// Compute the installment, total interest and total repayable amount.
///
/// An interest-free loan splits the principal evenly. Otherwise `Simple`
/// charges `principal * rate * n` once and spreads it over the term, and
/// `French` uses the annuity formula `P * r * (1+r)^n / ((1+r)^n - 1)`.
/// Money outputs are rounded to cents; the periodic rate is left exact.
pub fn calculate_periodic_payment(terms: &LoanTerms) -> LendingResult<PaymentCalculation> {
    validate_terms(terms)?;

    let principal = terms.principal;
    let periodic_rate = terms.periodic_rate();
    let periods = Decimal::from(terms.term_length);

    let (payment_amount, total_interest, total_amount) = if periodic_rate.is_zero() {
        (principal / periods, Decimal::ZERO, principal)
    } else {
        match terms.interest_method {
            InterestMethod::Simple => {
                let per_period = checked_mul(principal, periodic_rate, "principal")?;
                let total_interest = checked_mul(per_period, periods, "term_length")?;
                let total_amount = checked_add(principal, total_interest, "principal")?;
                (total_amount / periods, total_interest, total_amount)
            }
            InterestMethod::French => {
                let factor = compound_factor(periodic_rate, terms.term_length)?;
                let denominator = factor - Decimal::ONE;
                if denominator.is_zero() {
                    return Err(LendingError::DivisionByZero {
                        context: "annuity factor (rate too small to compound)".into(),
                    });
                }
                // factor / (factor - 1) tends to 1, keeping long terms in range
                let ratio = checked_div(factor, denominator, "term_length")?;
                let per_period = checked_mul(principal, periodic_rate, "principal")?;
                let payment = checked_mul(per_period, ratio, "principal")?;
                let total_amount = checked_mul(payment, periods, "term_length")?;
                (payment, total_amount - principal, total_amount)
            }
        }
    };

    let calc = PaymentCalculation {
        payment_amount: round_money(payment_amount),
        total_interest: round_money(total_interest),
        total_amount: round_money(total_amount),
        periodic_rate,
    };
    debug!(
        method = %terms.interest_method,
        unit = %terms.term_unit,
        term = terms.term_length,
        payment = %calc.payment_amount,
        total = %calc.total_amount,
        "computed periodic payment"
    );
    Ok(calc)
}

/// (1 + r)^n
fn compound_factor(periodic_rate: Rate, term_length: u32) -> LendingResult<Decimal> {
    (Decimal::ONE + periodic_rate)
        .checked_powi(i64::from(term_length))
        .ok_or_else(|| LendingError::InvalidInput {
            field: "term_length".into(),
            reason: format!("(1 + {periodic_rate})^{term_length} overflows decimal range"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(method: InterestMethod) -> LoanTerms {
        LoanTerms {
            principal: dec!(5000),
            annual_interest_rate: dec!(24),
            term_length: 6,
            term_unit: TermUnit::Months,
            interest_method: method,
        }
    }

    #[test]
    fn test_simple_monthly() {
        let calc = calculate_periodic_payment(&terms(InterestMethod::Simple)).unwrap();
        assert_eq!(calc.periodic_rate, dec!(0.02));
        assert_eq!(calc.total_interest, dec!(600.00));
        assert_eq!(calc.total_amount, dec!(5600.00));
        assert_eq!(calc.payment_amount, dec!(933.33));
    }

    #[test]
    fn test_french_monthly() {
        let calc = calculate_periodic_payment(&terms(InterestMethod::French)).unwrap();
        assert_eq!(calc.payment_amount, dec!(892.63));
        // Total uses the unrounded installment: 892.62906... * 6
        assert_eq!(calc.total_amount, dec!(5355.77));
        assert_eq!(calc.total_interest, dec!(355.77));
    }

    #[test]
    fn test_french_cheaper_than_simple() {
        let simple = calculate_periodic_payment(&terms(InterestMethod::Simple)).unwrap();
        let french = calculate_periodic_payment(&terms(InterestMethod::French)).unwrap();
        assert!(french.total_interest < simple.total_interest);
    }

    #[test]
    fn test_weekly_periods() {
        let input = LoanTerms {
            principal: dec!(1000),
            annual_interest_rate: dec!(52),
            term_length: 10,
            term_unit: TermUnit::Weeks,
            interest_method: InterestMethod::Simple,
        };
        let calc = calculate_periodic_payment(&input).unwrap();
        assert_eq!(calc.periodic_rate, dec!(0.01));
        assert_eq!(calc.total_interest, dec!(100));
        assert_eq!(calc.payment_amount, dec!(110));

        let french = calculate_periodic_payment(&LoanTerms {
            interest_method: InterestMethod::French,
            ..input
        })
        .unwrap();
        assert_eq!(french.payment_amount, dec!(105.58));
        assert_eq!(french.total_amount, dec!(1055.82));
        assert_eq!(french.total_interest, dec!(55.82));
    }

    #[test]
    fn test_zero_rate_any_method() {
        for method in [InterestMethod::Simple, InterestMethod::French] {
            let input = LoanTerms {
                principal: dec!(1200),
                annual_interest_rate: Decimal::ZERO,
                term_length: 12,
                term_unit: TermUnit::Months,
                interest_method: method,
            };
            let calc = calculate_periodic_payment(&input).unwrap();
            assert_eq!(calc.payment_amount, dec!(100.00));
            assert_eq!(calc.total_interest, Decimal::ZERO);
            assert_eq!(calc.total_amount, dec!(1200.00));
            assert!(calc.periodic_rate.is_zero());
        }
    }

    #[test]
    fn test_single_period_french() {
        let input = LoanTerms {
            principal: dec!(1000),
            annual_interest_rate: dec!(12),
            term_length: 1,
            term_unit: TermUnit::Months,
            interest_method: InterestMethod::French,
        };
        let calc = calculate_periodic_payment(&input).unwrap();
        assert_eq!(calc.payment_amount, dec!(1010));
        assert_eq!(calc.total_interest, dec!(10));
    }

    #[test]
    fn test_non_positive_principal_error() {
        let mut input = terms(InterestMethod::Simple);
        input.principal = Decimal::ZERO;
        assert!(matches!(
            calculate_periodic_payment(&input),
            Err(LendingError::NonPositivePrincipal(_))
        ));
        input.principal = dec!(-5);
        assert!(calculate_periodic_payment(&input).is_err());
    }

    #[test]
    fn test_zero_term_error() {
        let mut input = terms(InterestMethod::French);
        input.term_length = 0;
        assert!(matches!(
            calculate_periodic_payment(&input),
            Err(LendingError::InvalidTerm(0))
        ));
    }

    #[test]
    fn test_negative_rate_error() {
        let mut input = terms(InterestMethod::Simple);
        input.annual_interest_rate = dec!(-1);
        assert!(matches!(
            calculate_periodic_payment(&input),
            Err(LendingError::NegativeRate { .. })
        ));
    }

    #[test]
    fn test_terms_json_defaults() {
        let json = r#"{"principal":"5000","annual_interest_rate":"24","term_length":6}"#;
        let input: LoanTerms = serde_json::from_str(json).unwrap();
        assert_eq!(input.term_unit, TermUnit::Months);
        assert_eq!(input.interest_method, InterestMethod::Simple);
    }

    #[test]
    fn test_long_steep_french_stays_in_range() {
        // (1.1)^650 is close to the decimal limit; the payment is not
        let input = LoanTerms {
            principal: dec!(1000000),
            annual_interest_rate: dec!(120),
            term_length: 650,
            term_unit: TermUnit::Months,
            interest_method: InterestMethod::French,
        };
        let calc = calculate_periodic_payment(&input).unwrap();
        assert_eq!(calc.payment_amount, dec!(100000.00));
        assert_eq!(calc.total_amount, dec!(65000000.00));
        assert_eq!(calc.total_interest, dec!(64000000.00));
    }

    #[test]
    fn test_simple_interest_overflow_is_an_error() {
        let input = LoanTerms {
            principal: dec!(10000000000000000000000000000),
            annual_interest_rate: dec!(24),
            term_length: 1000,
            term_unit: TermUnit::Months,
            interest_method: InterestMethod::Simple,
        };
        assert!(matches!(
            calculate_periodic_payment(&input),
            Err(LendingError::InvalidInput { ref field, .. }) if field == "term_length"
        ));
    }

    #[test]
    fn test_french_overflow_is_an_error() {
        let mut input = terms(InterestMethod::French);
        // 100% a period: 5e28 * 4/3 fits, doubling it for the total does not
        input.principal = dec!(50000000000000000000000000000);
        input.annual_interest_rate = dec!(1200);
        input.term_length = 2;
        assert!(matches!(
            calculate_periodic_payment(&input),
            Err(LendingError::InvalidInput { .. })
        ));
    }
}
