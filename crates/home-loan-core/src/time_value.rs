//! Fixed-rate annuity arithmetic on monthly periods.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanError;
use crate::types::{Money, Percent, Rate};
use crate::LoanResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Monthly periodic rate from an annual percentage: 11.75 -> 0.0097916..
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(12) / dec!(100)
}

/// Number of monthly payments in a term of whole years.
pub fn num_payments(term_years: u32) -> LoanResult<u32> {
    if term_years == 0 {
        return Err(LoanError::invalid("term_years", "Loan term must be at least 1 year"));
    }
    term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or_else(|| LoanError::invalid("term_years", "Loan term is too long"))
}

/// Interest charged on `balance` for one month.
pub fn interest_only_payment(balance: Money, annual_rate_percent: Percent) -> Money {
    balance * monthly_rate(annual_rate_percent)
}

/// Fixed monthly annuity payment that retires `principal` over `term_years`.
///
/// `principal * r / (1 - (1+r)^-n)`. A zero rate falls back to equal
/// principal instalments, `principal / n`. When `(1+r)^n` leaves the Decimal
/// range its reciprocal is below 28-digit precision and the payment is the
/// interest-only amount.
pub fn monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
) -> LoanResult<Money> {
    if principal < Decimal::ZERO {
        return Err(LoanError::invalid("principal", "Loan amount cannot be negative"));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    let n = num_payments(term_years)?;

    let r = monthly_rate(annual_rate_percent);
    if r.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let interest = principal
        .checked_mul(r)
        .ok_or_else(|| LoanError::overflow("monthly interest on principal"))?;
    let factor = match (Decimal::ONE + r).checked_powd(Decimal::from(n)) {
        Some(factor) => factor,
        None => return Ok(interest),
    };
    let annuity_factor = Decimal::ONE - Decimal::ONE / factor;
    if annuity_factor.is_zero() {
        // rate so small the compounding vanishes at 28 digits
        return Ok(principal / Decimal::from(n));
    }

    interest
        .checked_div(annuity_factor)
        .ok_or_else(|| LoanError::overflow("annuity payment"))
}

/// Base payment plus a voluntary extra amount, as charged each month.
pub fn total_monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    extra_monthly_payment: Money,
) -> LoanResult<Money> {
    if extra_monthly_payment < Decimal::ZERO {
        return Err(LoanError::invalid(
            "extra_monthly_payment",
            "Extra payment cannot be negative",
        ));
    }
    let base = monthly_payment(principal, annual_rate_percent, term_years)?;
    base.checked_add(extra_monthly_payment)
        .ok_or_else(|| LoanError::overflow("total monthly payment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        let r = monthly_rate(dec!(11.75));
        assert!((r - dec!(0.0097916666)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_payment_known_answer() {
        // 1,000,000 at 11.75% over 20 years
        let pmt = monthly_payment(dec!(1000000), dec!(11.75), 20).unwrap();
        assert!((pmt - dec!(10837.07)).abs() < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_payment_zero_rate_fallback() {
        let pmt = monthly_payment(dec!(100000), Decimal::ZERO, 10).unwrap();
        assert_eq!(pmt, dec!(100000) / dec!(120));
        assert_eq!(pmt.round_dp(2), dec!(833.33));
    }

    #[test]
    fn test_payment_zero_principal() {
        let pmt = monthly_payment(Decimal::ZERO, dec!(7.5), 30).unwrap();
        assert_eq!(pmt, Decimal::ZERO);
    }

    #[test]
    fn test_payment_rejects_zero_term() {
        let err = monthly_payment(dec!(1000), dec!(5), 0).unwrap_err();
        assert!(matches!(err, LoanError::InvalidScenario { ref field, .. } if field == "term_years"));
    }

    #[test]
    fn test_payment_rejects_negative_inputs() {
        assert!(monthly_payment(dec!(-1), dec!(5), 10).is_err());
        assert!(monthly_payment(dec!(1000), dec!(-0.5), 10).is_err());
    }

    #[test]
    fn test_payment_millennium_term_is_interest_only() {
        // (1+r)^12000 is far past the Decimal range
        let pmt = monthly_payment(dec!(1000000), dec!(11.75), 1000).unwrap();
        let io = interest_only_payment(dec!(1000000), dec!(11.75));
        assert_eq!(pmt, io);
        assert_eq!(pmt.round_dp(2), dec!(9791.67));
    }

    #[test]
    fn test_payment_long_term_high_rate() {
        // (1+r)^3600 ~ 7e25 stays in range; principal * r * factor would not
        let pmt = monthly_payment(dec!(1000000), dec!(20), 300).unwrap();
        let io = interest_only_payment(dec!(1000000), dec!(20));
        assert!(pmt > io);
        assert!(pmt - io < dec!(0.01), "got {pmt}");
    }

    #[test]
    fn test_payment_principal_overflow_is_error() {
        let err = monthly_payment(Decimal::MAX, dec!(2400), 10).unwrap_err();
        assert!(matches!(err, LoanError::Overflow { .. }));
    }

    #[test]
    fn test_total_monthly_payment() {
        let total = total_monthly_payment(dec!(1000000), dec!(11.75), 20, dec!(500)).unwrap();
        let base = monthly_payment(dec!(1000000), dec!(11.75), 20).unwrap();
        assert_eq!(total, base + dec!(500));
    }

    #[test]
    fn test_total_monthly_payment_rejects_negative_extra() {
        let err = total_monthly_payment(dec!(1000000), dec!(11.75), 20, dec!(-100)).unwrap_err();
        assert!(matches!(
            err,
            LoanError::InvalidScenario { ref field, .. } if field == "extra_monthly_payment"
        ));
    }

    #[test]
    fn test_interest_only_payment() {
        // 100,000 at 20% -> ~1,666.67 per month
        let io = interest_only_payment(dec!(100000), dec!(20));
        assert_eq!(io.round_dp(2), dec!(1666.67));
    }
}
