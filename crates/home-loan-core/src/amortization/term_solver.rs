//! Payoff-term solving: how many months a fixed payment needs to retire a
//! balance. The inverse of the annuity payment formula, done by simulation
//! so that payments which do not match any whole-year term still resolve.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::time_value::{interest_only_payment, monthly_rate};
use crate::types::{Money, Percent, Years};
use crate::LoanResult;

use super::BALANCE_EPSILON;

/// Iteration cap (months) before a payment is declared non-convergent.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

/// Result of a payoff-term simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermEstimate {
    /// Months simulated; equals `max_iterations` when non-convergent.
    pub months: u32,
    /// `months / 12`, floored at 1 year.
    pub years: Years,
    /// Whether the balance reached zero within the cap.
    pub converged: bool,
    pub max_iterations: u32,
    pub monthly_payment: Money,
    /// Interest on the opening principal for one month.
    pub interest_only_payment: Money,
}

impl TermEstimate {
    /// Turn a non-convergent estimate into a `NonConvergentPayment` error.
    pub fn into_converged(self) -> LoanResult<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(LoanError::NonConvergentPayment {
                monthly_payment: self.monthly_payment,
                interest_only_payment: self.interest_only_payment,
                max_iterations: self.max_iterations,
            })
        }
    }
}

/// Simulate month by month until the balance is repaid or the cap is hit.
///
/// Each month the principal reduction is `monthly_payment - interest -
/// extra_payment`. Once a month fails to reduce principal the balance can
/// only grow, so the estimate jumps straight to the cap.
pub fn simulate_term(
    principal: Money,
    monthly_payment: Money,
    annual_rate_percent: Percent,
    extra_payment: Money,
    max_iterations: u32,
) -> LoanResult<TermEstimate> {
    if principal < Decimal::ZERO {
        return Err(LoanError::invalid("principal", "Loan amount cannot be negative"));
    }
    if monthly_payment < Decimal::ZERO {
        return Err(LoanError::invalid(
            "monthly_payment",
            "Monthly payment cannot be negative",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanError::invalid(
            "annual_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if extra_payment < Decimal::ZERO {
        return Err(LoanError::invalid(
            "extra_payment",
            "Extra payment cannot be negative",
        ));
    }
    if max_iterations == 0 {
        return Err(LoanError::invalid(
            "max_iterations",
            "Iteration cap must be at least 1",
        ));
    }

    let r = monthly_rate(annual_rate_percent);
    let mut balance = principal;
    let mut months: u32 = 0;

    while balance > BALANCE_EPSILON && months < max_iterations {
        let principal_portion = balance
            .checked_mul(r)
            .and_then(|interest| monthly_payment.checked_sub(interest))
            .and_then(|net| net.checked_sub(extra_payment))
            .ok_or_else(|| LoanError::overflow("payoff simulation"))?;
        if principal_portion <= Decimal::ZERO {
            months = max_iterations;
            break;
        }
        balance -= principal_portion;
        months += 1;
    }

    let converged = balance <= BALANCE_EPSILON;
    let years = (Decimal::from(months) / dec!(12)).max(Decimal::ONE);
    let interest_only = interest_only_payment(principal, annual_rate_percent);

    if converged {
        log::debug!("payment {monthly_payment} retires {principal} in {months} months");
    } else {
        log::warn!(
            "payment {monthly_payment} does not retire {principal} within {max_iterations} months (interest-only {interest_only})"
        );
    }

    Ok(TermEstimate {
        months,
        years,
        converged,
        max_iterations,
        monthly_payment,
        interest_only_payment: interest_only,
    })
}

/// Estimated payoff term in years (minimum 1.0).
///
/// A payment that never retires the balance yields the sentinel
/// `max_iterations / 12` (floored at 1.0 like any other result); check with
/// [`is_non_convergent`], or use [`simulate_term`] / [`solve_term`] to get
/// an explicit flag or an error instead.
pub fn estimate_term_years(
    principal: Money,
    monthly_payment: Money,
    annual_rate_percent: Percent,
    extra_payment: Money,
    max_iterations: u32,
) -> LoanResult<Years> {
    simulate_term(
        principal,
        monthly_payment,
        annual_rate_percent,
        extra_payment,
        max_iterations,
    )
    .map(|estimate| estimate.years)
}

/// Like [`simulate_term`], but a non-convergent payment is an error.
pub fn solve_term(
    principal: Money,
    monthly_payment: Money,
    annual_rate_percent: Percent,
    extra_payment: Money,
    max_iterations: u32,
) -> LoanResult<TermEstimate> {
    simulate_term(
        principal,
        monthly_payment,
        annual_rate_percent,
        extra_payment,
        max_iterations,
    )?
    .into_converged()
}

/// True when `years` is the non-convergence sentinel for `max_iterations`.
///
/// With a cap of 12 months or less the sentinel floors to 1.0, the value
/// every sub-year converged term also reports, so every result reads as
/// non-convergent.
/// Callers using such a cap should read [`TermEstimate::converged`] from
/// [`simulate_term`] instead.
pub fn is_non_convergent(years: Years, max_iterations: u32) -> bool {
    years >= Decimal::from(max_iterations) / dec!(12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::monthly_payment;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_payment_to_term() {
        let pmt = monthly_payment(dec!(1000000), dec!(11.75), 20).unwrap();
        let est = simulate_term(dec!(1000000), pmt, dec!(11.75), Decimal::ZERO, DEFAULT_MAX_ITERATIONS)
            .unwrap();
        assert!(est.converged);
        assert_eq!(est.months, 240);
        assert_eq!(est.years, dec!(20));
    }

    #[test]
    fn test_minimum_one_year() {
        // pays off in 2 months
        let years =
            estimate_term_years(dec!(1000), dec!(600), dec!(12), Decimal::ZERO, DEFAULT_MAX_ITERATIONS)
                .unwrap();
        assert_eq!(years, Decimal::ONE);
    }

    #[test]
    fn test_zero_principal_is_one_year() {
        let est = simulate_term(Decimal::ZERO, dec!(100), dec!(5), Decimal::ZERO, 100).unwrap();
        assert!(est.converged);
        assert_eq!(est.months, 0);
        assert_eq!(est.years, Decimal::ONE);
    }

    #[test]
    fn test_extra_payment_is_subtracted() {
        let pmt = monthly_payment(dec!(1000000), dec!(11.75), 20).unwrap();
        let plain =
            simulate_term(dec!(1000000), pmt, dec!(11.75), Decimal::ZERO, DEFAULT_MAX_ITERATIONS)
                .unwrap();
        let offset =
            simulate_term(dec!(1000000), pmt + dec!(500), dec!(11.75), dec!(500), DEFAULT_MAX_ITERATIONS)
                .unwrap();
        assert_eq!(plain.months, offset.months);
    }

    #[test]
    fn test_non_convergent_returns_sentinel() {
        let years = estimate_term_years(
            dec!(100000),
            dec!(100),
            dec!(20),
            Decimal::ZERO,
            DEFAULT_MAX_ITERATIONS,
        )
        .unwrap();
        assert_eq!(years, Decimal::from(DEFAULT_MAX_ITERATIONS) / dec!(12));
        assert!(is_non_convergent(years, DEFAULT_MAX_ITERATIONS));
    }

    #[test]
    fn test_solve_term_raises_non_convergent() {
        let err = solve_term(dec!(100000), dec!(100), dec!(20), Decimal::ZERO, DEFAULT_MAX_ITERATIONS)
            .unwrap_err();
        match err {
            LoanError::NonConvergentPayment {
                interest_only_payment,
                max_iterations,
                ..
            } => {
                assert_eq!(interest_only_payment.round_dp(2), dec!(1666.67));
                assert_eq!(max_iterations, DEFAULT_MAX_ITERATIONS);
            }
            other => panic!("expected NonConvergentPayment, got {other:?}"),
        }
    }

    #[test]
    fn test_small_cap_is_non_convergent() {
        let pmt = monthly_payment(dec!(1000000), dec!(11.75), 20).unwrap();
        let est = simulate_term(dec!(1000000), pmt, dec!(11.75), Decimal::ZERO, 120).unwrap();
        assert!(!est.converged);
        assert_eq!(est.months, 120);
        assert!(est.into_converged().is_err());
    }

    #[test]
    fn test_sub_year_cap_needs_converged_flag() {
        // pays off in 2 months under a 6-month cap
        let paid = simulate_term(dec!(1000), dec!(600), dec!(12), Decimal::ZERO, 6).unwrap();
        assert!(paid.converged);
        assert_eq!(paid.months, 2);

        let stuck = simulate_term(dec!(100000), dec!(100), dec!(20), Decimal::ZERO, 6).unwrap();
        assert!(!stuck.converged);
        assert_eq!(stuck.months, 6);

        // both floor to one year; the year value cannot tell them apart
        assert_eq!(paid.years, stuck.years);
        assert!(is_non_convergent(paid.years, 6));
        assert!(paid.into_converged().is_ok());
        assert!(stuck.into_converged().is_err());
    }

    #[test]
    fn test_multi_year_cap_separates_sentinel() {
        let paid = simulate_term(dec!(1000), dec!(600), dec!(12), Decimal::ZERO, 24).unwrap();
        assert!(paid.converged);
        assert!(!is_non_convergent(paid.years, 24));
    }

    #[test]
    fn test_simulation_overflow_is_error() {
        let err = simulate_term(Decimal::MAX, dec!(100), dec!(2400), Decimal::ZERO, 10).unwrap_err();
        assert!(matches!(err, LoanError::Overflow { .. }));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert!(simulate_term(dec!(-1), dec!(100), dec!(5), Decimal::ZERO, 100).is_err());
        assert!(simulate_term(dec!(1), dec!(-100), dec!(5), Decimal::ZERO, 100).is_err());
        assert!(simulate_term(dec!(1), dec!(100), dec!(-5), Decimal::ZERO, 100).is_err());
        assert!(simulate_term(dec!(1), dec!(100), dec!(5), dec!(-1), 100).is_err());
        assert!(simulate_term(dec!(1), dec!(100), dec!(5), Decimal::ZERO, 0).is_err());
    }
}
