use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amortization::term_solver::{simulate_term, DEFAULT_MAX_ITERATIONS};
use crate::amortization::LoanScenario;
use crate::types::{Money, Years};
use crate::LoanResult;

/// Whether a change reads as good or bad news for the borrower
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    Positive,
    Negative,
    Neutral,
}

/// One qualitative explanation of a scenario change.
///
/// Variants are declared in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    ExtraPaymentAdded,
    ExtraPaymentReduced,
    RateDecreased,
    RateIncreased,
    TermShortened,
    TermLengthened,
    NoChange,
}

impl Verdict {
    pub fn framing(&self) -> Framing {
        match self {
            Verdict::ExtraPaymentAdded | Verdict::RateDecreased | Verdict::TermShortened => {
                Framing::Positive
            }
            Verdict::ExtraPaymentReduced | Verdict::RateIncreased | Verdict::TermLengthened => {
                Framing::Negative
            }
            Verdict::NoChange => Framing::Neutral,
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Verdict::ExtraPaymentAdded => {
                "Extra monthly payments shorten the loan term and reduce total interest"
            }
            Verdict::ExtraPaymentReduced => {
                "A smaller extra monthly payment lengthens the loan term and raises total cost"
            }
            Verdict::RateDecreased => "A lower interest rate reduces the cost of the loan",
            Verdict::RateIncreased => "A higher interest rate increases the cost of the loan",
            Verdict::TermShortened => "The loan is repaid sooner",
            Verdict::TermLengthened => "The loan takes longer to repay",
            Verdict::NoChange => "No change",
        }
    }
}

/// Direction of the monthly payment change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentImpact {
    Savings,
    AdditionalCost,
    Unchanged,
}

impl PaymentImpact {
    /// Classify `original - updated`; positive means the borrower pays less.
    pub fn from_delta(payment_delta: Money) -> Self {
        if payment_delta > Decimal::ZERO {
            PaymentImpact::Savings
        } else if payment_delta < Decimal::ZERO {
            PaymentImpact::AdditionalCost
        } else {
            PaymentImpact::Unchanged
        }
    }
}

/// Structured difference between two scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparisonResult {
    /// Annuity payment of the original scenario.
    pub original_monthly_payment: Money,
    /// Annuity payment of the modified scenario plus its extra payment.
    pub updated_monthly_payment: Money,
    /// `original - updated`; positive means savings.
    pub payment_delta: Money,
    pub original_term_years: u32,
    /// Months the updated payment needs against the original rate and principal.
    pub updated_term_months: u32,
    pub updated_term_years: Years,
    /// `updated - original`; negative means a shorter loan.
    pub term_delta_years: Years,
    /// Every applicable verdict, in priority order.
    pub verdicts: Vec<Verdict>,
}

impl ScenarioComparisonResult {
    /// Highest-priority verdict.
    pub fn primary_verdict(&self) -> Verdict {
        self.verdicts.first().copied().unwrap_or(Verdict::NoChange)
    }

    pub fn payment_impact(&self) -> PaymentImpact {
        PaymentImpact::from_delta(self.payment_delta)
    }
}

/// Compare two scenarios with the default iteration cap.
pub fn compare(
    original: &LoanScenario,
    modified: &LoanScenario,
) -> LoanResult<ScenarioComparisonResult> {
    compare_with_limit(original, modified, DEFAULT_MAX_ITERATIONS)
}

/// Compare two scenarios.
///
/// The updated term answers "how long would payoff take at the new
/// payment level": the modified total payment is run through the term
/// solver against the original principal and rate. A modified payment
/// that never retires the original loan is a `NonConvergentPayment`
/// error rather than a term figure.
pub fn compare_with_limit(
    original: &LoanScenario,
    modified: &LoanScenario,
    max_iterations: u32,
) -> LoanResult<ScenarioComparisonResult> {
    original.validate()?;
    modified.validate()?;

    let original_payment = original.base_payment()?;
    let updated_payment = modified.total_payment()?;
    let payment_delta = original_payment - updated_payment;

    let estimate = simulate_term(
        original.principal,
        updated_payment,
        original.annual_rate_percent,
        original.extra_monthly_payment,
        max_iterations,
    )?
    .into_converged()?;
    let term_delta_years = estimate.years - Decimal::from(original.term_years);

    let verdicts = classify(original, modified, term_delta_years);
    log::debug!(
        "compared scenarios: payment delta {payment_delta}, term delta {term_delta_years} years, verdicts {verdicts:?}"
    );

    Ok(ScenarioComparisonResult {
        original_monthly_payment: original_payment,
        updated_monthly_payment: updated_payment,
        payment_delta,
        original_term_years: original.term_years,
        updated_term_months: estimate.months,
        updated_term_years: estimate.years,
        term_delta_years,
        verdicts,
    })
}

fn classify(original: &LoanScenario, modified: &LoanScenario, term_delta_years: Years) -> Vec<Verdict> {
    let extra_change = modified.extra_monthly_payment - original.extra_monthly_payment;
    let rate_change = modified.annual_rate_percent - original.annual_rate_percent;

    let checks = [
        (extra_change > Decimal::ZERO, Verdict::ExtraPaymentAdded),
        (extra_change < Decimal::ZERO, Verdict::ExtraPaymentReduced),
        (rate_change < Decimal::ZERO, Verdict::RateDecreased),
        (rate_change > Decimal::ZERO, Verdict::RateIncreased),
        (term_delta_years < Decimal::ZERO, Verdict::TermShortened),
        (term_delta_years > Decimal::ZERO, Verdict::TermLengthened),
    ];

    let verdicts: Vec<Verdict> = checks
        .into_iter()
        .filter_map(|(applies, verdict)| applies.then_some(verdict))
        .collect();

    if verdicts.is_empty() {
        vec![Verdict::NoChange]
    } else {
        verdicts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;
    use crate::types::YearMonth;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn original() -> LoanScenario {
        LoanScenario::new(dec!(1000000), dec!(11.75), 20, YearMonth::new(2023, 9).unwrap())
    }

    #[test]
    fn test_identical_scenarios_no_change() {
        let result = compare(&original(), &original()).unwrap();
        assert_eq!(result.payment_delta, Decimal::ZERO);
        assert_eq!(result.updated_term_months, 240);
        assert_eq!(result.term_delta_years, Decimal::ZERO);
        assert_eq!(result.verdicts, vec![Verdict::NoChange]);
        assert_eq!(result.payment_impact(), PaymentImpact::Unchanged);
    }

    #[test]
    fn test_extra_payment_shortens_term() {
        let modified = original().with_extra_payment(dec!(1000));
        let result = compare(&original(), &modified).unwrap();
        assert_eq!(result.payment_delta, dec!(-1000));
        assert_eq!(result.payment_impact(), PaymentImpact::AdditionalCost);
        assert_eq!(result.updated_term_months, 181);
        assert!(result.term_delta_years < Decimal::ZERO);
        assert_eq!(
            result.verdicts,
            vec![Verdict::ExtraPaymentAdded, Verdict::TermShortened]
        );
        assert_eq!(result.primary_verdict().framing(), Framing::Positive);
    }

    #[test]
    fn test_reduced_extra_payment() {
        let base = original().with_extra_payment(dec!(1000));
        let modified = original().with_extra_payment(dec!(500));
        let result = compare(&base, &modified).unwrap();
        assert_eq!(result.primary_verdict(), Verdict::ExtraPaymentReduced);
        assert_eq!(result.primary_verdict().framing(), Framing::Negative);
    }

    #[test]
    fn test_rate_decrease_lists_every_verdict() {
        let mut modified = original();
        modified.annual_rate_percent = dec!(10.75);
        let result = compare(&original(), &modified).unwrap();
        // lower payment, repaid at the original rate, takes longer
        assert_eq!(result.payment_impact(), PaymentImpact::Savings);
        assert_eq!(result.updated_term_months, 343);
        assert_eq!(
            result.verdicts,
            vec![Verdict::RateDecreased, Verdict::TermLengthened]
        );
    }

    #[test]
    fn test_rate_increase() {
        let mut modified = original();
        modified.annual_rate_percent = dec!(12.75);
        let result = compare(&original(), &modified).unwrap();
        assert_eq!(result.updated_term_months, 194);
        assert_eq!(
            result.verdicts,
            vec![Verdict::RateIncreased, Verdict::TermShortened]
        );
    }

    #[test]
    fn test_shorter_term() {
        let mut modified = original();
        modified.term_years = 15;
        let result = compare(&original(), &modified).unwrap();
        assert_eq!(result.updated_term_years, dec!(15));
        assert_eq!(result.term_delta_years, dec!(-5));
        assert_eq!(result.verdicts, vec![Verdict::TermShortened]);
    }

    #[test]
    fn test_non_convergent_modified_payment() {
        let mut modified = original();
        modified.annual_rate_percent = Decimal::ZERO;
        modified.term_years = 100;
        // 1,000,000 / 1200 = 833.33 against ~9,791.67 interest at the original rate
        let err = compare(&original(), &modified).unwrap_err();
        assert!(matches!(err, LoanError::NonConvergentPayment { .. }));
    }

    #[test]
    fn test_verdict_ordering_matches_priority() {
        let mut sorted = vec![
            Verdict::TermLengthened,
            Verdict::RateDecreased,
            Verdict::ExtraPaymentAdded,
        ];
        sorted.sort();
        assert_eq!(
            sorted,
            vec![
                Verdict::ExtraPaymentAdded,
                Verdict::RateDecreased,
                Verdict::TermLengthened
            ]
        );
    }

    #[test]
    fn test_payment_impact_from_delta() {
        assert_eq!(PaymentImpact::from_delta(dec!(10)), PaymentImpact::Savings);
        assert_eq!(PaymentImpact::from_delta(dec!(-10)), PaymentImpact::AdditionalCost);
        assert_eq!(PaymentImpact::from_delta(Decimal::ZERO), PaymentImpact::Unchanged);
    }
}
