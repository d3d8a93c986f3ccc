use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::term_solver::DEFAULT_MAX_ITERATIONS;
use crate::amortization::{build_payoff_schedule, build_schedule, LoanScenario, BALANCE_EPSILON};
use crate::types::*;
use crate::LoanResult;

use super::balance_paths::{balance_paths, BalancePoint};
use super::compare::{compare_with_limit, PaymentImpact, ScenarioComparisonResult};

/// Input for an original-versus-modified comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub original: LoanScenario,
    pub modified: LoanScenario,
    /// Term solver iteration cap (months); defaults to 10,000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<u32>,
    /// Include per-period balances of both schedules.
    #[serde(default)]
    pub include_balance_paths: bool,
}

/// Comparison result with interest and charting extras
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub comparison: ScenarioComparisonResult,
    pub payment_impact: PaymentImpact,
    /// Verdict explanations in priority order.
    pub explanations: Vec<String>,
    /// Interest paid until each loan is repaid.
    pub original_interest_to_payoff: Money,
    pub updated_interest_to_payoff: Money,
    /// `original - updated`; positive means interest saved.
    pub interest_delta: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_paths: Option<Vec<BalancePoint>>,
}

/// Compare an original and a modified loan scenario.
pub fn compare_scenarios(
    input: &ComparisonInput,
) -> LoanResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let max_iterations = input.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);

    let comparison = compare_with_limit(&input.original, &input.modified, max_iterations)?;

    if input.modified.principal != input.original.principal {
        warnings.push(format!(
            "Modified loan amount {} differs from the original {}; the updated term is solved against the original amount",
            input.modified.principal, input.original.principal
        ));
    }

    let original_payoff = build_payoff_schedule(&input.original)?;
    let updated_payoff = build_payoff_schedule(&input.modified)?;
    let original_interest = original_payoff.total_interest_paid();
    let updated_interest = updated_payoff.total_interest_paid();

    let paths = if input.include_balance_paths {
        let original_full = build_schedule(&input.original)?;
        let updated_full = build_schedule(&input.modified)?;
        if updated_full.final_balance() < -BALANCE_EPSILON {
            warnings.push(
                "Modified schedule repays the loan before its last period; later balances are shown as zero"
                    .into(),
            );
        }
        Some(balance_paths(&original_full, &updated_full))
    } else {
        None
    };

    let explanations = comparison
        .verdicts
        .iter()
        .map(|v| v.explanation().to_string())
        .collect();

    let output = ComparisonOutput {
        payment_impact: comparison.payment_impact(),
        explanations,
        original_interest_to_payoff: original_interest,
        updated_interest_to_payoff: updated_interest,
        interest_delta: original_interest - updated_interest,
        balance_paths: paths,
        comparison,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Scenario comparison (annuity payments, payoff term solved at the original rate)",
        &serde_json::json!({
            "original": input.original,
            "modified": input.modified,
            "max_iterations": max_iterations,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare::Verdict;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn original() -> LoanScenario {
        LoanScenario::new(dec!(1000000), dec!(11.75), 20, YearMonth::new(2023, 9).unwrap())
    }

    fn input(modified: LoanScenario) -> ComparisonInput {
        ComparisonInput {
            original: original(),
            modified,
            max_iterations: None,
            include_balance_paths: false,
        }
    }

    #[test]
    fn test_extra_payment_saves_interest() {
        let modified = original().with_extra_payment(dec!(1000));
        let out = compare_scenarios(&input(modified)).unwrap();
        let res = &out.result;
        assert!(res.interest_delta > Decimal::ZERO);
        assert_eq!(res.explanations.len(), 2);
        assert_eq!(res.comparison.primary_verdict(), Verdict::ExtraPaymentAdded);
        assert!(res.balance_paths.is_none());
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_balance_paths_included_on_request() {
        let mut modified = original();
        modified.term_years = 15;
        let mut inp = input(modified);
        inp.include_balance_paths = true;
        let out = compare_scenarios(&inp).unwrap();
        let paths = out.result.balance_paths.as_ref().unwrap();
        assert_eq!(paths.len(), 240);
    }

    #[test]
    fn test_principal_change_warns() {
        let mut modified = original();
        modified.principal = dec!(1100000);
        let out = compare_scenarios(&input(modified)).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("differs from the original")));
        assert!(out.result.comparison.payment_delta < Decimal::ZERO);
    }
}
