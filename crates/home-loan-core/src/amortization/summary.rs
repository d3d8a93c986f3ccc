use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::LoanResult;

use super::scenario::LoanScenario;
use super::schedule::{build_payoff_schedule, build_schedule};

/// Payoff reached before the scheduled term thanks to extra payments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarlyPayoff {
    /// Period in which the balance is repaid.
    pub period_index: u32,
    pub payoff_date: YearMonth,
    pub payoff_label: String,
    /// Interest paid up to and including the payoff period.
    pub interest_paid: Money,
    /// Interest saved against the same loan without extra payments.
    pub interest_saved: Money,
}

/// Headline figures for one loan scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_amount: Money,
    pub annual_rate_percent: Percent,
    pub monthly_interest_rate: Rate,
    pub num_payments: u32,
    pub monthly_payment: Money,
    pub extra_monthly_payment: Money,
    /// Monthly payment including the extra payment.
    pub total_monthly_payment: Money,
    /// Interest summed over the full-term schedule.
    pub total_interest_paid: Money,
    pub total_paid: Money,
    /// Start period advanced by the number of payments.
    pub payoff_date: YearMonth,
    pub payoff_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_payoff: Option<EarlyPayoff>,
}

/// Summarise a loan: payment, interest, payoff date.
pub fn analyze_loan(scenario: &LoanScenario) -> LoanResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let schedule = build_schedule(scenario)?;
    let num_payments = scenario.num_payments()?;
    let payoff_date = schedule.payoff_date()?;

    if scenario.annual_rate_percent.is_zero() {
        warnings.push("Zero interest rate: payment is principal divided evenly over the term".into());
    }
    if scenario.principal.is_zero() {
        warnings.push("Zero loan amount: all payments are zero".into());
    }

    let early_payoff = match schedule.zero_balance_period() {
        Some(period) if period < num_payments && !scenario.principal.is_zero() => {
            let payoff = build_payoff_schedule(scenario)?;
            let without_extra = build_schedule(&scenario.clone().with_extra_payment(Decimal::ZERO))?;
            let interest_paid = payoff.total_interest_paid();
            let date = payoff.payoff_date()?;
            warnings.push(format!(
                "Balance reaches zero in period {period}; the remaining {} scheduled rows carry a negative balance",
                num_payments - period
            ));
            Some(EarlyPayoff {
                period_index: period,
                payoff_date: date,
                payoff_label: date.short_label(),
                interest_paid,
                interest_saved: without_extra.total_interest_paid() - interest_paid,
            })
        }
        _ => None,
    };

    let output = LoanSummary {
        loan_amount: scenario.principal,
        annual_rate_percent: scenario.annual_rate_percent,
        monthly_interest_rate: scenario.monthly_rate(),
        num_payments,
        monthly_payment: schedule.base_payment,
        extra_monthly_payment: scenario.extra_monthly_payment,
        total_monthly_payment: schedule.total_payment,
        total_interest_paid: schedule.total_interest_paid(),
        total_paid: schedule.total_paid(),
        payoff_date,
        payoff_label: payoff_date.short_label(),
        early_payoff,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate monthly amortisation (annuity payment, flat extra payment)",
        &serde_json::json!({
            "principal": scenario.principal.to_string(),
            "annual_rate_percent": scenario.annual_rate_percent.to_string(),
            "term_years": scenario.term_years,
            "extra_monthly_payment": scenario.extra_monthly_payment.to_string(),
            "start_period": scenario.start_period.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
