use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use home_loan_core::amortization::summary::analyze_loan;
use home_loan_core::amortization::term_solver::{simulate_term, DEFAULT_MAX_ITERATIONS};
use home_loan_core::amortization::{build_payoff_schedule, build_schedule, LoanScenario};
use home_loan_core::comparison::{compare_scenarios, ComparisonInput};
use home_loan_core::time_value;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_scenario(input_json: &str) -> NapiResult<LoanScenario> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payment and schedule
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PaymentRequest {
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
}

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let req: PaymentRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = time_value::monthly_payment(req.principal, req.annual_rate_percent, req.term_years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&payment).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String, stop_at_payoff: Option<bool>) -> NapiResult<String> {
    let scenario = parse_scenario(&input_json)?;
    let schedule = if stop_at_payoff.unwrap_or(false) {
        build_payoff_schedule(&scenario)
    } else {
        build_schedule(&scenario)
    }
    .map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let scenario = parse_scenario(&input_json)?;
    let output = analyze_loan(&scenario).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Term and comparison
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TermRequest {
    principal: Decimal,
    monthly_payment: Decimal,
    annual_rate_percent: Decimal,
    #[serde(default)]
    extra_payment: Decimal,
    #[serde(default)]
    max_iterations: Option<u32>,
}

/// Returns the full estimate; callers check `converged` rather than
/// trusting `years` alone.
#[napi]
pub fn estimate_term(input_json: String) -> NapiResult<String> {
    let req: TermRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let estimate = simulate_term(
        req.principal,
        req.monthly_payment,
        req.annual_rate_percent,
        req.extra_payment,
        req.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&estimate).map_err(to_napi_error)
}

#[napi]
pub fn compare_loans(input_json: String) -> NapiResult<String> {
    let input: ComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = compare_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
