use chrono::Local;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use home_loan_core::amortization::summary::analyze_loan;
use home_loan_core::amortization::term_solver::{solve_term, DEFAULT_MAX_ITERATIONS};
use home_loan_core::amortization::{build_payoff_schedule, build_schedule, AmortizationRow, LoanScenario};
use home_loan_core::time_value;
use home_loan_core::YearMonth;

use crate::input;

/// Loan parameters shared by the single-scenario commands
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to a JSON or YAML scenario file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 11.75)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Extra amount added to every monthly payment
    #[arg(long)]
    pub extra_payment: Option<Decimal>,

    /// Month of the first payment (YYYY-MM); defaults to the current month
    #[arg(long)]
    pub start: Option<YearMonth>,
}

impl ScenarioArgs {
    pub fn into_scenario(self) -> Result<LoanScenario, Box<dyn std::error::Error>> {
        if let Some(scenario) = input::load::<LoanScenario>(self.input.as_deref())? {
            return Ok(scenario);
        }

        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = self.rate.ok_or("--rate is required (or provide --input)")?;
        let term_years = self
            .term_years
            .ok_or("--term-years is required (or provide --input)")?;
        let start = match self.start {
            Some(start) => start,
            None => current_month()?,
        };

        Ok(LoanScenario::new(principal, rate, term_years, start)
            .with_extra_payment(self.extra_payment.unwrap_or(Decimal::ZERO)))
    }
}

pub(crate) fn current_month() -> Result<YearMonth, Box<dyn std::error::Error>> {
    Ok(YearMonth::from_date(Local::now().date_naive())?)
}

/// Arguments for the monthly payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Loan amount
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (e.g. 11.75)
    #[arg(long)]
    pub rate: Decimal,

    /// Loan term in years
    #[arg(long)]
    pub term_years: u32,

    /// Extra amount added to every monthly payment
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment = time_value::monthly_payment(args.principal, args.rate, args.term_years)?;
    let total = time_value::total_monthly_payment(
        args.principal,
        args.rate,
        args.term_years,
        args.extra_payment,
    )?;
    Ok(json!({
        "result": {
            "monthly_payment": payment,
            "total_monthly_payment": total,
            "monthly_interest_rate": time_value::monthly_rate(args.rate),
            "num_payments": time_value::num_payments(args.term_years)?,
        }
    }))
}

/// Arguments for the amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Stop at the period the balance reaches zero
    #[arg(long)]
    pub stop_at_payoff: bool,

    /// Only show rows from this payment number onward
    #[arg(long)]
    pub from_period: Option<u32>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = args.scenario.into_scenario()?;
    let schedule = if args.stop_at_payoff {
        build_payoff_schedule(&scenario)?
    } else {
        build_schedule(&scenario)?
    };

    let rows: Vec<Value> = schedule
        .rows_from(args.from_period.unwrap_or(1))
        .iter()
        .map(display_row)
        .collect();

    Ok(json!({
        "result": {
            "start_period": schedule.start_period,
            "monthly_payment": schedule.base_payment,
            "total_monthly_payment": schedule.total_payment,
            "num_rows": schedule.len(),
            "total_interest_paid": schedule.total_interest_paid(),
            "payoff_date": schedule.payoff_date()?.short_label(),
        },
        "rows": rows,
    }))
}

/// Row as shown to the user: labeled month, amounts to the cent, balance
/// clamped at zero.
fn display_row(row: &AmortizationRow) -> Value {
    json!({
        "period": row.period_index,
        "month": row.label(),
        "payment": row.payment_amount.round_dp(2),
        "principal": row.principal_portion.round_dp(2),
        "interest": row.interest_portion.round_dp(2),
        "balance": row.display_balance().round_dp(2),
    })
}

/// Arguments for the loan summary
#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = args.scenario.into_scenario()?;
    let result = analyze_loan(&scenario)?;
    Ok(serde_json::to_value(result)?)
}

/// Input file shape for the term estimate
#[derive(Deserialize)]
struct TermInput {
    principal: Decimal,
    monthly_payment: Decimal,
    annual_rate_percent: Decimal,
    #[serde(default)]
    extra_payment: Decimal,
    #[serde(default)]
    max_iterations: Option<u32>,
}

/// Arguments for the payoff term estimate
#[derive(Args)]
pub struct TermArgs {
    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Monthly payment applied every month
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 11.75)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Portion of the monthly payment that does not reduce principal
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// Months to simulate before declaring the payment insufficient
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: u32,
}

pub fn run_term(args: TermArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let term_input = match input::load::<TermInput>(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => TermInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            monthly_payment: args
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
            annual_rate_percent: args.rate.ok_or("--rate is required (or provide --input)")?,
            extra_payment: args.extra_payment,
            max_iterations: Some(args.max_iterations),
        },
    };

    let estimate = solve_term(
        term_input.principal,
        term_input.monthly_payment,
        term_input.annual_rate_percent,
        term_input.extra_payment,
        term_input.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
    )?;
    Ok(json!({ "result": estimate }))
}
