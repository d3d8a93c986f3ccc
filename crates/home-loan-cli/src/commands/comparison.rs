use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use home_loan_core::amortization::LoanScenario;
use home_loan_core::comparison::{compare_scenarios, ComparisonInput};
use home_loan_core::YearMonth;

use super::loan::current_month;
use crate::input;

/// Arguments for the original-versus-modified comparison.
///
/// Modified values default to the original ones, so only the changed
/// parameters need to be given.
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON or YAML file with `original` and `modified` scenarios
    #[arg(long)]
    pub input: Option<String>,

    /// Original loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Original annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Original loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Original extra monthly payment
    #[arg(long, default_value = "0")]
    pub extra_payment: Decimal,

    /// Month of the first payment (YYYY-MM); defaults to the current month
    #[arg(long)]
    pub start: Option<YearMonth>,

    /// Modified loan amount
    #[arg(long)]
    pub new_principal: Option<Decimal>,

    /// Modified annual interest rate in percent
    #[arg(long)]
    pub new_rate: Option<Decimal>,

    /// Modified loan term in years
    #[arg(long)]
    pub new_term_years: Option<u32>,

    /// Modified extra monthly payment
    #[arg(long)]
    pub new_extra_payment: Option<Decimal>,

    /// Months the term solver simulates before giving up
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Include both balance paths, payment by payment
    #[arg(long)]
    pub balance_paths: bool,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cmp_input: ComparisonInput = match input::load(args.input.as_deref())? {
        Some(loaded) => loaded,
        None => {
            let start = match args.start {
                Some(start) => start,
                None => current_month()?,
            };
            let original = LoanScenario::new(
                args.principal
                    .ok_or("--principal is required (or provide --input)")?,
                args.rate.ok_or("--rate is required (or provide --input)")?,
                args.term_years
                    .ok_or("--term-years is required (or provide --input)")?,
                start,
            )
            .with_extra_payment(args.extra_payment);

            let modified = LoanScenario {
                principal: args.new_principal.unwrap_or(original.principal),
                annual_rate_percent: args.new_rate.unwrap_or(original.annual_rate_percent),
                term_years: args.new_term_years.unwrap_or(original.term_years),
                extra_monthly_payment: args
                    .new_extra_payment
                    .unwrap_or(original.extra_monthly_payment),
                start_period: original.start_period,
            };

            ComparisonInput {
                original,
                modified,
                max_iterations: None,
                include_balance_paths: false,
            }
        }
    };

    if args.max_iterations.is_some() {
        cmp_input.max_iterations = args.max_iterations;
    }
    cmp_input.include_balance_paths |= args.balance_paths;

    let result = compare_scenarios(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
