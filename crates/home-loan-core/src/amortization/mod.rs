//! Fixed-rate amortisation: scenarios, schedules, payoff-term solving and
//! loan summaries.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub mod scenario;
pub mod schedule;
pub mod summary;
pub mod term_solver;

pub use scenario::LoanScenario;
pub use schedule::{build_payoff_schedule, build_schedule, AmortizationRow, AmortizationRows, Schedule};
pub use term_solver::{estimate_term_years, solve_term, TermEstimate, DEFAULT_MAX_ITERATIONS};

/// Balances at or below this are treated as fully repaid.
pub(crate) const BALANCE_EPSILON: Decimal = dec!(0.000001);
