//! Original-versus-modified scenario comparison.

pub mod analysis;
pub mod balance_paths;
pub mod compare;

pub use analysis::{compare_scenarios, ComparisonInput, ComparisonOutput};
pub use compare::{compare, compare_with_limit, Framing, PaymentImpact, ScenarioComparisonResult, Verdict};
