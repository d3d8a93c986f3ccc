use serde::{Deserialize, Serialize};

use crate::amortization::Schedule;
use crate::types::Money;

/// Original and updated balances after one payment number, for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub period_index: u32,
    /// `None` once the original schedule has ended.
    pub original_balance: Option<Money>,
    /// `None` once the updated schedule has ended.
    pub updated_balance: Option<Money>,
}

/// Align two schedules by payment number. Balances are clamped at zero.
pub fn balance_paths(original: &Schedule, updated: &Schedule) -> Vec<BalancePoint> {
    let periods = original.len().max(updated.len());
    (0..periods)
        .map(|i| BalancePoint {
            period_index: i as u32 + 1,
            original_balance: original.rows.get(i).map(|r| r.display_balance()),
            updated_balance: updated.rows.get(i).map(|r| r.display_balance()),
        })
        .collect()
}
