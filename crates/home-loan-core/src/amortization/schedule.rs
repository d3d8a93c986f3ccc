use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::types::{Money, Rate, YearMonth};
use crate::LoanResult;

use super::scenario::LoanScenario;
use super::BALANCE_EPSILON;

/// A single monthly period in the amortisation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period number.
    pub period_index: u32,
    /// Calendar month of the payment.
    pub period: YearMonth,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    /// May dip slightly below zero in the final period, or well below it
    /// when extra payments retire the loan before the term ends.
    pub remaining_balance: Money,
}

impl AmortizationRow {
    /// Remaining balance clamped at zero for display.
    pub fn display_balance(&self) -> Money {
        self.remaining_balance.max(Decimal::ZERO)
    }

    /// Long month label, e.g. "September 2023".
    pub fn label(&self) -> String {
        self.period.long_label()
    }
}

/// Restartable iterator producing schedule rows in period order.
#[derive(Debug, Clone)]
pub struct AmortizationRows {
    monthly_rate: Rate,
    payment: Money,
    balance: Money,
    start: YearMonth,
    next_index: u32,
    num_payments: u32,
    settle_at_payoff: bool,
    done: bool,
}

impl AmortizationRows {
    pub(super) fn new(scenario: &LoanScenario, settle_at_payoff: bool) -> LoanResult<Self> {
        let num_payments = scenario.num_payments()?;
        // every row label must be representable
        scenario.start_period.add_months(num_payments)?;

        Ok(AmortizationRows {
            monthly_rate: scenario.monthly_rate(),
            payment: scenario.total_payment()?,
            balance: scenario.principal,
            start: scenario.start_period,
            next_index: 1,
            num_payments,
            settle_at_payoff,
            done: false,
        })
    }
}

impl AmortizationRows {
    fn step(&mut self) -> LoanResult<AmortizationRow> {
        let period_index = self.next_index;
        let period = self.start.add_months(period_index - 1)?;
        let opening = self.balance;

        // past payoff the balance compounds away from zero and can leave the
        // Decimal range on long terms
        let interest_portion = opening
            .checked_mul(self.monthly_rate)
            .ok_or_else(|| overflow_at(period_index))?;
        let mut payment_amount = self.payment;
        let mut principal_portion = payment_amount
            .checked_sub(interest_portion)
            .ok_or_else(|| overflow_at(period_index))?;
        self.balance = opening
            .checked_sub(principal_portion)
            .ok_or_else(|| overflow_at(period_index))?;

        if self.settle_at_payoff && self.balance <= BALANCE_EPSILON {
            principal_portion = opening;
            payment_amount = opening + interest_portion;
            self.balance = Decimal::ZERO;
            self.done = true;
        }

        self.next_index += 1;
        Ok(AmortizationRow {
            period_index,
            period,
            payment_amount,
            principal_portion,
            interest_portion,
            remaining_balance: self.balance,
        })
    }
}

fn overflow_at(period_index: u32) -> LoanError {
    LoanError::overflow(format!("schedule balance at period {period_index}"))
}

/// Yields rows until the term ends (or payoff, for the settling variant).
/// An arithmetic overflow is yielded once as an error, then the iterator
/// is exhausted.
impl Iterator for AmortizationRows {
    type Item = LoanResult<AmortizationRow>;

    fn next(&mut self) -> Option<LoanResult<AmortizationRow>> {
        if self.done || self.next_index > self.num_payments {
            return None;
        }
        if self.settle_at_payoff && self.balance <= BALANCE_EPSILON {
            self.done = true;
            return None;
        }

        let row = self.step();
        if row.is_err() {
            self.done = true;
        }
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.done {
            0
        } else {
            (self.num_payments + 1).saturating_sub(self.next_index) as usize
        };
        // overflow or payoff can end the run early
        if self.settle_at_payoff {
            (0, Some(remaining))
        } else {
            (remaining.min(1), Some(remaining))
        }
    }
}

/// Ordered schedule rows for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub start_period: YearMonth,
    /// Annuity payment before extra payments.
    pub base_payment: Money,
    /// Payment applied to every full row (base + extra).
    pub total_payment: Money,
    pub rows: Vec<AmortizationRow>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_interest_paid(&self) -> Money {
        self.rows.iter().map(|r| r.interest_portion).sum()
    }

    pub fn total_principal_paid(&self) -> Money {
        self.rows.iter().map(|r| r.principal_portion).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.rows.iter().map(|r| r.payment_amount).sum()
    }

    /// Balance after the last row; zero for an empty schedule.
    pub fn final_balance(&self) -> Money {
        self.rows
            .last()
            .map(|r| r.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }

    /// First period whose closing balance is repaid, if any.
    pub fn zero_balance_period(&self) -> Option<u32> {
        self.rows
            .iter()
            .find(|r| r.remaining_balance <= BALANCE_EPSILON)
            .map(|r| r.period_index)
    }

    /// Start period advanced by the number of rows.
    pub fn payoff_date(&self) -> LoanResult<YearMonth> {
        self.start_period.add_months(self.rows.len() as u32)
    }

    /// Rows from `period_index` (1-based) onward.
    pub fn rows_from(&self, period_index: u32) -> &[AmortizationRow] {
        let skip = (period_index.max(1) - 1) as usize;
        self.rows.get(skip..).unwrap_or(&[])
    }
}

/// Sum one column of the rows, or `None` if the total leaves the Decimal range.
fn checked_total(rows: &[AmortizationRow], column: fn(&AmortizationRow) -> Money) -> Option<Money> {
    rows.iter()
        .try_fold(Decimal::ZERO, |acc, row| acc.checked_add(column(row)))
}

fn collect_schedule(scenario: &LoanScenario, rows: AmortizationRows) -> LoanResult<Schedule> {
    let rows = rows.collect::<LoanResult<Vec<_>>>()?;
    // the totals accessors sum without checks
    let columns: [(&str, fn(&AmortizationRow) -> Money); 3] = [
        ("total interest", |r| r.interest_portion),
        ("total principal", |r| r.principal_portion),
        ("total paid", |r| r.payment_amount),
    ];
    for (name, column) in columns {
        if checked_total(&rows, column).is_none() {
            return Err(LoanError::overflow(format!("schedule {name}")));
        }
    }

    Ok(Schedule {
        start_period: scenario.start_period,
        base_payment: scenario.base_payment()?,
        total_payment: scenario.total_payment()?,
        rows,
    })
}

/// Expand a scenario into its full-term schedule.
///
/// Every row uses the same payment (annuity + extra) for all
/// `term_years * 12` periods. With extra payments the balance crosses
/// zero before the last period and the remaining rows carry a negative
/// balance; see [`build_payoff_schedule`] for the variant that stops.
pub fn build_schedule(scenario: &LoanScenario) -> LoanResult<Schedule> {
    let schedule = collect_schedule(scenario, scenario.rows()?)?;
    log::debug!(
        "built schedule: {} rows, payment {}, final balance {}",
        schedule.len(),
        schedule.total_payment,
        schedule.final_balance()
    );
    Ok(schedule)
}

/// Expand a scenario into a schedule that ends at payoff.
pub fn build_payoff_schedule(scenario: &LoanScenario) -> LoanResult<Schedule> {
    let schedule = collect_schedule(scenario, scenario.payoff_rows()?)?;
    log::debug!(
        "built payoff schedule: {} rows, payment {}",
        schedule.len(),
        schedule.total_payment
    );
    Ok(schedule)
}
