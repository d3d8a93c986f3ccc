use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LoanError;
use crate::LoanResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Annual rates as quoted to borrowers (11.75 = 11.75%).
pub type Percent = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// A calendar month, used to label schedule periods.
///
/// Serialised as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> LoanResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(YearMonth)
            .ok_or_else(|| LoanError::InvalidScenario {
                field: "start_period".into(),
                reason: format!("{year}-{month:02} is not a valid calendar month"),
            })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> LoanResult<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn add_months(&self, months: u32) -> LoanResult<Self> {
        self.0
            .checked_add_months(Months::new(months))
            .map(YearMonth)
            .ok_or_else(|| {
                LoanError::DateError(format!("{self} + {months} months is out of range"))
            })
    }

    /// Long label, e.g. "September 2023".
    pub fn long_label(&self) -> String {
        self.0.format("%B %Y").to_string()
    }

    /// Short label, e.g. "Sep 2043".
    pub fn short_label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LoanError::InvalidScenario {
            field: "start_period".into(),
            reason: format!("'{s}' is not in YYYY-MM form"),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_parse_and_display() {
        let ym: YearMonth = "2023-09".parse().unwrap();
        assert_eq!(ym.year(), 2023);
        assert_eq!(ym.month(), 9);
        assert_eq!(ym.to_string(), "2023-09");
        assert_eq!(ym.long_label(), "September 2023");
        assert_eq!(ym.short_label(), "Sep 2023");
    }

    #[test]
    fn test_year_month_rejects_bad_month() {
        assert!(YearMonth::new(2023, 13).is_err());
        assert!(YearMonth::new(2023, 0).is_err());
        assert!("2023/09".parse::<YearMonth>().is_err());
        assert!("2023-xx".parse::<YearMonth>().is_err());
    }

    #[test]
    fn test_add_months_rolls_year() {
        let ym = YearMonth::new(2023, 11).unwrap();
        let later = ym.add_months(3).unwrap();
        assert_eq!(later, YearMonth::new(2024, 2).unwrap());
        let payoff = YearMonth::new(2023, 1).unwrap().add_months(240).unwrap();
        assert_eq!(payoff.to_string(), "2043-01");
    }

    #[test]
    fn test_year_month_serde_as_string() {
        let ym = YearMonth::new(2024, 3).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, "\"2024-03\"");
        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);
    }
}
