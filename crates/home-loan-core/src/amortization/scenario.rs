use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::time_value;
use crate::types::{Money, Percent, Rate, YearMonth};
use crate::LoanResult;

use super::schedule::AmortizationRows;

/// A fixed set of loan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanScenario {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual rate as a percentage (11.75 = 11.75%).
    pub annual_rate_percent: Percent,
    /// Term in whole years.
    pub term_years: u32,
    /// Flat amount added to every monthly payment.
    #[serde(default)]
    pub extra_monthly_payment: Money,
    /// Month of the first payment; only used for labeling.
    pub start_period: YearMonth,
}

impl LoanScenario {
    pub fn new(
        principal: Money,
        annual_rate_percent: Percent,
        term_years: u32,
        start_period: YearMonth,
    ) -> Self {
        LoanScenario {
            principal,
            annual_rate_percent,
            term_years,
            extra_monthly_payment: Decimal::ZERO,
            start_period,
        }
    }

    pub fn with_extra_payment(self, extra_monthly_payment: Money) -> Self {
        LoanScenario {
            extra_monthly_payment,
            ..self
        }
    }

    pub fn validate(&self) -> LoanResult<()> {
        if self.principal < Decimal::ZERO {
            return Err(LoanError::invalid("principal", "Loan amount cannot be negative"));
        }
        if self.annual_rate_percent < Decimal::ZERO {
            return Err(LoanError::invalid(
                "annual_rate_percent",
                "Interest rate cannot be negative",
            ));
        }
        if self.term_years == 0 {
            return Err(LoanError::invalid("term_years", "Loan term must be at least 1 year"));
        }
        if self.extra_monthly_payment < Decimal::ZERO {
            return Err(LoanError::invalid(
                "extra_monthly_payment",
                "Extra monthly payment cannot be negative",
            ));
        }
        Ok(())
    }

    pub fn monthly_rate(&self) -> Rate {
        time_value::monthly_rate(self.annual_rate_percent)
    }

    pub fn num_payments(&self) -> LoanResult<u32> {
        time_value::num_payments(self.term_years)
    }

    /// Annuity payment before any extra payment.
    pub fn base_payment(&self) -> LoanResult<Money> {
        time_value::monthly_payment(self.principal, self.annual_rate_percent, self.term_years)
    }

    /// Base payment plus the flat extra payment.
    pub fn total_payment(&self) -> LoanResult<Money> {
        time_value::total_monthly_payment(
            self.principal,
            self.annual_rate_percent,
            self.term_years,
            self.extra_monthly_payment,
        )
    }

    /// Row iterator over the full term. Each call starts from period 1.
    pub fn rows(&self) -> LoanResult<AmortizationRows> {
        self.validate()?;
        AmortizationRows::new(self, false)
    }

    /// Row iterator that stops once the balance is repaid, settling the
    /// final payment to exactly the outstanding balance plus interest.
    pub fn payoff_rows(&self) -> LoanResult<AmortizationRows> {
        self.validate()?;
        AmortizationRows::new(self, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn scenario() -> LoanScenario {
        LoanScenario::new(dec!(1000000), dec!(11.75), 20, YearMonth::new(2023, 9).unwrap())
    }

    #[test]
    fn test_derived_values() {
        let s = scenario();
        assert_eq!(s.num_payments().unwrap(), 240);
        assert_eq!(s.monthly_rate(), dec!(11.75) / dec!(1200));
        let base = s.base_payment().unwrap();
        let with_extra = s.clone().with_extra_payment(dec!(500));
        assert_eq!(with_extra.total_payment().unwrap(), base + dec!(500));
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut s = scenario();
        s.principal = dec!(-1);
        assert!(s.validate().is_err());

        let mut s = scenario();
        s.annual_rate_percent = dec!(-2);
        assert!(s.validate().is_err());

        let mut s = scenario();
        s.term_years = 0;
        assert!(s.validate().is_err());

        let s = scenario().with_extra_payment(dec!(-10));
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults_extra_payment() {
        let json = r#"{
            "principal": "250000",
            "annual_rate_percent": "9.5",
            "term_years": 30,
            "start_period": "2024-01"
        }"#;
        let s: LoanScenario = serde_json::from_str(json).unwrap();
        assert_eq!(s.extra_monthly_payment, Decimal::ZERO);
        assert_eq!(s.start_period, YearMonth::new(2024, 1).unwrap());
    }
}
