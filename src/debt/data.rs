//! Debt snapshot records supplied by the caller

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, SimulationError, SimulationResult};

/// Category of the liability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    CreditCard,
    PersonalLoan,
    StudentLoan,
    Mortgage,
    AutoLoan,
    #[default]
    Other,
}

impl DebtKind {
    /// Parse the snake_case tag used in data files
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "credit_card" => Some(DebtKind::CreditCard),
            "personal_loan" => Some(DebtKind::PersonalLoan),
            "student_loan" => Some(DebtKind::StudentLoan),
            "mortgage" => Some(DebtKind::Mortgage),
            "auto_loan" => Some(DebtKind::AutoLoan),
            "other" | "" => Some(DebtKind::Other),
            _ => None,
        }
    }
}

/// A single outstanding debt at the start of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    /// Opaque unique identifier
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub kind: DebtKind,

    /// Current outstanding principal
    pub balance: f64,

    /// Annual percentage rate, e.g. `19.99`
    pub annual_interest_rate_percent: f64,

    /// Required monthly payment
    pub minimum_payment: f64,

    /// Amount originally borrowed
    pub original_amount: f64,

    #[serde(default)]
    pub lender: Option<String>,

    /// Day of month the payment is due (1-31)
    #[serde(default = "default_due_day")]
    pub due_day: u8,
}

fn default_due_day() -> u8 {
    1
}

impl Debt {
    /// Create a debt whose original amount equals its current balance
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        balance: f64,
        annual_interest_rate_percent: f64,
        minimum_payment: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: DebtKind::Other,
            balance,
            annual_interest_rate_percent,
            minimum_payment,
            original_amount: balance,
            lender: None,
            due_day: default_due_day(),
        }
    }

    pub fn with_kind(mut self, kind: DebtKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_original_amount(mut self, original_amount: f64) -> Self {
        self.original_amount = original_amount;
        self
    }

    pub fn with_lender(mut self, lender: impl Into<String>) -> Self {
        self.lender = Some(lender.into());
        self
    }

    /// Share of the original amount already repaid, 0-100
    ///
    /// A debt with no original amount has nothing left to repay and reports 100.
    pub fn progress_percent(&self) -> f64 {
        if self.original_amount <= 0.0 {
            return 100.0;
        }
        ((self.original_amount - self.balance) / self.original_amount * 100.0).clamp(0.0, 100.0)
    }

    /// Check the numeric invariants of a single debt
    pub fn validate(&self) -> SimulationResult<()> {
        if self.id.trim().is_empty() {
            return Err(SimulationError::InvalidInput("debt id must not be empty".to_string()));
        }
        ensure_non_negative(&format!("debt {} balance", self.id), self.balance)?;
        ensure_non_negative(
            &format!("debt {} interest rate", self.id),
            self.annual_interest_rate_percent,
        )?;
        ensure_non_negative(&format!("debt {} minimum payment", self.id), self.minimum_payment)?;
        ensure_non_negative(&format!("debt {} original amount", self.id), self.original_amount)?;

        // Tolerate cent-level rounding between the two figures
        if self.balance > self.original_amount + 0.005 {
            return Err(SimulationError::InvalidInput(format!(
                "debt {} balance {:.2} exceeds original amount {:.2}",
                self.id, self.balance, self.original_amount
            )));
        }
        if !(1..=31).contains(&self.due_day) {
            return Err(SimulationError::InvalidInput(format!(
                "debt {} due day {} is outside 1-31",
                self.id, self.due_day
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(DebtKind::from_tag("credit_card"), Some(DebtKind::CreditCard));
        assert_eq!(DebtKind::from_tag(" auto_loan "), Some(DebtKind::AutoLoan));
        assert_eq!(DebtKind::from_tag(""), Some(DebtKind::Other));
        assert_eq!(DebtKind::from_tag("payday"), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Debt::new("a", "Card", 1000.0, 24.0, 50.0).validate().is_ok());
        assert!(Debt::new("a", "Card", -1.0, 24.0, 50.0).validate().is_err());
        assert!(Debt::new("a", "Card", 1000.0, -2.0, 50.0).validate().is_err());
        assert!(Debt::new("a", "Card", 1000.0, 24.0, -50.0).validate().is_err());
        assert!(Debt::new(" ", "Card", 1000.0, 24.0, 50.0).validate().is_err());

        let grown = Debt::new("a", "Card", 1000.0, 24.0, 50.0).with_original_amount(900.0);
        assert!(grown.validate().is_err());

        let mut late = Debt::new("a", "Card", 1000.0, 24.0, 50.0);
        late.due_day = 0;
        assert!(late.validate().is_err());
    }

    #[test]
    fn test_progress_percent() {
        let car = Debt::new("car", "Car", 9_000.0, 6.5, 250.0).with_original_amount(12_000.0);
        assert!((car.progress_percent() - 25.0).abs() < 1e-12);

        assert_eq!(Debt::new("new", "New", 500.0, 10.0, 25.0).progress_percent(), 0.0);
        let closed = Debt::new("done", "Done", 0.0, 10.0, 25.0).with_original_amount(800.0);
        assert_eq!(closed.progress_percent(), 100.0);
        assert_eq!(Debt::new("empty", "Empty", 0.0, 0.0, 0.0).progress_percent(), 100.0);
    }

    #[test]
    fn test_json_uses_camel_case() {
        let debt = Debt::new("loan-1", "Car", 8000.0, 6.5, 250.0)
            .with_kind(DebtKind::AutoLoan)
            .with_original_amount(12_000.0);
        let json = serde_json::to_value(&debt).unwrap();
        assert_eq!(json["annualInterestRatePercent"], 6.5);
        assert_eq!(json["kind"], "auto_loan");

        let parsed: Debt = serde_json::from_str(
            r#"{"id":"x","name":"Card","balance":10,"annualInterestRatePercent":1,
                "minimumPayment":5,"originalAmount":10}"#,
        )
        .unwrap();
        assert_eq!(parsed.due_day, 1);
        assert_eq!(parsed.kind, DebtKind::Other);
    }
}
