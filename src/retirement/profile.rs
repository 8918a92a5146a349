//! Retirement planning inputs

use serde::{Deserialize, Serialize};

use crate::error::{ensure_non_negative, SimulationError, SimulationResult};

/// Oldest age the projector will simulate to
pub const MAX_LIFE_EXPECTANCY: u32 = 150;

/// Savings and income assumptions for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementProfile {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,

    pub current_savings: f64,
    pub monthly_contribution: f64,

    /// Income wanted in retirement, before social security
    pub desired_monthly_income: f64,

    /// Nominal annual return, e.g. `7.0`
    pub expected_annual_return_percent: f64,

    /// Only used to report the real return
    pub annual_inflation_percent: f64,

    #[serde(default)]
    pub social_security_monthly_estimate: f64,
}

impl RetirementProfile {
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    pub fn years_in_retirement(&self) -> u32 {
        self.life_expectancy.saturating_sub(self.retirement_age)
    }

    /// Desired income not covered by social security (negative when it is over-covered)
    pub fn monthly_income_gap(&self) -> f64 {
        self.desired_monthly_income - self.social_security_monthly_estimate
    }

    /// Yearly draw on savings during retirement
    pub fn annual_withdrawal(&self) -> f64 {
        self.monthly_income_gap().max(0.0) * 12.0
    }

    /// Inflation-adjusted annual return in percent
    pub fn real_annual_return_percent(&self) -> f64 {
        let nominal = 1.0 + self.expected_annual_return_percent / 100.0;
        let inflation = 1.0 + self.annual_inflation_percent / 100.0;
        (nominal / inflation - 1.0) * 100.0
    }

    pub fn validate(&self) -> SimulationResult<()> {
        if self.retirement_age <= self.current_age {
            return Err(SimulationError::InvalidInput(format!(
                "retirement age {} must be after current age {}",
                self.retirement_age, self.current_age
            )));
        }
        if self.life_expectancy <= self.retirement_age {
            return Err(SimulationError::InvalidInput(format!(
                "life expectancy {} must be after retirement age {}",
                self.life_expectancy, self.retirement_age
            )));
        }
        if self.life_expectancy > MAX_LIFE_EXPECTANCY {
            return Err(SimulationError::InvalidInput(format!(
                "life expectancy {} exceeds {}",
                self.life_expectancy, MAX_LIFE_EXPECTANCY
            )));
        }

        ensure_non_negative("current savings", self.current_savings)?;
        ensure_non_negative("monthly contribution", self.monthly_contribution)?;
        ensure_non_negative("desired monthly income", self.desired_monthly_income)?;
        ensure_non_negative("social security estimate", self.social_security_monthly_estimate)?;

        for (label, pct) in [
            ("expected annual return", self.expected_annual_return_percent),
            ("annual inflation", self.annual_inflation_percent),
        ] {
            if !pct.is_finite() || pct <= -100.0 {
                return Err(SimulationError::InvalidInput(format!(
                    "{label} must be finite and above -100%, got {pct}"
                )));
            }
        }
        Ok(())
    }
}
