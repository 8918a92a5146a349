//! Retirement projection output structures

use serde::{Deserialize, Serialize};

/// Which loop produced a trajectory point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accumulation,
    Drawdown,
}

/// Balance at the end of the year spent at `age`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearBalance {
    pub age: u32,
    pub balance: f64,
    pub phase: Phase,
}

/// Complete retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementResult {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,

    pub projected_balance_at_retirement: f64,
    pub required_nest_egg: f64,

    /// Contribution that would reach the nest egg; zero when already on track
    pub required_monthly_contribution: f64,
    pub on_track: bool,

    /// Projected balance as a share of the nest egg, capped at 100
    pub percentage_to_goal: f64,

    pub monthly_income_gap: f64,
    pub annual_withdrawal: f64,
    pub real_annual_return_percent: f64,

    /// One point per age from current age through life expectancy
    pub trajectory: Vec<YearBalance>,

    /// First age at which withdrawals could not be fully funded
    pub depletion_age: Option<u32>,
}

impl RetirementResult {
    /// Balance left at life expectancy
    pub fn final_balance(&self) -> f64 {
        self.trajectory.last().map(|p| p.balance).unwrap_or(0.0)
    }

    /// Trajectory point for one age
    pub fn at_age(&self, age: u32) -> Option<&YearBalance> {
        self.trajectory.iter().find(|p| p.age == age)
    }
}
