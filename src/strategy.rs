//! Priority ordering for debt payoff strategies

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::debt::Debt;

/// Which debt receives the extra payment first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoffStrategy {
    /// Highest interest rate first, smaller balance breaks ties
    #[default]
    Avalanche,
    /// Smallest balance first, higher rate breaks ties
    Snowball,
}

impl PayoffStrategy {
    pub const ALL: [PayoffStrategy; 2] = [PayoffStrategy::Avalanche, PayoffStrategy::Snowball];

    pub fn as_str(&self) -> &'static str {
        match self {
            PayoffStrategy::Avalanche => "avalanche",
            PayoffStrategy::Snowball => "snowball",
        }
    }

    fn compare(&self, a: &Debt, b: &Debt) -> Ordering {
        let by_rate = b
            .annual_interest_rate_percent
            .total_cmp(&a.annual_interest_rate_percent);
        let by_balance = a.balance.total_cmp(&b.balance);
        match self {
            PayoffStrategy::Avalanche => by_rate.then(by_balance),
            PayoffStrategy::Snowball => by_balance.then(by_rate),
        }
    }
}

impl fmt::Display for PayoffStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PayoffStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avalanche" => Ok(PayoffStrategy::Avalanche),
            "snowball" => Ok(PayoffStrategy::Snowball),
            other => Err(format!("unknown payoff strategy: {other}")),
        }
    }
}

/// Rank debts once for the whole run
///
/// Returns indices into `debts` in priority order. The sort is stable, so
/// debts that tie on both keys keep their input order.
pub fn priority_order(debts: &[Debt], strategy: PayoffStrategy) -> Vec<usize> {
    let mut order: Vec<usize> = (0..debts.len()).collect();
    order.sort_by(|&a, &b| strategy.compare(&debts[a], &debts[b]));
    order
}
