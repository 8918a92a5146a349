//! Month-by-month multi-debt amortization loop

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::amortization::{apply_payment, monthly_interest};
use crate::debt::Debt;
use crate::error::{ensure_non_negative, SimulationError, SimulationResult};
use crate::strategy::{priority_order, PayoffStrategy};

use super::schedule::{assemble, PayoffResult};
use super::state::{PayoffState, SimulationPhase};

/// Hard cap on simulated months (30 years)
pub const DEFAULT_MAX_MONTHS: u32 = 360;

/// How the monthly budget is spread across debts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffPolicy {
    pub strategy: PayoffStrategy,

    /// Paid on top of the minimum to the highest-priority debt with balance
    #[serde(default)]
    pub extra_monthly_payment: f64,
}

impl PayoffPolicy {
    pub fn new(strategy: PayoffStrategy, extra_monthly_payment: f64) -> Self {
        Self {
            strategy,
            extra_monthly_payment,
        }
    }
}

/// Configuration for a payoff run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffConfig {
    /// Number of months to simulate before giving up
    pub max_months: u32,

    /// Add each paid-off debt's minimum to the extra payment from the next month
    pub roll_minimums_forward: bool,

    /// Date the snapshot was taken; month `n` is labelled `n` calendar months later
    pub as_of: Option<NaiveDate>,
}

impl Default for PayoffConfig {
    fn default() -> Self {
        Self {
            max_months: DEFAULT_MAX_MONTHS,
            roll_minimums_forward: false,
            as_of: None,
        }
    }
}

/// Debt payoff simulator
#[derive(Debug, Clone, Default)]
pub struct PayoffEngine {
    config: PayoffConfig,
}

impl PayoffEngine {
    pub fn new(config: PayoffConfig) -> Self {
        Self { config }
    }

    /// Run the simulation to payoff or the month cap
    pub fn simulate(&self, debts: &[Debt], policy: &PayoffPolicy) -> SimulationResult<PayoffResult> {
        validate(debts, policy)?;

        let order = priority_order(debts, policy.strategy);
        self.check_convergence(debts, &order)?;

        let mut state = PayoffState::from_debts(debts, &order);
        while state.phase(self.config.max_months) == SimulationPhase::Running {
            state.advance_month();
            self.simulate_month(debts, &order, policy, &mut state);
        }

        let remaining_balance = state.total_balance();
        let has_balance = state.has_balance();
        let result = assemble(
            policy.strategy,
            policy.extra_monthly_payment,
            debts,
            &order,
            state.into_trace(),
        );

        if has_balance {
            return Err(SimulationError::Incomplete {
                months: result.total_months,
                remaining_balance,
                partial: Box::new(result),
            });
        }
        Ok(result)
    }

    /// Reject runs where some debt's minimum never reduces principal
    ///
    /// Every active debt receives at least its minimum each month, so a
    /// minimum at or below the first month's interest would leave that debt
    /// in negative amortization until the extra reaches it. Balances only
    /// fall when the minimum covers interest, so checking month one suffices.
    fn check_convergence(&self, debts: &[Debt], order: &[usize]) -> SimulationResult<()> {
        for &idx in order {
            let debt = &debts[idx];
            if debt.balance <= 0.0 {
                continue;
            }

            let interest = monthly_interest(debt.balance, debt.annual_interest_rate_percent);
            let split = apply_payment(debt.balance, debt.minimum_payment, interest);
            if split.is_negative_amortization() || split.principal <= 0.0 {
                return Err(SimulationError::NonConvergent {
                    debt_id: debt.id.clone(),
                    payment: debt.minimum_payment,
                    interest,
                });
            }
        }
        Ok(())
    }

    /// Pay every active debt for one month
    fn simulate_month(
        &self,
        debts: &[Debt],
        order: &[usize],
        policy: &PayoffPolicy,
        state: &mut PayoffState,
    ) {
        let label = self.month_label(state.month);

        let mut extra = policy.extra_monthly_payment;
        if self.config.roll_minimums_forward {
            extra += state.freed_minimums;
        }
        let mut extra_applied = false;

        for &idx in order {
            let balance = state.balance(idx);
            if balance <= 0.0 {
                continue;
            }

            let debt = &debts[idx];
            let interest = monthly_interest(balance, debt.annual_interest_rate_percent);

            // Only the first active debt in priority order gets the extra
            let mut payment = debt.minimum_payment;
            if !extra_applied {
                payment += extra;
                extra_applied = true;
            }

            let split = apply_payment(balance, payment, interest);
            state.record_payment(idx, debt, split, label.clone());
        }

        state.close_month(label);
    }

    /// Calendar label for a simulation month, e.g. `Nov 26`
    fn month_label(&self, month: u32) -> Option<String> {
        let as_of = self.config.as_of?;
        NaiveDate::from_ymd_opt(as_of.year(), as_of.month(), 1)?
            .checked_add_months(Months::new(month))
            .map(|d| d.format("%b %y").to_string())
    }
}

/// Check debts and policy before simulating
fn validate(debts: &[Debt], policy: &PayoffPolicy) -> SimulationResult<()> {
    ensure_non_negative("extra monthly payment", policy.extra_monthly_payment)?;

    let mut seen = HashSet::new();
    for debt in debts {
        debt.validate()?;
        if !seen.insert(debt.id.as_str()) {
            return Err(SimulationError::InvalidInput(format!(
                "duplicate debt id: {}",
                debt.id
            )));
        }
    }
    Ok(())
}

/// Simulate payoff with the default 360-month configuration
pub fn simulate_payoff(debts: &[Debt], policy: &PayoffPolicy) -> SimulationResult<PayoffResult> {
    PayoffEngine::default().simulate(debts, policy)
}

/// Simulate payoff with an explicit configuration
pub fn simulate_payoff_with(
    debts: &[Debt],
    policy: &PayoffPolicy,
    config: &PayoffConfig,
) -> SimulationResult<PayoffResult> {
    PayoffEngine::new(config.clone()).simulate(debts, policy)
}
