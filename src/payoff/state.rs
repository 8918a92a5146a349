//! Working state of a payoff run

use crate::amortization::PaymentSplit;
use crate::debt::Debt;

use super::schedule::{BalancePoint, RunTrace, ScheduleEntry};

/// Whether the month loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    Running,
    Done,
}

/// Mutable balances for one run
///
/// Balances are indexed like the caller's debt slice. The caller's debts are
/// never touched.
#[derive(Debug, Clone)]
pub struct PayoffState {
    /// Current simulation month (0 before the first month)
    pub month: u32,

    balances: Vec<f64>,

    /// Minimum payments released by debts paid off so far
    pub freed_minimums: f64,

    trace: RunTrace,
}

impl PayoffState {
    /// Start a run from the debts' current balances
    ///
    /// Debts that are already at zero go straight into the payoff order, in
    /// priority order.
    pub fn from_debts(debts: &[Debt], order: &[usize]) -> Self {
        let balances: Vec<f64> = debts.iter().map(|d| d.balance.max(0.0)).collect();
        let mut trace = RunTrace::default();
        for &idx in order {
            if balances[idx] <= 0.0 {
                trace.payoff_order.push(debts[idx].id.clone());
            }
        }

        Self {
            month: 0,
            balances,
            freed_minimums: 0.0,
            trace,
        }
    }

    pub fn balance(&self, idx: usize) -> f64 {
        self.balances[idx]
    }

    pub fn total_balance(&self) -> f64 {
        self.balances.iter().sum()
    }

    pub fn has_balance(&self) -> bool {
        self.balances.iter().any(|&b| b > 0.0)
    }

    pub fn phase(&self, max_months: u32) -> SimulationPhase {
        if self.has_balance() && self.month < max_months {
            SimulationPhase::Running
        } else {
            SimulationPhase::Done
        }
    }

    /// Advance to the next month
    pub fn advance_month(&mut self) {
        self.month += 1;
    }

    /// Record one debt's payment for the current month
    pub fn record_payment(
        &mut self,
        idx: usize,
        debt: &Debt,
        split: PaymentSplit,
        label: Option<String>,
    ) {
        let was_active = self.balances[idx] > 0.0;
        self.balances[idx] = split.new_balance;

        self.trace.schedule.push(ScheduleEntry {
            month: self.month,
            debt_id: debt.id.clone(),
            debt_name: debt.name.clone(),
            label,
            payment: split.payment,
            principal: split.principal,
            interest: split.interest,
            remaining_balance: split.new_balance,
        });

        if was_active && split.new_balance <= 0.0 {
            self.trace.payoff_order.push(debt.id.clone());
            self.freed_minimums += debt.minimum_payment;
        }
    }

    /// Close the current month with an aggregate balance point
    pub fn close_month(&mut self, label: Option<String>) {
        let total_balance = self.total_balance();
        self.trace.balance_series.push(BalancePoint {
            month: self.month,
            label,
            total_balance,
        });
    }

    pub(crate) fn into_trace(mut self) -> RunTrace {
        self.trace.months = self.month;
        self.trace
    }
}
