//! Payoff output structures and result assembly

use serde::{Deserialize, Serialize};

use crate::debt::Debt;
use crate::strategy::PayoffStrategy;

/// One debt's payment in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    /// Simulation month (1-indexed)
    pub month: u32,
    pub debt_id: String,
    pub debt_name: String,
    /// Calendar label such as `Nov 26`, present when the run has an as-of date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Amount actually applied this month
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

/// Sum of all debt balances at the end of a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancePoint {
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub total_balance: f64,
}

/// Sub-schedule and totals for a single debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtSchedule {
    pub debt_id: String,
    pub debt_name: String,
    /// Position in the run's priority order (0 = receives the extra first)
    pub priority: usize,
    pub starting_balance: f64,
    pub ending_balance: f64,
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_paid: f64,
    /// Month the balance reached zero, if it did
    pub payoff_month: Option<u32>,
    pub entries: Vec<ScheduleEntry>,
}

/// Complete debt payoff simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffResult {
    pub strategy: PayoffStrategy,
    pub extra_monthly_payment: f64,

    /// Months simulated
    pub total_months: u32,

    pub total_interest: f64,
    pub total_paid: f64,

    /// Sum of all balances before month 1
    pub starting_balance: f64,

    /// Every payment, month-major, priority order within a month
    pub schedule: Vec<ScheduleEntry>,

    /// Aggregate balance after each month
    pub balance_series: Vec<BalancePoint>,

    /// Debt ids in the order they reached zero
    pub payoff_order: Vec<String>,

    /// Per-debt sub-schedules in priority order
    pub debts: Vec<DebtSchedule>,
}

impl PayoffResult {
    /// Balance still outstanding at the end of the run
    pub fn remaining_balance(&self) -> f64 {
        self.balance_series
            .last()
            .map(|p| p.total_balance)
            .unwrap_or(self.starting_balance)
    }

    /// Whether every debt reached zero
    pub fn is_paid_off(&self) -> bool {
        self.remaining_balance() <= 0.0
    }

    /// Sub-schedule for one debt
    pub fn debt(&self, debt_id: &str) -> Option<&DebtSchedule> {
        self.debts.iter().find(|d| d.debt_id == debt_id)
    }

    /// Schedule rows for a single month
    pub fn month(&self, month: u32) -> impl Iterator<Item = &ScheduleEntry> {
        self.schedule.iter().filter(move |e| e.month == month)
    }

    /// Get summary statistics
    pub fn summary(&self) -> PayoffSummary {
        PayoffSummary {
            strategy: self.strategy,
            extra_monthly_payment: self.extra_monthly_payment,
            total_months: self.total_months,
            total_interest: self.total_interest,
            total_paid: self.total_paid,
            remaining_balance: self.remaining_balance(),
            paid_off: self.is_paid_off(),
        }
    }
}

/// Headline figures for a payoff run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffSummary {
    pub strategy: PayoffStrategy,
    pub extra_monthly_payment: f64,
    pub total_months: u32,
    pub total_interest: f64,
    pub total_paid: f64,
    pub remaining_balance: f64,
    pub paid_off: bool,
}

/// Raw trajectory produced by the simulator loop
#[derive(Debug, Clone, Default)]
pub(crate) struct RunTrace {
    pub months: u32,
    pub schedule: Vec<ScheduleEntry>,
    pub balance_series: Vec<BalancePoint>,
    pub payoff_order: Vec<String>,
}

/// Package a finished trace into the output contract
///
/// Only reshapes and sums what the simulator recorded; nothing is recomputed.
pub(crate) fn assemble(
    strategy: PayoffStrategy,
    extra_monthly_payment: f64,
    debts: &[Debt],
    order: &[usize],
    trace: RunTrace,
) -> PayoffResult {
    let total_interest: f64 = trace.schedule.iter().map(|e| e.interest).sum();
    let total_paid: f64 = trace.schedule.iter().map(|e| e.payment).sum();
    let starting_balance: f64 = debts.iter().map(|d| d.balance).sum();

    let per_debt = order
        .iter()
        .enumerate()
        .map(|(priority, &idx)| debt_schedule(&debts[idx], priority, &trace.schedule))
        .collect();

    PayoffResult {
        strategy,
        extra_monthly_payment,
        total_months: trace.months,
        total_interest,
        total_paid,
        starting_balance,
        schedule: trace.schedule,
        balance_series: trace.balance_series,
        payoff_order: trace.payoff_order,
        debts: per_debt,
    }
}

fn debt_schedule(debt: &Debt, priority: usize, schedule: &[ScheduleEntry]) -> DebtSchedule {
    let entries: Vec<ScheduleEntry> = schedule
        .iter()
        .filter(|e| e.debt_id == debt.id)
        .cloned()
        .collect();

    let ending_balance = entries.last().map(|e| e.remaining_balance).unwrap_or(debt.balance);
    let payoff_month = entries
        .iter()
        .find(|e| e.remaining_balance <= 0.0)
        .map(|e| e.month);

    DebtSchedule {
        debt_id: debt.id.clone(),
        debt_name: debt.name.clone(),
        priority,
        starting_balance: debt.balance,
        ending_balance,
        total_principal: entries.iter().map(|e| e.principal).sum(),
        total_interest: entries.iter().map(|e| e.interest).sum(),
        total_paid: entries.iter().map(|e| e.payment).sum(),
        payoff_month,
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month: u32, debt_id: &str, payment: f64, principal: f64, interest: f64, remaining: f64) -> ScheduleEntry {
        ScheduleEntry {
            month,
            debt_id: debt_id.to_string(),
            debt_name: debt_id.to_uppercase(),
            label: None,
            payment,
            principal,
            interest,
            remaining_balance: remaining,
        }
    }

    #[test]
    fn test_assemble_groups_by_debt_and_sums_totals() {
        let debts = vec![
            Debt::new("a", "A", 100.0, 12.0, 60.0),
            Debt::new("b", "B", 50.0, 24.0, 51.0),
        ];
        let trace = RunTrace {
            months: 2,
            schedule: vec![
                entry(1, "b", 51.0, 50.0, 1.0, 0.0),
                entry(1, "a", 60.0, 59.0, 1.0, 41.0),
                entry(2, "a", 41.41, 41.0, 0.41, 0.0),
            ],
            balance_series: vec![
                BalancePoint { month: 1, label: None, total_balance: 41.0 },
                BalancePoint { month: 2, label: None, total_balance: 0.0 },
            ],
            payoff_order: vec!["b".to_string(), "a".to_string()],
        };

        let result = assemble(PayoffStrategy::Avalanche, 0.0, &debts, &[1, 0], trace);

        assert_eq!(result.total_months, 2);
        assert!((result.total_interest - 2.41).abs() < 1e-9);
        assert!((result.total_paid - 152.41).abs() < 1e-9);
        assert_eq!(result.starting_balance, 150.0);
        assert!(result.is_paid_off());

        assert_eq!(result.debts[0].debt_id, "b");
        assert_eq!(result.debts[0].priority, 0);
        assert_eq!(result.debts[0].payoff_month, Some(1));

        let a = result.debt("a").unwrap();
        assert_eq!(a.entries.len(), 2);
        assert_eq!(a.total_principal, 100.0);
        assert_eq!(a.payoff_month, Some(2));
        assert_eq!(result.month(1).count(), 2);
    }

    #[test]
    fn test_empty_trace_keeps_starting_balance() {
        let debts = vec![Debt::new("a", "A", 100.0, 12.0, 60.0)];
        let result = assemble(PayoffStrategy::Snowball, 25.0, &debts, &[0], RunTrace::default());
        assert_eq!(result.remaining_balance(), 100.0);
        assert!(!result.is_paid_off());
        assert_eq!(result.debts[0].ending_balance, 100.0);
        assert_eq!(result.debts[0].payoff_month, None);
    }
}
