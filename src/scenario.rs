//! Scenario runner for comparing payoff plans
//!
//! Wraps the payoff engine for the questions a dashboard asks side by side:
//! avalanche against snowball, the benefit over paying minimums only, and how
//! results move as the extra payment changes.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::debt::Debt;
use crate::error::{SimulationError, SimulationResult};
use crate::payoff::{PayoffConfig, PayoffEngine, PayoffPolicy, PayoffResult, PayoffSummary};
use crate::strategy::PayoffStrategy;

/// Outstanding totals across a set of debts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtTotals {
    pub debt_count: usize,
    pub total_balance: f64,
    pub total_minimum_payment: f64,
    /// Plain mean of the annual rates, 0 when there are no debts
    pub average_rate_percent: f64,
}

pub fn debt_totals(debts: &[Debt]) -> DebtTotals {
    let total_balance = debts.iter().map(|d| d.balance).sum();
    let total_minimum_payment = debts.iter().map(|d| d.minimum_payment).sum();
    let average_rate_percent = if debts.is_empty() {
        0.0
    } else {
        debts.iter().map(|d| d.annual_interest_rate_percent).sum::<f64>() / debts.len() as f64
    };

    DebtTotals {
        debt_count: debts.len(),
        total_balance,
        total_minimum_payment,
        average_rate_percent,
    }
}

/// Whether a run cleared every balance or stopped at the month cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    PaidOff,
    Incomplete,
}

/// One strategy's run; `result` is the partial schedule when incomplete
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRun {
    pub status: RunStatus,
    pub result: PayoffResult,
}

impl StrategyRun {
    /// Keep capped runs, pass every other failure through
    fn from_outcome(outcome: SimulationResult<PayoffResult>) -> SimulationResult<Self> {
        match outcome {
            Ok(result) => Ok(Self { status: RunStatus::PaidOff, result }),
            Err(SimulationError::Incomplete { partial, .. }) => Ok(Self {
                status: RunStatus::Incomplete,
                result: *partial,
            }),
            Err(err) => Err(err),
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.status == RunStatus::PaidOff
    }
}

/// Avalanche and snowball results for the same extra payment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyComparison {
    pub selected: PayoffStrategy,
    pub avalanche: StrategyRun,
    pub snowball: StrategyRun,

    /// Selected strategy with no extra payment
    pub minimum_only: PayoffSummary,

    /// Present only when both the selected run and the baseline pay off
    pub interest_saved_vs_minimum: Option<f64>,
    pub months_saved_vs_minimum: Option<i64>,
}

impl StrategyComparison {
    pub fn selected_run(&self) -> &StrategyRun {
        match self.selected {
            PayoffStrategy::Avalanche => &self.avalanche,
            PayoffStrategy::Snowball => &self.snowball,
        }
    }

    /// Strategy that pays off, or the lower total interest when both or
    /// neither do (avalanche on ties)
    pub fn cheaper(&self) -> PayoffStrategy {
        match (self.avalanche.status, self.snowball.status) {
            (RunStatus::Incomplete, RunStatus::PaidOff) => PayoffStrategy::Snowball,
            (RunStatus::PaidOff, RunStatus::Incomplete) => PayoffStrategy::Avalanche,
            _ if self.snowball.result.total_interest < self.avalanche.result.total_interest => {
                PayoffStrategy::Snowball
            }
            _ => PayoffStrategy::Avalanche,
        }
    }
}

/// Outcome of one extra-payment amount in a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepPoint {
    pub extra_monthly_payment: f64,
    /// Present for finished runs and for runs cut off at the month cap
    pub summary: Option<PayoffSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs many payoff simulations with one shared configuration
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: PayoffConfig,
}

impl ScenarioRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PayoffConfig) -> Self {
        Self { config }
    }

    /// Run a single payoff simulation
    pub fn run(&self, debts: &[Debt], policy: &PayoffPolicy) -> SimulationResult<PayoffResult> {
        PayoffEngine::new(self.config.clone()).simulate(debts, policy)
    }

    /// Compare both strategies and the minimum-only baseline
    ///
    /// Runs that hit the month cap are kept with their partial schedule.
    pub fn compare_strategies(
        &self,
        debts: &[Debt],
        extra_monthly_payment: f64,
        selected: PayoffStrategy,
    ) -> SimulationResult<StrategyComparison> {
        let engine = PayoffEngine::new(self.config.clone());
        let run = |strategy, extra| {
            StrategyRun::from_outcome(engine.simulate(debts, &PayoffPolicy::new(strategy, extra)))
        };

        let avalanche = run(PayoffStrategy::Avalanche, extra_monthly_payment)?;
        let snowball = run(PayoffStrategy::Snowball, extra_monthly_payment)?;
        let baseline = run(selected, 0.0)?;
        if !baseline.is_paid_off() {
            log::debug!("minimum-only baseline stops at the {} month cap", self.config.max_months);
        }

        let chosen = match selected {
            PayoffStrategy::Avalanche => &avalanche,
            PayoffStrategy::Snowball => &snowball,
        };
        let comparable = chosen.is_paid_off() && baseline.is_paid_off();
        let interest_saved_vs_minimum = comparable
            .then(|| baseline.result.total_interest - chosen.result.total_interest);
        let months_saved_vs_minimum = comparable
            .then(|| baseline.result.total_months as i64 - chosen.result.total_months as i64);

        log::debug!(
            "compared strategies: avalanche {:.2} interest over {} months, snowball {:.2} over {}",
            avalanche.result.total_interest,
            avalanche.result.total_months,
            snowball.result.total_interest,
            snowball.result.total_months
        );

        Ok(StrategyComparison {
            selected,
            avalanche,
            snowball,
            minimum_only: baseline.result.summary(),
            interest_saved_vs_minimum,
            months_saved_vs_minimum,
        })
    }

    /// Evaluate several extra-payment amounts in parallel
    ///
    /// Points come back in the same order as `amounts`.
    pub fn sweep_extra_payments(
        &self,
        debts: &[Debt],
        strategy: PayoffStrategy,
        amounts: &[f64],
    ) -> Vec<SweepPoint> {
        log::info!("sweeping {} extra payment amounts ({strategy})", amounts.len());

        amounts
            .par_iter()
            .map(|&extra| {
                let engine = PayoffEngine::new(self.config.clone());
                let outcome = engine.simulate(debts, &PayoffPolicy::new(strategy, extra));
                sweep_point(extra, outcome)
            })
            .collect()
    }

    pub fn config(&self) -> &PayoffConfig {
        &self.config
    }
}

fn sweep_point(extra: f64, outcome: SimulationResult<PayoffResult>) -> SweepPoint {
    match outcome {
        Ok(result) => SweepPoint {
            extra_monthly_payment: extra,
            summary: Some(result.summary()),
            error: None,
        },
        Err(err) => {
            let summary = match &err {
                SimulationError::Incomplete { partial, .. } => Some(partial.summary()),
                _ => None,
            };
            SweepPoint {
                extra_monthly_payment: extra,
                summary,
                error: Some(err.to_string()),
            }
        }
    }
}

/// Most amounts a single sweep will evaluate
pub const MAX_SWEEP_POINTS: usize = 1_000;

/// Evenly spaced amounts from `from` to `to` inclusive, at most `MAX_SWEEP_POINTS`
pub fn extra_payment_range(from: f64, to: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || to < from {
        return vec![from];
    }
    // Tolerance keeps `to` when the division lands just under a whole step
    let steps = ((to - from) / step + 1e-9).floor();
    let count = (steps as usize).min(MAX_SWEEP_POINTS - 1);
    (0..=count).map(|i| from + step * i as f64).collect()
}
