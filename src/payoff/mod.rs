//! Debt payoff simulation

mod state;
mod engine;
mod schedule;

pub use state::{PayoffState, SimulationPhase};
pub use engine::{
    simulate_payoff, simulate_payoff_with, PayoffConfig, PayoffEngine, PayoffPolicy,
    DEFAULT_MAX_MONTHS,
};
pub use schedule::{BalancePoint, DebtSchedule, PayoffResult, PayoffSummary, ScheduleEntry};
