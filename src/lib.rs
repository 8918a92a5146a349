//! Finance Projection - deterministic projection engine for personal-finance planning
//!
//! This library provides:
//! - Multi-debt amortization schedules under avalanche and snowball priority
//! - Retirement accumulation and drawdown projection with a contribution solver
//! - Strategy comparison and extra-payment sweeps over the payoff engine
//!
//! Every simulation is a pure function of its inputs. Nothing is cached or
//! shared between calls.

pub mod amortization;
pub mod debt;
pub mod error;
pub mod payoff;
pub mod retirement;
pub mod scenario;
pub mod strategy;

// Re-export commonly used types
pub use debt::{Debt, DebtKind};
pub use error::{SimulationError, SimulationResult};
pub use payoff::{
    simulate_payoff, simulate_payoff_with, PayoffConfig, PayoffEngine, PayoffPolicy,
    PayoffResult, ScheduleEntry,
};
pub use retirement::{project_retirement, RetirementProfile, RetirementProjector, RetirementResult};
pub use scenario::ScenarioRunner;
pub use strategy::PayoffStrategy;
