//! Error outcomes returned by the projection engine

use thiserror::Error;

use crate::payoff::PayoffResult;
use crate::retirement::RetirementResult;

/// Tagged outcome for a simulation that did not finish cleanly
///
/// `Incomplete` and `Depleted` still carry the full result computed up to the
/// point of failure so callers can render it alongside a warning.
#[derive(Debug, Clone, Error)]
pub enum SimulationError {
    /// Inputs violate a numeric or ordering constraint
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A debt can never amortize because its minimum payment does not exceed its interest
    #[error(
        "debt {debt_id} never amortizes: minimum payment {payment:.2} does not exceed monthly interest {interest:.2}"
    )]
    NonConvergent {
        debt_id: String,
        payment: f64,
        interest: f64,
    },

    /// The month cap was reached with balance remaining
    #[error("payoff incomplete after {months} months: {remaining_balance:.2} still outstanding")]
    Incomplete {
        months: u32,
        remaining_balance: f64,
        partial: Box<PayoffResult>,
    },

    /// Retirement savings ran out before life expectancy
    #[error("retirement savings depleted at age {age}")]
    Depleted {
        age: u32,
        result: Box<RetirementResult>,
    },
}

impl SimulationError {
    /// Short machine-readable tag for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            SimulationError::InvalidInput(_) => "invalidInput",
            SimulationError::NonConvergent { .. } => "nonConvergent",
            SimulationError::Incomplete { .. } => "incomplete",
            SimulationError::Depleted { .. } => "depleted",
        }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;

/// Reject a negative or non-finite amount
pub(crate) fn ensure_non_negative(label: &str, value: f64) -> SimulationResult<()> {
    if !value.is_finite() {
        return Err(SimulationError::InvalidInput(format!("{label} must be finite, got {value}")));
    }
    if value < 0.0 {
        return Err(SimulationError::InvalidInput(format!("{label} must be non-negative, got {value}")));
    }
    Ok(())
}
