//! Retirement accumulation and drawdown projection

mod allocation;
mod profile;
mod nest_egg;
mod engine;
mod result;

pub use allocation::{AssetAllocation, RiskProfile};
pub use profile::{RetirementProfile, MAX_LIFE_EXPECTANCY};
pub use nest_egg::{LevelWithdrawal, NestEggModel, PresentValueAnnuity};
pub use engine::{project_retirement, RetirementProjector};
pub use result::{Phase, RetirementResult, YearBalance};
