//! Models for the savings balance needed at retirement

use super::RetirementProfile;

/// Computes the target balance at the start of retirement
///
/// Implement this trait to swap in a different retirement-needs model.
pub trait NestEggModel {
    /// Balance needed at retirement to fund `annual_withdrawal` for the
    /// profile's years in retirement
    fn required_nest_egg(&self, profile: &RetirementProfile, annual_withdrawal: f64) -> f64;
}

/// Flat multiple of the yearly withdrawal
///
/// Ignores investment growth during drawdown, so it overstates the need
/// when returns are positive.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelWithdrawal;

impl NestEggModel for LevelWithdrawal {
    fn required_nest_egg(&self, profile: &RetirementProfile, annual_withdrawal: f64) -> f64 {
        annual_withdrawal * profile.years_in_retirement() as f64
    }
}

/// Present value of end-of-year withdrawals discounted at the expected return
///
/// Matches the drawdown loop exactly: a starting balance equal to this value
/// reaches zero at the end of the final retirement year.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueAnnuity;

impl NestEggModel for PresentValueAnnuity {
    fn required_nest_egg(&self, profile: &RetirementProfile, annual_withdrawal: f64) -> f64 {
        let rate = profile.expected_annual_return_percent / 100.0;
        let years = profile.years_in_retirement() as f64;
        if rate.abs() < 1e-12 {
            return annual_withdrawal * years;
        }
        annual_withdrawal * (1.0 - (1.0 + rate).powf(-years)) / rate
    }
}
