//! Two-phase retirement savings projection

use crate::amortization::{compound_monthly, future_value, monthly_rate, sinking_fund_payment};
use crate::error::{SimulationError, SimulationResult};

use super::nest_egg::{LevelWithdrawal, NestEggModel};
use super::profile::RetirementProfile;
use super::result::{Phase, RetirementResult, YearBalance};

/// Retirement projector parameterized by the nest egg model
#[derive(Debug, Clone, Default)]
pub struct RetirementProjector<M = LevelWithdrawal> {
    model: M,
}

impl RetirementProjector<LevelWithdrawal> {
    pub fn new() -> Self {
        Self { model: LevelWithdrawal }
    }
}

impl<M: NestEggModel> RetirementProjector<M> {
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    /// Project savings from the current age through life expectancy
    ///
    /// Running out of money before life expectancy returns `Depleted` with
    /// the full projection attached.
    pub fn project(&self, profile: &RetirementProfile) -> SimulationResult<RetirementResult> {
        profile.validate()?;

        let annual_withdrawal = profile.annual_withdrawal();
        let (trajectory, projected, depletion_age) = run_trajectory(profile, annual_withdrawal);

        let required_nest_egg = self.model.required_nest_egg(profile, annual_withdrawal).max(0.0);
        let on_track = projected >= required_nest_egg;

        let required_monthly_contribution = if on_track {
            0.0
        } else {
            required_contribution(profile, required_nest_egg)
        };

        let percentage_to_goal = if required_nest_egg <= 0.0 {
            100.0
        } else {
            (projected / required_nest_egg * 100.0).min(100.0)
        };

        let result = RetirementResult {
            years_to_retirement: profile.years_to_retirement(),
            years_in_retirement: profile.years_in_retirement(),
            projected_balance_at_retirement: projected,
            required_nest_egg,
            required_monthly_contribution,
            on_track,
            percentage_to_goal,
            monthly_income_gap: profile.monthly_income_gap(),
            annual_withdrawal,
            real_annual_return_percent: profile.real_annual_return_percent(),
            trajectory,
            depletion_age,
        };

        match depletion_age {
            Some(age) => Err(SimulationError::Depleted {
                age,
                result: Box::new(result),
            }),
            None => Ok(result),
        }
    }
}

/// Yearly balances, balance at retirement, and the first underfunded age
fn run_trajectory(
    profile: &RetirementProfile,
    annual_withdrawal: f64,
) -> (Vec<YearBalance>, f64, Option<u32>) {
    let monthly = monthly_rate(profile.expected_annual_return_percent);
    let annual = profile.expected_annual_return_percent / 100.0;

    let mut trajectory =
        Vec::with_capacity((profile.life_expectancy - profile.current_age + 1) as usize);
    let mut balance = profile.current_savings;
    let mut at_retirement = balance;
    let mut depletion_age = None;

    for age in profile.current_age..=profile.life_expectancy {
        let phase = if age < profile.retirement_age {
            for _ in 0..12 {
                balance = compound_monthly(balance, monthly, profile.monthly_contribution);
            }
            if age + 1 == profile.retirement_age {
                at_retirement = balance;
            }
            Phase::Accumulation
        } else {
            let unfloored = balance * (1.0 + annual) - annual_withdrawal;
            if unfloored < 0.0 && depletion_age.is_none() && age < profile.life_expectancy {
                depletion_age = Some(age);
            }
            balance = unfloored.max(0.0);
            Phase::Drawdown
        };

        trajectory.push(YearBalance { age, balance, phase });
    }

    (trajectory, at_retirement, depletion_age)
}

/// Level monthly contribution that reaches `target` by retirement
fn required_contribution(profile: &RetirementProfile, target: f64) -> f64 {
    let rate = monthly_rate(profile.expected_annual_return_percent);
    let months = profile.years_to_retirement() * 12;
    let shortfall = target - future_value(profile.current_savings, rate, months);
    sinking_fund_payment(shortfall, rate, months).max(0.0)
}

/// Project a retirement profile with the level-withdrawal nest egg model
pub fn project_retirement(profile: &RetirementProfile) -> SimulationResult<RetirementResult> {
    RetirementProjector::new().project(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retirement::PresentValueAnnuity;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn profile() -> RetirementProfile {
        RetirementProfile {
            current_age: 35,
            retirement_age: 65,
            life_expectancy: 90,
            current_savings: 150_000.0,
            monthly_contribution: 1_500.0,
            desired_monthly_income: 5_000.0,
            expected_annual_return_percent: 7.0,
            annual_inflation_percent: 3.0,
            social_security_monthly_estimate: 2_000.0,
        }
    }

    #[test]
    fn test_projection_on_track() {
        let result = project_retirement(&profile()).expect("should not deplete");

        assert_eq!(result.years_to_retirement, 30);
        assert_abs_diff_eq!(result.required_nest_egg, 900_000.0);
        assert!(result.projected_balance_at_retirement > result.required_nest_egg);
        assert!(result.on_track);
        assert_eq!(result.required_monthly_contribution, 0.0);
        assert_eq!(result.percentage_to_goal, 100.0);
        assert_eq!(result.depletion_age, None);

        // 35..=90 inclusive
        assert_eq!(result.trajectory.len(), 56);
        assert_eq!(result.at_age(64).unwrap().phase, Phase::Accumulation);
        assert_eq!(result.at_age(65).unwrap().phase, Phase::Drawdown);
        assert_abs_diff_eq!(
            result.at_age(64).unwrap().balance,
            result.projected_balance_at_retirement
        );
    }

    #[test]
    fn test_accumulation_matches_closed_form() {
        let p = profile();
        let result = project_retirement(&p).unwrap();

        let rate = monthly_rate(7.0);
        let n = 360;
        let growth = (1.0 + rate).powi(n);
        let expected = 150_000.0 * growth + 1_500.0 * (growth - 1.0) / rate;
        assert_abs_diff_eq!(result.projected_balance_at_retirement, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_return_zero_contribution_keeps_savings() {
        let p = RetirementProfile {
            current_savings: 10_000.0,
            monthly_contribution: 0.0,
            expected_annual_return_percent: 0.0,
            desired_monthly_income: 0.0,
            social_security_monthly_estimate: 0.0,
            ..profile()
        };
        let result = project_retirement(&p).unwrap();
        assert_eq!(result.projected_balance_at_retirement, 10_000.0);
        assert_eq!(result.final_balance(), 10_000.0);
    }

    #[test]
    fn test_shortfall_solves_for_contribution() {
        let p = RetirementProfile {
            current_savings: 20_000.0,
            monthly_contribution: 200.0,
            ..profile()
        };
        let result = match project_retirement(&p) {
            Err(SimulationError::Depleted { result, .. }) => *result,
            other => panic!("expected depletion, got {:?}", other),
        };
        assert!(!result.on_track);
        assert!(result.percentage_to_goal < 100.0);

        // Contributing the solved amount lands exactly on the nest egg
        let fixed = RetirementProfile {
            monthly_contribution: result.required_monthly_contribution,
            ..p
        };
        let rerun = project_retirement(&fixed).unwrap();
        assert_abs_diff_eq!(
            rerun.projected_balance_at_retirement,
            result.required_nest_egg,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_zero_return_contribution_is_straight_division() {
        let p = RetirementProfile {
            current_age: 55,
            retirement_age: 65,
            life_expectancy: 75,
            current_savings: 0.0,
            monthly_contribution: 0.0,
            desired_monthly_income: 3_000.0,
            expected_annual_return_percent: 0.0,
            annual_inflation_percent: 2.0,
            social_security_monthly_estimate: 2_000.0,
        };
        let err = project_retirement(&p).unwrap_err();
        match err {
            SimulationError::Depleted { age, result } => {
                assert_eq!(age, 65);
                assert_abs_diff_eq!(result.required_nest_egg, 120_000.0);
                assert_abs_diff_eq!(result.required_monthly_contribution, 1_000.0);
            }
            other => panic!("expected depletion, got {:?}", other),
        }
    }

    #[test]
    fn test_depletion_reports_first_underfunded_age() {
        let p = RetirementProfile {
            current_age: 60,
            retirement_age: 65,
            life_expectancy: 95,
            current_savings: 100_000.0,
            monthly_contribution: 0.0,
            desired_monthly_income: 3_000.0,
            expected_annual_return_percent: 0.0,
            annual_inflation_percent: 2.0,
            social_security_monthly_estimate: 1_000.0,
        };
        // 100k covers four 24k withdrawals; the fifth, at 69, cannot be met
        match project_retirement(&p) {
            Err(SimulationError::Depleted { age, result }) => {
                assert_eq!(age, 69);
                assert_eq!(result.depletion_age, Some(69));
                assert_eq!(result.at_age(69).unwrap().balance, 0.0);
                assert!(result.trajectory.iter().all(|y| y.balance >= 0.0));
            }
            other => panic!("expected depletion, got {:?}", other),
        }
    }

    #[test]
    fn test_present_value_model_lowers_target() {
        let p = profile();
        let level = project_retirement(&p).unwrap();
        let pv = RetirementProjector::with_model(PresentValueAnnuity).project(&p).unwrap();
        assert!(pv.required_nest_egg < level.required_nest_egg);
        assert_eq!(pv.projected_balance_at_retirement, level.projected_balance_at_retirement);
    }

    #[test]
    fn test_invalid_profile() {
        let p = RetirementProfile { retirement_age: 30, ..profile() };
        assert!(matches!(project_retirement(&p), Err(SimulationError::InvalidInput(_))));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_on_track_needs_no_contribution(
            current_age in 20u32..60,
            working_years in 1u32..40,
            retired_years in 1u32..40,
            savings in 0u32..2_000_000,
            contribution in 0u32..5_000,
            income in 0u32..10_000,
            return_bp in 0u32..1_200,
        ) {
            let p = RetirementProfile {
                current_age,
                retirement_age: current_age + working_years,
                life_expectancy: current_age + working_years + retired_years,
                current_savings: savings as f64,
                monthly_contribution: contribution as f64,
                desired_monthly_income: income as f64,
                expected_annual_return_percent: return_bp as f64 / 100.0,
                annual_inflation_percent: 2.5,
                social_security_monthly_estimate: 1_000.0,
            };
            let result = match project_retirement(&p) {
                Ok(r) => r,
                Err(SimulationError::Depleted { result, .. }) => *result,
                Err(other) => return Err(proptest::test_runner::TestCaseError::fail(format!("{other:?}"))),
            };

            prop_assert!(result.required_monthly_contribution >= 0.0);
            if result.projected_balance_at_retirement >= result.required_nest_egg {
                prop_assert!(result.on_track);
                prop_assert_eq!(result.required_monthly_contribution, 0.0);
            }
            prop_assert!(result.trajectory.iter().all(|y| y.balance >= 0.0));
        }
    }
}
