//! AWS Lambda handler for payoff and retirement projections
//!
//! Accepts a JSON request tagged with `kind` (`payoff` or `retirement`) and
//! returns the simulation result. Simulation failures come back as a
//! structured error body rather than an invocation error, with any partial
//! result attached.

use chrono::NaiveDate;
use finance_projection::payoff::DEFAULT_MAX_MONTHS;
use finance_projection::retirement::{AssetAllocation, PresentValueAnnuity, RiskProfile};
use finance_projection::scenario::StrategyComparison;
use finance_projection::{
    Debt, PayoffConfig, PayoffPolicy, PayoffResult, PayoffStrategy, RetirementProfile,
    RetirementProjector, RetirementResult, ScenarioRunner, SimulationError,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    Payoff(PayoffRequest),
    Retirement(RetirementRequest),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffRequest {
    pub debts: Vec<Debt>,

    #[serde(default)]
    pub strategy: PayoffStrategy,

    #[serde(default)]
    pub extra_monthly_payment: f64,

    /// Add paid-off minimums to the extra payment
    #[serde(default)]
    pub roll_minimums_forward: bool,

    /// Month cap (default: 360)
    #[serde(default = "default_max_months")]
    pub max_months: u32,

    /// Snapshot date used to label months
    #[serde(default)]
    pub as_of: Option<NaiveDate>,

    /// Also run the other strategy and the minimum-only baseline
    #[serde(default)]
    pub compare: bool,
}

fn default_max_months() -> u32 { DEFAULT_MAX_MONTHS }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementRequest {
    pub profile: RetirementProfile,

    /// Size the nest egg as the present value of withdrawals
    #[serde(default)]
    pub present_value: bool,

    /// Risk profile for the suggested allocation (default: moderate)
    #[serde(default)]
    pub risk_profile: RiskProfile,
}

/// Output from either projection
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff: Option<PayoffResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<StrategyComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retirement: Option<RetirementResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allocation: Option<AssetAllocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

impl From<&SimulationError> for ErrorBody {
    fn from(err: &SimulationError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

fn handle_payoff(request: PayoffRequest) -> Response {
    let runner = ScenarioRunner::with_config(PayoffConfig {
        max_months: request.max_months,
        roll_minimums_forward: request.roll_minimums_forward,
        as_of: request.as_of,
    });

    if request.compare {
        return match runner.compare_strategies(
            &request.debts,
            request.extra_monthly_payment,
            request.strategy,
        ) {
            Ok(comparison) => Response {
                comparison: Some(comparison),
                ..Default::default()
            },
            Err(err) => payoff_error(err),
        };
    }

    let policy = PayoffPolicy::new(request.strategy, request.extra_monthly_payment);
    match runner.run(&request.debts, &policy) {
        Ok(result) => Response {
            payoff: Some(result),
            ..Default::default()
        },
        Err(err) => payoff_error(err),
    }
}

fn payoff_error(err: SimulationError) -> Response {
    log::warn!("payoff request failed: {err}");
    let error = Some(ErrorBody::from(&err));
    match err {
        SimulationError::Incomplete { partial, .. } => Response {
            payoff: Some(*partial),
            error,
            ..Default::default()
        },
        _ => Response { error, ..Default::default() },
    }
}

fn handle_retirement(request: RetirementRequest) -> Response {
    let outcome = if request.present_value {
        RetirementProjector::with_model(PresentValueAnnuity).project(&request.profile)
    } else {
        RetirementProjector::new().project(&request.profile)
    };

    let allocation = Some(request.risk_profile.allocation());
    match outcome {
        Ok(result) => Response {
            retirement: Some(result),
            allocation,
            ..Default::default()
        },
        Err(err) => {
            log::warn!("retirement request failed: {err}");
            let error = Some(ErrorBody::from(&err));
            match err {
                SimulationError::Depleted { result, .. } => Response {
                    retirement: Some(*result),
                    allocation,
                    error,
                    ..Default::default()
                },
                _ => Response { error, ..Default::default() },
            }
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let start = std::time::Instant::now();

    let mut response = match event.payload {
        Request::Payoff(request) => handle_payoff(request),
        Request::Retirement(request) => handle_retirement(request),
    };

    response.execution_time_ms = start.elapsed().as_millis() as u64;
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff_request_defaults() {
        let request: Request = serde_json::from_str(
            r#"{"kind":"payoff","debts":[{"id":"card","name":"Card","balance":1000,
                "annualInterestRatePercent":24,"minimumPayment":50,"originalAmount":1000}]}"#,
        )
        .unwrap();
        let Request::Payoff(payoff) = request else {
            panic!("expected payoff request");
        };
        assert_eq!(payoff.strategy, PayoffStrategy::Avalanche);
        assert_eq!(payoff.max_months, DEFAULT_MAX_MONTHS);
        assert!(!payoff.compare);

        let response = handle_payoff(payoff);
        let result = response.payoff.unwrap();
        assert_eq!(result.total_months, 26);
        assert!(result.is_paid_off());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_nonconvergent_payoff_reports_error_kind() {
        let request = PayoffRequest {
            debts: vec![Debt::new("card", "Card", 10_000.0, 24.0, 150.0)],
            strategy: PayoffStrategy::Snowball,
            extra_monthly_payment: 0.0,
            roll_minimums_forward: false,
            max_months: DEFAULT_MAX_MONTHS,
            as_of: None,
            compare: false,
        };
        let response = handle_payoff(request);
        assert!(response.payoff.is_none());
        assert_eq!(response.error.unwrap().kind, "nonConvergent");
    }

    #[test]
    fn test_retirement_request() {
        let request: Request = serde_json::from_str(
            r#"{"kind":"retirement","profile":{"currentAge":35,"retirementAge":65,
                "lifeExpectancy":90,"currentSavings":150000,"monthlyContribution":1500,
                "desiredMonthlyIncome":5000,"expectedAnnualReturnPercent":7,
                "annualInflationPercent":3,"socialSecurityMonthlyEstimate":2000}}"#,
        )
        .unwrap();
        let Request::Retirement(retirement) = request else {
            panic!("expected retirement request");
        };
        let response = handle_retirement(retirement);
        let result = response.retirement.unwrap();
        assert_eq!(result.years_to_retirement, 30);
        assert_eq!(result.trajectory.len(), 56);
        assert_eq!(response.allocation, Some(RiskProfile::Moderate.allocation()));
    }

    #[test]
    fn test_retirement_request_with_risk_profile() {
        let request: Request = serde_json::from_str(
            r#"{"kind":"retirement","riskProfile":"aggressive","profile":{"currentAge":40,
                "retirementAge":60,"lifeExpectancy":85,"currentSavings":50000,
                "monthlyContribution":800,"desiredMonthlyIncome":4000,
                "expectedAnnualReturnPercent":6,"annualInflationPercent":2}}"#,
        )
        .unwrap();
        let Request::Retirement(retirement) = request else {
            panic!("expected retirement request");
        };
        assert_eq!(retirement.risk_profile, RiskProfile::Aggressive);
        let response = handle_retirement(retirement);
        assert_eq!(response.allocation.unwrap().stocks, 80);
    }

    #[test]
    fn test_compare_request_keeps_capped_runs() {
        let request = PayoffRequest {
            debts: vec![Debt::new("mortgage", "Mortgage", 400_000.0, 6.0, 2001.0)],
            strategy: PayoffStrategy::Avalanche,
            extra_monthly_payment: 0.0,
            roll_minimums_forward: false,
            max_months: DEFAULT_MAX_MONTHS,
            as_of: None,
            compare: true,
        };
        let response = handle_payoff(request);
        assert!(response.error.is_none());
        let comparison = response.comparison.unwrap();
        assert!(!comparison.avalanche.is_paid_off());
        assert_eq!(comparison.snowball.result.schedule.len(), 360);
    }
}
