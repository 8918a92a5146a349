//! Finance Projection CLI
//!
//! Command-line interface for debt payoff schedules and retirement projections

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use finance_projection::debt::load_debts;
use finance_projection::payoff::{PayoffSummary, DEFAULT_MAX_MONTHS};
use finance_projection::retirement::{
    AssetAllocation, PresentValueAnnuity, RetirementProjector, RiskProfile,
};
use finance_projection::scenario::{debt_totals, extra_payment_range};
use finance_projection::{
    Debt, PayoffConfig, PayoffPolicy, PayoffResult, PayoffStrategy, RetirementProfile,
    RetirementResult, ScenarioRunner, SimulationError,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "finproj", version, about = "Debt payoff and retirement projections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a month-by-month payoff schedule
    Payoff {
        #[command(flatten)]
        plan: PlanArgs,

        /// Write the full schedule to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Schedule rows to print
        #[arg(long, default_value_t = 24)]
        rows: usize,
    },
    /// Compare avalanche and snowball for the same extra payment
    Compare {
        #[command(flatten)]
        plan: PlanArgs,
    },
    /// Evaluate a range of extra payments
    Sweep {
        #[command(flatten)]
        plan: PlanArgs,

        /// Largest extra payment to try
        #[arg(long, default_value_t = 1000.0)]
        to: f64,

        #[arg(long, default_value_t = 100.0)]
        step: f64,
    },
    /// Project retirement savings
    Retire(RetireArgs),
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// CSV with columns id,name,kind,balance,rate,minimum,original,lender,due_day
    #[arg(long)]
    debts: PathBuf,

    /// Extra monthly payment (the starting amount for sweeps)
    #[arg(long, default_value_t = 0.0)]
    extra: f64,

    #[arg(long, default_value_t = PayoffStrategy::Avalanche)]
    strategy: PayoffStrategy,

    /// Add paid-off minimums to the extra payment
    #[arg(long)]
    roll_minimums: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    max_months: u32,

    /// Snapshot date used to label months (YYYY-MM-DD)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl PlanArgs {
    fn config(&self) -> PayoffConfig {
        PayoffConfig {
            max_months: self.max_months,
            roll_minimums_forward: self.roll_minimums,
            as_of: self.as_of,
        }
    }

    fn load(&self) -> Result<Vec<Debt>> {
        load_debts(&self.debts).with_context(|| format!("loading {}", self.debts.display()))
    }
}

#[derive(Debug, Args)]
struct RetireArgs {
    #[arg(long, default_value_t = 35)]
    current_age: u32,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(long, default_value_t = 90)]
    life_expectancy: u32,
    #[arg(long, default_value_t = 150_000.0)]
    savings: f64,
    #[arg(long, default_value_t = 1_500.0)]
    contribution: f64,
    /// Desired monthly income in retirement
    #[arg(long, default_value_t = 5_000.0)]
    income: f64,
    /// Expected annual return in percent
    #[arg(long, default_value_t = 7.0)]
    return_pct: f64,
    #[arg(long, default_value_t = 3.0)]
    inflation_pct: f64,
    /// Monthly social security estimate
    #[arg(long, default_value_t = 2_000.0)]
    social_security: f64,
    /// Size the nest egg as the present value of withdrawals
    #[arg(long)]
    present_value: bool,
    /// Risk profile for the suggested asset allocation
    #[arg(long, default_value_t = RiskProfile::Moderate)]
    risk: RiskProfile,
    #[arg(long)]
    json: bool,
}

impl RetireArgs {
    fn profile(&self) -> RetirementProfile {
        RetirementProfile {
            current_age: self.current_age,
            retirement_age: self.retirement_age,
            life_expectancy: self.life_expectancy,
            current_savings: self.savings,
            monthly_contribution: self.contribution,
            desired_monthly_income: self.income,
            expected_annual_return_percent: self.return_pct,
            annual_inflation_percent: self.inflation_pct,
            social_security_monthly_estimate: self.social_security,
        }
    }
}

/// Flat schedule row for CSV output
#[derive(Debug, Serialize)]
struct CsvScheduleRow<'a> {
    month: u32,
    label: &'a str,
    debt_id: &'a str,
    debt_name: &'a str,
    payment: f64,
    principal: f64,
    interest: f64,
    remaining_balance: f64,
}

/// Projection plus the suggested allocation for JSON output
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetirementReport<'a> {
    projection: &'a RetirementResult,
    risk_profile: RiskProfile,
    allocation: AssetAllocation,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Payoff { plan, output, rows } => run_payoff(&plan, output, rows),
        Command::Compare { plan } => run_compare(&plan),
        Command::Sweep { plan, to, step } => run_sweep(&plan, to, step),
        Command::Retire(args) => run_retire(&args),
    }
}

fn run_payoff(plan: &PlanArgs, output: Option<PathBuf>, rows: usize) -> Result<()> {
    let debts = plan.load()?;
    let runner = ScenarioRunner::with_config(plan.config());
    let policy = PayoffPolicy::new(plan.strategy, plan.extra);

    let (result, warning) = match runner.run(&debts, &policy) {
        Ok(result) => (result, None),
        // Still show what was simulated up to the cap
        Err(SimulationError::Incomplete { months, remaining_balance, partial }) => (
            *partial,
            Some(format!(
                "not paid off within {months} months: {remaining_balance:.2} remaining"
            )),
        ),
        Err(err) => return Err(err).context("payoff simulation failed"),
    };

    if let Some(path) = output {
        write_schedule_csv(&path, &result)?;
        println!("Full schedule written to: {}", path.display());
    }

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_payoff(&debts, &result, rows);
    }

    if let Some(message) = warning {
        log::warn!("{message}");
        eprintln!("Warning: {message}");
    }
    Ok(())
}

fn run_compare(plan: &PlanArgs) -> Result<()> {
    let debts = plan.load()?;
    let runner = ScenarioRunner::with_config(plan.config());
    let comparison = runner
        .compare_strategies(&debts, plan.extra, plan.strategy)
        .context("strategy comparison failed")?;

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
        return Ok(());
    }

    println!(
        "{:<10} {:>8} {:>14} {:>14}  {}",
        "Strategy", "Months", "Interest", "Total Paid", "Status"
    );
    println!("{}", "-".repeat(62));
    for run in [&comparison.avalanche, &comparison.snowball] {
        let result = &run.result;
        println!(
            "{:<10} {:>8} {:>14.2} {:>14.2}  {}",
            result.strategy,
            result.total_months,
            result.total_interest,
            result.total_paid,
            if run.is_paid_off() { "paid off" } else { "incomplete" }
        );
    }

    println!("\nCheaper strategy: {}", comparison.cheaper());
    match (comparison.interest_saved_vs_minimum, comparison.months_saved_vs_minimum) {
        (Some(interest), Some(months)) => println!(
            "{} with {:.2} extra saves ${:.2} interest and {} months vs minimums only",
            comparison.selected, plan.extra, interest, months
        ),
        _ if !comparison.minimum_only.paid_off => println!(
            "Minimum payments alone leave ${:.2} after {} months",
            comparison.minimum_only.remaining_balance, comparison.minimum_only.total_months
        ),
        _ => println!("{} does not pay off within {} months", comparison.selected, runner.config().max_months),
    }
    Ok(())
}

fn run_sweep(plan: &PlanArgs, to: f64, step: f64) -> Result<()> {
    let debts = plan.load()?;
    let runner = ScenarioRunner::with_config(plan.config());
    let amounts = extra_payment_range(plan.extra, to, step);
    let points = runner.sweep_extra_payments(&debts, plan.strategy, &amounts);

    if plan.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!("{:>10} {:>8} {:>14} {:>14}  {}", "Extra", "Months", "Interest", "Remaining", "Status");
    println!("{}", "-".repeat(64));
    for point in &points {
        match &point.summary {
            Some(PayoffSummary { total_months, total_interest, remaining_balance, paid_off, .. }) => {
                println!(
                    "{:>10.2} {:>8} {:>14.2} {:>14.2}  {}",
                    point.extra_monthly_payment,
                    total_months,
                    total_interest,
                    remaining_balance,
                    if *paid_off { "paid off" } else { "incomplete" }
                );
            }
            None => println!(
                "{:>10.2} {:>8} {:>14} {:>14}  {}",
                point.extra_monthly_payment,
                "-",
                "-",
                "-",
                point.error.as_deref().unwrap_or("failed")
            ),
        }
    }
    Ok(())
}

fn run_retire(args: &RetireArgs) -> Result<()> {
    let profile = args.profile();
    let outcome = if args.present_value {
        RetirementProjector::with_model(PresentValueAnnuity).project(&profile)
    } else {
        RetirementProjector::new().project(&profile)
    };

    let (result, depleted_at) = match outcome {
        Ok(result) => (result, None),
        Err(SimulationError::Depleted { age, result }) => (*result, Some(age)),
        Err(err) => return Err(err).context("retirement projection failed"),
    };

    let allocation = args.risk.allocation();
    if args.json {
        let report = RetirementReport {
            projection: &result,
            risk_profile: args.risk,
            allocation,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_retirement(&result);
        println!(
            "\nSuggested allocation ({}): stocks {}%, bonds {}%, cash {}%, real estate {}%",
            args.risk, allocation.stocks, allocation.bonds, allocation.cash, allocation.real_estate
        );
    }

    if let Some(age) = depleted_at {
        log::warn!("savings depleted at age {age}");
        eprintln!("Warning: savings run out at age {age}, before age {}", profile.life_expectancy);
    }
    Ok(())
}

fn print_payoff(debts: &[Debt], result: &PayoffResult, rows: usize) {
    let totals = debt_totals(debts);
    println!(
        "Debts: {}  Total: ${:.2}  Minimums: ${:.2}/month  Average rate: {:.2}%",
        totals.debt_count,
        totals.total_balance,
        totals.total_minimum_payment,
        totals.average_rate_percent
    );
    for debt in debts {
        println!(
            "  {:<20} ${:>12.2} of ${:>12.2}  {:>5.1}% repaid",
            debt.name,
            debt.balance,
            debt.original_amount,
            debt.progress_percent()
        );
    }
    println!(
        "Strategy: {}  Extra: ${:.2}/month\n",
        result.strategy, result.extra_monthly_payment
    );

    println!(
        "{:>5} {:>7} {:<20} {:>12} {:>12} {:>10} {:>14}",
        "Month", "Date", "Debt", "Payment", "Principal", "Interest", "Remaining"
    );
    println!("{}", "-".repeat(86));
    for entry in result.schedule.iter().take(rows) {
        println!(
            "{:>5} {:>7} {:<20} {:>12.2} {:>12.2} {:>10.2} {:>14.2}",
            entry.month,
            entry.label.as_deref().unwrap_or(""),
            entry.debt_name,
            entry.payment,
            entry.principal,
            entry.interest,
            entry.remaining_balance,
        );
    }
    if result.schedule.len() > rows {
        println!("... ({} more rows)", result.schedule.len() - rows);
    }

    println!("\nPayoff order:");
    for (position, debt_id) in result.payoff_order.iter().enumerate() {
        let month = result
            .debt(debt_id)
            .and_then(|d| d.payoff_month)
            .map(|m| format!("month {m}"))
            .unwrap_or_else(|| "already paid".to_string());
        println!("  {}. {} ({})", position + 1, debt_id, month);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Months: {}", summary.total_months);
    println!("  Total Interest: ${:.2}", summary.total_interest);
    println!("  Total Paid: ${:.2}", summary.total_paid);
    println!("  Remaining Balance: ${:.2}", summary.remaining_balance);
}

fn print_retirement(result: &RetirementResult) {
    println!(
        "Years to retirement: {}  Years in retirement: {}",
        result.years_to_retirement, result.years_in_retirement
    );
    println!("Projected at retirement: ${:.0}", result.projected_balance_at_retirement);
    println!("Required nest egg:       ${:.0}", result.required_nest_egg);
    println!("Progress to goal:        {:.0}%", result.percentage_to_goal);
    println!("On track:                {}", if result.on_track { "yes" } else { "no" });
    if !result.on_track {
        println!("Required contribution:   ${:.2}/month", result.required_monthly_contribution);
    }
    println!("Real return:             {:.2}%\n", result.real_annual_return_percent);

    println!("{:>4} {:>14}  {}", "Age", "Balance", "Phase");
    println!("{}", "-".repeat(34));
    for point in &result.trajectory {
        println!("{:>4} {:>14.0}  {:?}", point.age, point.balance, point.phase);
    }
}

fn write_schedule_csv(path: &Path, result: &PayoffResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for entry in &result.schedule {
        writer.serialize(CsvScheduleRow {
            month: entry.month,
            label: entry.label.as_deref().unwrap_or(""),
            debt_id: &entry.debt_id,
            debt_name: &entry.debt_name,
            payment: entry.payment,
            principal: entry.principal,
            interest: entry.interest,
            remaining_balance: entry.remaining_balance,
        })?;
    }
    writer.flush()?;
    Ok(())
}
