//! Amortization primitives shared by the payoff and retirement loops

/// Balances at or below this are treated as paid off
pub const BALANCE_EPSILON: f64 = 1e-9;

/// Convert an annual percentage rate (e.g. `24.0`) to a monthly decimal rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

/// Interest accrued on `balance` over one month
pub fn monthly_interest(balance: f64, annual_rate_percent: f64) -> f64 {
    balance * monthly_rate(annual_rate_percent)
}

/// Outcome of applying one month's payment to a balance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentSplit {
    /// Amount actually applied (never more than balance + interest)
    pub payment: f64,
    /// Portion of the payment that reduced principal
    pub principal: f64,
    /// Interest accrued this month
    pub interest: f64,
    /// Balance after the payment
    pub new_balance: f64,
}

impl PaymentSplit {
    /// True when the payment did not cover the interest (negative amortization)
    pub fn is_negative_amortization(&self) -> bool {
        self.payment < self.interest
    }
}

/// Split `payment` into interest and principal against `balance`
///
/// Principal is `min(payment - interest, balance)` clamped at 0, so a payment
/// below interest leaves the balance unchanged rather than growing it.
pub fn apply_payment(balance: f64, payment: f64, interest: f64) -> PaymentSplit {
    let principal = (payment - interest).min(balance).max(0.0);
    let mut new_balance = (balance - principal).max(0.0);
    if new_balance <= BALANCE_EPSILON {
        new_balance = 0.0;
    }
    let applied = payment.min(balance + interest).max(0.0);

    PaymentSplit {
        payment: applied,
        principal,
        interest,
        new_balance,
    }
}

/// One month of accumulation: growth then contribution
pub fn compound_monthly(balance: f64, monthly_rate: f64, contribution: f64) -> f64 {
    balance * (1.0 + monthly_rate) + contribution
}

/// Future value of a lump sum compounded monthly
pub fn future_value(present: f64, monthly_rate: f64, months: u32) -> f64 {
    present * (1.0 + monthly_rate).powi(months as i32)
}

/// Level monthly payment that grows to `target` over `months` at `monthly_rate`
///
/// Falls back to straight division when the rate is zero.
pub fn sinking_fund_payment(target: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 || target <= 0.0 {
        return 0.0;
    }
    if monthly_rate.abs() < 1e-12 {
        return target / months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months as i32) - 1.0;
    target * monthly_rate / growth
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_monthly_interest_at_24_percent() {
        assert_abs_diff_eq!(monthly_interest(1000.0, 24.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(monthly_interest(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_apply_payment_splits_interest_and_principal() {
        let split = apply_payment(1000.0, 50.0, 20.0);
        assert_abs_diff_eq!(split.principal, 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(split.new_balance, 970.0, epsilon = 1e-12);
        assert_abs_diff_eq!(split.payment, 50.0);
        assert!(!split.is_negative_amortization());
    }

    #[test]
    fn test_final_payment_is_capped_at_balance_plus_interest() {
        let split = apply_payment(40.0, 100.0, 0.8);
        assert_abs_diff_eq!(split.principal, 40.0);
        assert_eq!(split.new_balance, 0.0);
        assert_abs_diff_eq!(split.payment, 40.8, epsilon = 1e-12);
    }

    #[test]
    fn test_payment_below_interest_does_not_grow_balance() {
        let split = apply_payment(1000.0, 10.0, 20.0);
        assert_eq!(split.principal, 0.0);
        assert_eq!(split.new_balance, 1000.0);
        assert!(split.is_negative_amortization());
    }

    #[test]
    fn test_sinking_fund_payment() {
        // Zero rate is plain division
        assert_abs_diff_eq!(sinking_fund_payment(1200.0, 0.0, 12), 100.0);

        // Paying the solved amount every month reaches the target
        let rate = monthly_rate(6.0);
        let pmt = sinking_fund_payment(10_000.0, rate, 60);
        let mut balance = 0.0;
        for _ in 0..60 {
            balance = compound_monthly(balance, rate, pmt);
        }
        assert_abs_diff_eq!(balance, 10_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_future_value() {
        assert_abs_diff_eq!(future_value(100.0, 0.01, 2), 102.01, epsilon = 1e-9);
        assert_eq!(future_value(100.0, 0.0, 360), 100.0);
    }
}
