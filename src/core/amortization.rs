use super::types::AmortizationEntry;

pub(crate) fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / 12.0
}

fn payment_count(term_years: u32) -> u32 {
    term_years.saturating_mul(12)
}

/// Fixed monthly payment for a fully-amortizing loan.
///
/// A non-positive principal means the home was bought outright and returns zero.
/// A zero rate falls back to straight-line repayment.
pub fn monthly_payment(principal: f64, annual_rate_percent: f64, term_years: u32) -> f64 {
    if principal <= 0.0 {
        return 0.0;
    }

    let payments = payment_count(term_years).max(1);
    if annual_rate_percent == 0.0 {
        return principal / payments as f64;
    }

    let rate = monthly_rate(annual_rate_percent);
    let growth = (1.0 + rate).powi(payments as i32);
    principal * (rate * growth) / (growth - 1.0)
}

pub fn amortization_schedule(
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
) -> Vec<AmortizationEntry> {
    let payment = monthly_payment(principal, annual_rate_percent, term_years);
    let rate = monthly_rate(annual_rate_percent);
    let payments = payment_count(term_years);

    let mut balance = principal;
    let mut schedule = Vec::with_capacity(payments as usize);
    for month in 1..=payments {
        let interest_paid = balance * rate;
        let principal_paid = payment - interest_paid;
        balance = (balance - principal_paid).max(0.0);

        schedule.push(AmortizationEntry {
            month,
            payment,
            principal_paid,
            interest_paid,
            remaining_balance: balance,
        });
    }
    schedule
}
