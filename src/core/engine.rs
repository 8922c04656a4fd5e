use super::amortization::{amortization_schedule, monthly_rate};
use super::costs::buying_costs_at;
use super::rates::resolve_rates;
use super::types::{MonthlySnapshot, ResolvedRates, ScenarioInputs};

const CLOSING_COST_RATE: f64 = 0.03;
const SELLING_COST_RATE: f64 = 0.08;
const MORTGAGE_INSURANCE_RATE: f64 = 0.005;
const MORTGAGE_INSURANCE_LTV: f64 = 0.80;

/// The side whose monthly cost came in lower and therefore invests the difference.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Saver {
    Buyer,
    Renter,
}

#[derive(Debug)]
struct Positions {
    home_value: f64,
    rent: f64,
    balance: f64,
    buyer_cash: f64,
    renter_portfolio: f64,
}

impl Positions {
    fn opening(inputs: &ScenarioInputs) -> Self {
        let down_payment = inputs.down_payment_amount();
        let closing_costs = inputs.home_price * CLOSING_COST_RATE;
        Self {
            home_value: inputs.home_price,
            rent: inputs.monthly_rent,
            balance: inputs.loan_amount(),
            buyer_cash: -(down_payment + closing_costs),
            renter_portfolio: down_payment,
        }
    }

    fn equity(&self) -> f64 {
        self.home_value - self.balance
    }

    /// Credits the cheaper side with the monthly saving and compounds its account.
    fn invest_saving(&mut self, cash_flow_diff: f64, monthly_return: f64) {
        // cash_flow_diff is renter cost minus owner cost.
        let (saver, saving) = if cash_flow_diff > 0.0 {
            (Saver::Buyer, cash_flow_diff)
        } else {
            (Saver::Renter, -cash_flow_diff)
        };
        let account = match saver {
            Saver::Buyer => &mut self.buyer_cash,
            Saver::Renter => &mut self.renter_portfolio,
        };
        *account = (*account + saving) * (1.0 + monthly_return);
    }
}

/// Month-by-month buy-vs-rent projection using the rates resolved from the
/// scenario's horizon and local market.
pub fn run_simulation(inputs: &ScenarioInputs) -> Vec<MonthlySnapshot> {
    let rates = resolve_rates(inputs.time_horizon_years, &inputs.local_market);
    run_simulation_with_rates(inputs, &rates)
}

pub fn run_simulation_with_rates(
    inputs: &ScenarioInputs,
    rates: &ResolvedRates,
) -> Vec<MonthlySnapshot> {
    let loan_amount = inputs.loan_amount();
    // The loan always runs its contractual term; the horizon only decides how much of it we read.
    let schedule =
        amortization_schedule(loan_amount, inputs.interest_rate, inputs.loan_term_years);

    let monthly_interest = monthly_rate(inputs.interest_rate);
    let monthly_appreciation = monthly_rate(rates.home_appreciation_rate);
    let monthly_rent_growth = monthly_rate(rates.rent_growth_rate);
    let monthly_return = monthly_rate(rates.investment_return_rate);
    let mortgage_insurance_monthly = loan_amount * MORTGAGE_INSURANCE_RATE / 12.0;

    let total_months = inputs.horizon_months();
    let mut positions = Positions::opening(inputs);
    let mut snapshots = Vec::with_capacity(total_months as usize);

    for month in 1..=total_months {
        positions.home_value *= 1.0 + monthly_appreciation;
        positions.rent *= 1.0 + monthly_rent_growth;

        let (mortgage_payment, interest_paid, principal_paid) =
            match schedule.get((month - 1) as usize) {
                Some(entry) => {
                    let interest_paid = positions.balance * monthly_interest;
                    let principal_paid = entry.payment - interest_paid;
                    positions.balance = (positions.balance - principal_paid).max(0.0);
                    (entry.payment, interest_paid, principal_paid)
                }
                None => {
                    // Past the contractual term; any rounding residue is written off.
                    positions.balance = 0.0;
                    (0.0, 0.0, 0.0)
                }
            };
        let home_equity = positions.equity();

        let carrying = buying_costs_at(inputs, positions.home_value);
        let mortgage_insurance =
            if positions.balance / positions.home_value > MORTGAGE_INSURANCE_LTV {
                mortgage_insurance_monthly
            } else {
                0.0
            };
        let monthly_buying_costs = interest_paid
            + carrying.property_tax
            + carrying.insurance
            + carrying.maintenance
            + carrying.hoa
            + mortgage_insurance;
        let monthly_renting_costs = positions.rent;

        positions.invest_saving(monthly_renting_costs - monthly_buying_costs, monthly_return);

        let selling_costs = if month == total_months {
            positions.home_value * SELLING_COST_RATE
        } else {
            0.0
        };
        let buyer_net_worth = (home_equity - selling_costs) + positions.buyer_cash;
        let renter_net_worth = positions.renter_portfolio;

        snapshots.push(MonthlySnapshot {
            month,
            mortgage_payment,
            principal_paid,
            interest_paid,
            remaining_balance: positions.balance,
            home_value: positions.home_value,
            home_equity,
            mortgage_insurance,
            monthly_buying_costs,
            monthly_rent: positions.rent,
            monthly_renting_costs,
            invested_down_payment: positions.renter_portfolio,
            buyer_cash_account: positions.buyer_cash,
            selling_costs,
            buyer_net_worth,
            renter_net_worth,
            net_worth_delta: buyer_net_worth - renter_net_worth,
        });
    }

    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sample_inputs;
    use crate::core::LocalMarket;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn stated_rates() -> ResolvedRates {
        ResolvedRates {
            home_appreciation_rate: 3.0,
            rent_growth_rate: 3.5,
            investment_return_rate: 7.0,
        }
    }

    #[test]
    fn produces_one_snapshot_per_horizon_month() {
        let mut inputs = sample_inputs();
        inputs.time_horizon_years = 7;
        let snapshots = run_simulation(&inputs);

        assert_eq!(snapshots.len(), 84);
        for (index, snapshot) in snapshots.iter().enumerate() {
            assert_eq!(snapshot.month as usize, index + 1);
        }
    }

    #[test]
    fn thirty_year_run_matches_hand_calculated_first_month() {
        let snapshots = run_simulation_with_rates(&sample_inputs(), &stated_rates());
        assert_eq!(snapshots.len(), 360);

        let first = snapshots[0];
        assert_approx(first.home_value, 500_000.0 * (1.0 + 0.03 / 12.0));
        assert_approx(first.monthly_rent, 2_800.0 * (1.0 + 0.035 / 12.0));
        assert_approx_tol(first.interest_paid, 2333.33, 0.01);
        assert_approx_tol(first.remaining_balance, 399_672.0, 1.0);
        assert_approx(first.home_equity, first.home_value - first.remaining_balance);
        assert_approx(first.mortgage_insurance, 0.0);
        assert_eq!(first.selling_costs, 0.0);
    }

    #[test]
    fn home_value_compounds_monthly_at_resolved_rate() {
        let snapshots = run_simulation_with_rates(&sample_inputs(), &stated_rates());
        let monthly: f64 = 1.0 + 0.03 / 12.0;
        assert_approx_tol(snapshots[59].home_value, 500_000.0 * monthly.powi(60), 1e-6);
        assert_approx_tol(snapshots[119].home_value, 500_000.0 * monthly.powi(120), 1e-6);
    }

    #[test]
    fn equity_and_renter_portfolio_grow_over_time() {
        let snapshots = run_simulation_with_rates(&sample_inputs(), &stated_rates());
        let (m1, m60, m359) = (snapshots[0], snapshots[59], snapshots[358]);

        assert!(m60.home_equity > m1.home_equity);
        assert!(m359.home_equity > m60.home_equity);
        assert!(m60.invested_down_payment > m1.invested_down_payment);
    }

    #[test]
    fn mortgage_is_paid_off_at_end_of_term() {
        let snapshots = run_simulation_with_rates(&sample_inputs(), &stated_rates());
        let last = snapshots[359];
        assert_approx_tol(last.remaining_balance, 0.0, 0.01);
        assert_approx_tol(last.home_equity, last.home_value, 0.01);
    }

    #[test]
    fn engine_balance_tracks_amortization_schedule() {
        let inputs = sample_inputs();
        let schedule = amortization_schedule(inputs.loan_amount(), 7.0, 30);
        let snapshots = run_simulation_with_rates(&inputs, &stated_rates());
        for (snapshot, entry) in snapshots.iter().zip(schedule.iter()) {
            assert_eq!(snapshot.mortgage_payment, entry.payment);
            assert_approx(snapshot.remaining_balance, entry.remaining_balance);
            assert_approx(snapshot.interest_paid, entry.interest_paid);
        }
    }

    #[test]
    fn selling_costs_apply_only_in_final_month() {
        let mut inputs = sample_inputs();
        inputs.time_horizon_years = 5;
        let snapshots = run_simulation(&inputs);
        let (last, rest) = snapshots.split_last().expect("non-empty run");

        assert!(rest.iter().all(|s| s.selling_costs == 0.0));
        assert_approx(last.selling_costs, last.home_value * 0.08);
        assert_approx(
            last.buyer_net_worth,
            last.home_equity - last.selling_costs + last.buyer_cash_account,
        );
    }

    #[test]
    fn mortgage_insurance_applies_while_loan_to_value_above_eighty_percent() {
        let mut inputs = sample_inputs();
        inputs.down_payment_percent = 5.0;
        inputs.time_horizon_years = 30;
        let snapshots = run_simulation(&inputs);
        let expected = inputs.loan_amount() * 0.005 / 12.0;

        let first = snapshots[0];
        assert!(first.remaining_balance / first.home_value > 0.8);
        assert_approx(first.mortgage_insurance, expected);

        let last = snapshots[snapshots.len() - 1];
        assert_eq!(last.mortgage_insurance, 0.0);

        for snapshot in &snapshots {
            let ltv = snapshot.remaining_balance / snapshot.home_value;
            let charged = snapshot.mortgage_insurance > 0.0;
            assert_eq!(charged, ltv > 0.8, "month {}", snapshot.month);
        }
    }

    #[test]
    fn cheaper_owning_credits_the_buyer_cash_account() {
        let mut inputs = sample_inputs();
        inputs.monthly_rent = 10_000.0;
        inputs.time_horizon_years = 1;
        let snapshots = run_simulation_with_rates(&inputs, &stated_rates());

        let first = snapshots[0];
        let saving = first.monthly_renting_costs - first.monthly_buying_costs;
        assert!(saving > 0.0);
        assert_approx(
            first.buyer_cash_account,
            (-115_000.0 + saving) * (1.0 + 0.07 / 12.0),
        );
        // The renter paid more this month, so the portfolio neither grows nor compounds.
        assert_approx(first.invested_down_payment, 100_000.0);
    }

    #[test]
    fn cheaper_renting_invests_the_difference_for_the_renter() {
        let mut inputs = sample_inputs();
        inputs.monthly_rent = 500.0;
        inputs.time_horizon_years = 1;
        let snapshots = run_simulation_with_rates(&inputs, &stated_rates());

        let first = snapshots[0];
        let saving = first.monthly_buying_costs - first.monthly_renting_costs;
        assert!(saving > 0.0);
        assert_approx(
            first.invested_down_payment,
            (100_000.0 + saving) * (1.0 + 0.07 / 12.0),
        );
        assert_approx(first.buyer_cash_account, -(100_000.0 + 15_000.0));
    }

    #[test]
    fn all_cash_purchase_has_no_mortgage_activity() {
        let mut inputs = sample_inputs();
        inputs.down_payment_percent = 100.0;
        inputs.time_horizon_years = 3;
        let snapshots = run_simulation(&inputs);

        assert_eq!(snapshots.len(), 36);
        for snapshot in &snapshots {
            assert_eq!(snapshot.mortgage_payment, 0.0);
            assert_eq!(snapshot.interest_paid, 0.0);
            assert_eq!(snapshot.remaining_balance, 0.0);
            assert_eq!(snapshot.mortgage_insurance, 0.0);
            assert_approx(snapshot.home_equity, snapshot.home_value);
        }
    }

    #[test]
    fn horizon_beyond_loan_term_keeps_running_without_payments() {
        let mut inputs = sample_inputs();
        inputs.loan_term_years = 10;
        inputs.time_horizon_years = 12;
        let snapshots = run_simulation(&inputs);

        assert_eq!(snapshots.len(), 144);
        assert_approx_tol(snapshots[119].remaining_balance, 0.0, 0.01);
        for snapshot in &snapshots[120..] {
            assert_eq!(snapshot.mortgage_payment, 0.0);
            assert_eq!(snapshot.remaining_balance, 0.0);
        }
    }

    #[test]
    fn zero_horizon_produces_no_snapshots() {
        let mut inputs = sample_inputs();
        inputs.time_horizon_years = 0;
        assert!(run_simulation(&inputs).is_empty());
    }

    #[test]
    fn run_simulation_uses_local_market_when_known() {
        let mut inputs = sample_inputs();
        inputs.time_horizon_years = 10;
        inputs.local_market = LocalMarket::Known {
            home_appreciation_rate: -1.2,
            rent_growth_rate: 2.0,
        };
        let snapshots = run_simulation(&inputs);
        let expected = resolve_rates(10, &inputs.local_market);
        let manual = run_simulation_with_rates(&inputs, &expected);

        assert_eq!(snapshots, manual);
        assert!(snapshots[119].home_value < inputs.home_price);
    }

    #[test]
    fn identical_inputs_produce_identical_runs() {
        let mut inputs = sample_inputs();
        inputs.time_horizon_years = 12;
        let first = run_simulation(&inputs);
        let second = run_simulation(&inputs);
        assert_eq!(first, second);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_snapshots_cover_horizon_and_delta_is_consistent(
            home_price in 50_000u32..3_000_000,
            down_payment in 0u32..101,
            rate_bp in 0u32..1_200,
            loan_term_years in 1u32..31,
            time_horizon_years in 1u32..31,
            monthly_rent in 300u32..15_000,
            appreciation_bp in -500i32..800,
            local in proptest::bool::ANY
        ) {
            let mut inputs = sample_inputs();
            inputs.home_price = home_price as f64;
            inputs.down_payment_percent = down_payment as f64;
            inputs.interest_rate = rate_bp as f64 / 100.0;
            inputs.loan_term_years = loan_term_years;
            inputs.time_horizon_years = time_horizon_years;
            inputs.monthly_rent = monthly_rent as f64;
            if local {
                inputs.local_market = LocalMarket::Known {
                    home_appreciation_rate: appreciation_bp as f64 / 100.0,
                    rent_growth_rate: 3.0,
                };
            }

            let snapshots = run_simulation(&inputs);
            prop_assert_eq!(snapshots.len(), (time_horizon_years * 12) as usize);

            for (index, snapshot) in snapshots.iter().enumerate() {
                prop_assert_eq!(snapshot.month as usize, index + 1);
                prop_assert!(snapshot.buyer_net_worth.is_finite());
                prop_assert!(snapshot.renter_net_worth.is_finite());
                prop_assert!(snapshot.remaining_balance >= 0.0);
                prop_assert!(
                    snapshot.net_worth_delta == snapshot.buyer_net_worth - snapshot.renter_net_worth
                );
            }
        }
    }
}
