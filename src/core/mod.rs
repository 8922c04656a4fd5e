mod amortization;
mod costs;
mod engine;
mod rates;
mod summary;
mod types;

pub use amortization::{amortization_schedule, monthly_payment};
pub use costs::{buying_costs, buying_costs_at, renting_costs};
pub use engine::{run_simulation, run_simulation_with_rates};
pub use rates::{HorizonBucket, resolve_rates};
pub use summary::{summarize, yearly_rollup};
pub use types::{
    AmortizationEntry, BuyingCosts, ComparisonSummary, LocalMarket, MonthlySnapshot,
    RentingCosts, ResolvedRates, ScenarioInputs, Verdict, YearSummary,
};

#[cfg(test)]
pub(crate) fn sample_inputs() -> ScenarioInputs {
    ScenarioInputs {
        home_price: 500_000.0,
        down_payment_percent: 20.0,
        interest_rate: 7.0,
        loan_term_years: 30,
        time_horizon_years: 30,
        monthly_rent: 2_800.0,
        property_tax_rate: 1.0,
        home_insurance_annual: 1_200.0,
        hoa_monthly: 150.0,
        maintenance_rate: 1.0,
        renter_insurance_annual: 240.0,
        home_appreciation_rate: 3.0,
        rent_growth_rate: 3.5,
        investment_return_rate: 7.0,
        local_market: LocalMarket::Unknown,
    }
}
