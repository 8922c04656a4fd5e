use super::amortization::monthly_payment;
use super::types::{BuyingCosts, RentingCosts, ScenarioInputs};

/// First-month ownership costs at the purchase price.
pub fn buying_costs(inputs: &ScenarioInputs) -> BuyingCosts {
    buying_costs_at(inputs, inputs.home_price)
}

/// Ownership costs with value-based items (tax, maintenance) charged on `home_value`.
/// The mortgage is always the contractual payment on the original loan.
pub fn buying_costs_at(inputs: &ScenarioInputs, home_value: f64) -> BuyingCosts {
    let mortgage = monthly_payment(
        inputs.loan_amount(),
        inputs.interest_rate,
        inputs.loan_term_years,
    );
    let property_tax = monthly_value_charge(home_value, inputs.property_tax_rate);
    let insurance = inputs.home_insurance_annual / 12.0;
    let hoa = inputs.hoa_monthly;
    let maintenance = monthly_value_charge(home_value, inputs.maintenance_rate);

    BuyingCosts {
        mortgage,
        property_tax,
        insurance,
        hoa,
        maintenance,
        total: mortgage + property_tax + insurance + hoa + maintenance,
    }
}

/// Renting costs for a 1-based `month`. Rent steps up once per 12-month block.
pub fn renting_costs(inputs: &ScenarioInputs, month: u32) -> RentingCosts {
    let year = month.saturating_sub(1) / 12;
    let growth = (1.0 + inputs.rent_growth_rate / 100.0).powi(year as i32);
    let monthly_rent = inputs.monthly_rent * growth;
    let insurance = inputs.renter_insurance_annual / 12.0;

    RentingCosts {
        monthly_rent,
        insurance,
        total: monthly_rent + insurance,
    }
}

fn monthly_value_charge(home_value: f64, annual_rate_percent: f64) -> f64 {
    home_value * (annual_rate_percent / 100.0) / 12.0
}
