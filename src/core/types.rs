use serde::Serialize;

/// Local market statistics for the property's area, if the caller has any.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub enum LocalMarket {
    #[default]
    Unknown,
    Known {
        home_appreciation_rate: f64,
        rent_growth_rate: f64,
    },
}

/// One buy-vs-rent scenario. Percentages are whole numbers, 7.0 means 7%.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioInputs {
    pub home_price: f64,
    pub down_payment_percent: f64,
    pub interest_rate: f64,
    pub loan_term_years: u32,
    pub time_horizon_years: u32,
    pub monthly_rent: f64,
    pub property_tax_rate: f64,
    pub home_insurance_annual: f64,
    pub hoa_monthly: f64,
    pub maintenance_rate: f64,
    pub renter_insurance_annual: f64,
    pub home_appreciation_rate: f64,
    pub rent_growth_rate: f64,
    pub investment_return_rate: f64,
    pub local_market: LocalMarket,
}

impl ScenarioInputs {
    pub fn down_payment_amount(&self) -> f64 {
        self.home_price * (self.down_payment_percent / 100.0)
    }

    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment_amount()
    }

    pub fn horizon_months(&self) -> u32 {
        self.time_horizon_years * 12
    }

    /// Overwrites the stated growth assumptions with the ones a run will actually use.
    pub fn with_rates(mut self, rates: &ResolvedRates) -> Self {
        self.home_appreciation_rate = rates.home_appreciation_rate;
        self.rent_growth_rate = rates.rent_growth_rate;
        self.investment_return_rate = rates.investment_return_rate;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationEntry {
    pub month: u32,
    pub payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedRates {
    pub home_appreciation_rate: f64,
    pub rent_growth_rate: f64,
    pub investment_return_rate: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyingCosts {
    pub mortgage: f64,
    pub property_tax: f64,
    pub insurance: f64,
    pub hoa: f64,
    pub maintenance: f64,
    pub total: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentingCosts {
    pub monthly_rent: f64,
    pub insurance: f64,
    pub total: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: u32,
    pub mortgage_payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
    pub home_value: f64,
    pub home_equity: f64,
    pub mortgage_insurance: f64,
    pub monthly_buying_costs: f64,
    pub monthly_rent: f64,
    pub monthly_renting_costs: f64,
    pub invested_down_payment: f64,
    pub buyer_cash_account: f64,
    pub selling_costs: f64,
    pub buyer_net_worth: f64,
    pub renter_net_worth: f64,
    pub net_worth_delta: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Buy,
    Rent,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub months: u32,
    pub total_interest_paid: f64,
    pub total_principal_paid: f64,
    pub total_buying_costs: f64,
    pub total_renting_costs: f64,
    pub final_home_value: f64,
    pub final_investment_value: f64,
    pub final_buyer_net_worth: f64,
    pub final_renter_net_worth: f64,
    pub final_net_worth_delta: f64,
    pub breakeven_month: Option<u32>,
    pub verdict: Verdict,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: u32,
    pub home_value: f64,
    pub home_equity: f64,
    pub remaining_balance: f64,
    pub monthly_rent: f64,
    pub buying_costs: f64,
    pub renting_costs: f64,
    pub buyer_net_worth: f64,
    pub renter_net_worth: f64,
    pub net_worth_delta: f64,
}
