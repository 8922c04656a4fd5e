mod error;

use axum::{
    Router,
    extract::{Json, Query},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::core::{
    BuyingCosts, ComparisonSummary, HorizonBucket, LocalMarket, MonthlySnapshot, RentingCosts,
    ResolvedRates, ScenarioInputs, YearSummary, buying_costs, renting_costs, resolve_rates,
    run_simulation_with_rates, summarize, yearly_rollup,
};

pub use error::{ApiError, ApiResult, InputError};

const MAX_YEARS: u32 = 50;

/// Where the growth assumptions of a run come from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum RateMode {
    /// Horizon table, blended with local statistics when supplied.
    #[default]
    Resolved,
    /// Use the appreciation, rent growth and return rates exactly as given.
    Stated,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
enum ApiHorizonBucket {
    Short,
    Medium,
    Long,
}

impl From<HorizonBucket> for ApiHorizonBucket {
    fn from(value: HorizonBucket) -> Self {
        match value {
            HorizonBucket::Short => ApiHorizonBucket::Short,
            HorizonBucket::Medium => ApiHorizonBucket::Medium,
            HorizonBucket::Long => ApiHorizonBucket::Long,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    home_price: Option<f64>,
    down_payment_percent: Option<f64>,
    interest_rate: Option<f64>,
    loan_term_years: Option<u32>,
    time_horizon_years: Option<u32>,
    monthly_rent: Option<f64>,
    property_tax_rate: Option<f64>,
    home_insurance_annual: Option<f64>,
    hoa_monthly: Option<f64>,
    maintenance_rate: Option<f64>,
    renter_insurance_annual: Option<f64>,
    home_appreciation_rate: Option<f64>,
    rent_growth_rate: Option<f64>,
    investment_return_rate: Option<f64>,
    local_appreciation: Option<f64>,
    local_rent_growth: Option<f64>,
    rate_mode: Option<RateMode>,
    rent_month: Option<u32>,
    include_snapshots: Option<bool>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "rentvsbuy compare",
    about = "Compare the net worth of buying a home against renting and investing the difference"
)]
struct Cli {
    #[arg(long, help = "Purchase price of the home")]
    home_price: f64,
    #[arg(long, default_value_t = 20.0, help = "Down payment in percent of price")]
    down_payment_percent: f64,
    #[arg(long, default_value_t = 7.0, help = "Annual mortgage interest rate in percent")]
    interest_rate: f64,
    #[arg(long, default_value_t = 30, help = "Mortgage term in years")]
    loan_term_years: u32,
    #[arg(long, default_value_t = 30, help = "Years the comparison runs for")]
    time_horizon_years: u32,
    #[arg(long, help = "Current monthly rent")]
    monthly_rent: f64,
    #[arg(long, default_value_t = 1.0, help = "Annual property tax in percent of home value")]
    property_tax_rate: f64,
    #[arg(long, default_value_t = 1200.0)]
    home_insurance_annual: f64,
    #[arg(long, default_value_t = 150.0)]
    hoa_monthly: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Annual maintenance in percent of home value"
    )]
    maintenance_rate: f64,
    #[arg(long, default_value_t = 240.0)]
    renter_insurance_annual: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Annual home appreciation in percent, used with --rate-mode=stated"
    )]
    home_appreciation_rate: f64,
    #[arg(
        long,
        default_value_t = 3.5,
        help = "Annual rent growth in percent, used with --rate-mode=stated"
    )]
    rent_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Annual investment return in percent, used with --rate-mode=stated"
    )]
    investment_return_rate: f64,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Local annual home appreciation trend in percent"
    )]
    local_appreciation: Option<f64>,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Local annual rent growth trend in percent"
    )]
    local_rent_growth: Option<f64>,
    #[arg(long, value_enum, default_value_t = RateMode::Resolved)]
    rate_mode: RateMode,
    #[arg(
        long,
        default_value_t = 1,
        help = "Month used for the renting cost preview"
    )]
    rent_month: u32,
    #[arg(long, help = "Include every monthly snapshot in the output")]
    snapshots: bool,
}

#[derive(Copy, Clone, Debug)]
struct ApiOptions {
    rate_mode: RateMode,
    rent_month: u32,
    include_snapshots: bool,
}

#[derive(Debug)]
struct ApiRequest {
    inputs: ScenarioInputs,
    rates: ResolvedRates,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RatesResponse {
    rate_mode: RateMode,
    time_horizon_years: u32,
    horizon_bucket: ApiHorizonBucket,
    local_market: bool,
    rates: ResolvedRates,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CostsResponse {
    rent_month: u32,
    buying_costs: BuyingCosts,
    renting_costs: RentingCosts,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    assumptions: RatesResponse,
    costs: CostsResponse,
    summary: Option<ComparisonSummary>,
    years: Vec<YearSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshots: Option<Vec<MonthlySnapshot>>,
}

fn check_finite(field: &'static str, value: f64) -> Result<f64, InputError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(InputError::NotFinite { field })
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<f64, InputError> {
    if check_finite(field, value)? < 0.0 {
        return Err(InputError::Negative { field });
    }
    Ok(value)
}

fn check_years(field: &'static str, value: u32) -> Result<u32, InputError> {
    if value == 0 || value > MAX_YEARS {
        return Err(InputError::YearsOutOfRange {
            field,
            max: MAX_YEARS,
        });
    }
    Ok(value)
}

fn build_inputs(cli: &Cli) -> Result<ScenarioInputs, InputError> {
    if check_finite("--home-price", cli.home_price)? <= 0.0 {
        return Err(InputError::NotPositive {
            field: "--home-price",
        });
    }

    if !(0.0..=100.0).contains(&check_finite("--down-payment-percent", cli.down_payment_percent)?)
    {
        return Err(InputError::OutOfRange {
            field: "--down-payment-percent",
            min: 0.0,
            max: 100.0,
        });
    }

    let local_market = match (cli.local_appreciation, cli.local_rent_growth) {
        (Some(appreciation), Some(rent_growth)) => LocalMarket::Known {
            home_appreciation_rate: check_finite("--local-appreciation", appreciation)?,
            rent_growth_rate: check_finite("--local-rent-growth", rent_growth)?,
        },
        (None, None) => LocalMarket::Unknown,
        _ => return Err(InputError::IncompleteLocalMarket),
    };

    if cli.rent_month == 0 {
        return Err(InputError::MonthOutOfRange {
            field: "--rent-month",
        });
    }

    Ok(ScenarioInputs {
        home_price: cli.home_price,
        down_payment_percent: cli.down_payment_percent,
        interest_rate: check_non_negative("--interest-rate", cli.interest_rate)?,
        loan_term_years: check_years("--loan-term-years", cli.loan_term_years)?,
        time_horizon_years: check_years("--time-horizon-years", cli.time_horizon_years)?,
        monthly_rent: check_non_negative("--monthly-rent", cli.monthly_rent)?,
        property_tax_rate: check_non_negative("--property-tax-rate", cli.property_tax_rate)?,
        home_insurance_annual: check_non_negative(
            "--home-insurance-annual",
            cli.home_insurance_annual,
        )?,
        hoa_monthly: check_non_negative("--hoa-monthly", cli.hoa_monthly)?,
        maintenance_rate: check_non_negative("--maintenance-rate", cli.maintenance_rate)?,
        renter_insurance_annual: check_non_negative(
            "--renter-insurance-annual",
            cli.renter_insurance_annual,
        )?,
        home_appreciation_rate: check_finite(
            "--home-appreciation-rate",
            cli.home_appreciation_rate,
        )?,
        rent_growth_rate: check_finite("--rent-growth-rate", cli.rent_growth_rate)?,
        investment_return_rate: check_finite(
            "--investment-return-rate",
            cli.investment_return_rate,
        )?,
        local_market,
    })
}

fn api_request_from_cli(cli: &Cli) -> Result<ApiRequest, InputError> {
    let inputs = build_inputs(cli)?;
    let rates = match cli.rate_mode {
        RateMode::Resolved => resolve_rates(inputs.time_horizon_years, &inputs.local_market),
        RateMode::Stated => ResolvedRates {
            home_appreciation_rate: inputs.home_appreciation_rate,
            rent_growth_rate: inputs.rent_growth_rate,
            investment_return_rate: inputs.investment_return_rate,
        },
    };

    Ok(ApiRequest {
        // Previews and the monthly run must agree on growth assumptions.
        inputs: inputs.with_rates(&rates),
        rates,
        options: ApiOptions {
            rate_mode: cli.rate_mode,
            rent_month: cli.rent_month,
            include_snapshots: cli.snapshots,
        },
    })
}

fn api_request_from_payload(payload: ScenarioPayload) -> Result<ApiRequest, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.home_price {
        cli.home_price = v;
    }
    if let Some(v) = payload.down_payment_percent {
        cli.down_payment_percent = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.loan_term_years {
        cli.loan_term_years = v;
    }
    if let Some(v) = payload.time_horizon_years {
        cli.time_horizon_years = v;
    }
    if let Some(v) = payload.monthly_rent {
        cli.monthly_rent = v;
    }

    if let Some(v) = payload.property_tax_rate {
        cli.property_tax_rate = v;
    }
    if let Some(v) = payload.home_insurance_annual {
        cli.home_insurance_annual = v;
    }
    if let Some(v) = payload.hoa_monthly {
        cli.hoa_monthly = v;
    }
    if let Some(v) = payload.maintenance_rate {
        cli.maintenance_rate = v;
    }
    if let Some(v) = payload.renter_insurance_annual {
        cli.renter_insurance_annual = v;
    }

    if let Some(v) = payload.home_appreciation_rate {
        cli.home_appreciation_rate = v;
    }
    if let Some(v) = payload.rent_growth_rate {
        cli.rent_growth_rate = v;
    }
    if let Some(v) = payload.investment_return_rate {
        cli.investment_return_rate = v;
    }
    cli.local_appreciation = payload.local_appreciation;
    cli.local_rent_growth = payload.local_rent_growth;

    if let Some(v) = payload.rate_mode {
        cli.rate_mode = v;
    }
    if let Some(v) = payload.rent_month {
        cli.rent_month = v;
    }
    if let Some(v) = payload.include_snapshots {
        cli.snapshots = v;
    }

    api_request_from_cli(&cli)
}

#[cfg(test)]
fn api_request_from_json(json: &str) -> ApiResult<ApiRequest> {
    let payload = serde_json::from_str::<ScenarioPayload>(json)?;
    Ok(api_request_from_payload(payload)?)
}

fn default_cli_for_api() -> Cli {
    Cli {
        home_price: 500_000.0,
        down_payment_percent: 20.0,
        interest_rate: 7.0,
        loan_term_years: 30,
        time_horizon_years: 7,
        monthly_rent: 2_800.0,
        property_tax_rate: 1.0,
        home_insurance_annual: 1_200.0,
        hoa_monthly: 150.0,
        maintenance_rate: 1.0,
        renter_insurance_annual: 240.0,
        home_appreciation_rate: 3.0,
        rent_growth_rate: 3.5,
        investment_return_rate: 7.0,
        local_appreciation: None,
        local_rent_growth: None,
        rate_mode: RateMode::Resolved,
        rent_month: 1,
        snapshots: false,
    }
}

fn build_rates_response(request: &ApiRequest) -> RatesResponse {
    let inputs = &request.inputs;
    RatesResponse {
        rate_mode: request.options.rate_mode,
        time_horizon_years: inputs.time_horizon_years,
        horizon_bucket: HorizonBucket::from_years(inputs.time_horizon_years).into(),
        local_market: matches!(inputs.local_market, LocalMarket::Known { .. }),
        rates: request.rates,
    }
}

fn build_costs_response(request: &ApiRequest) -> CostsResponse {
    CostsResponse {
        rent_month: request.options.rent_month,
        buying_costs: buying_costs(&request.inputs),
        renting_costs: renting_costs(&request.inputs, request.options.rent_month),
    }
}

fn build_simulate_response(request: &ApiRequest) -> SimulateResponse {
    let snapshots = run_simulation_with_rates(&request.inputs, &request.rates);
    let summary = summarize(&snapshots);
    tracing::debug!(
        months = snapshots.len(),
        breakeven_month = ?summary.and_then(|s| s.breakeven_month),
        "simulation finished"
    );

    SimulateResponse {
        assumptions: build_rates_response(request),
        costs: build_costs_response(request),
        summary,
        years: yearly_rollup(&snapshots),
        snapshots: request.options.include_snapshots.then_some(snapshots),
    }
}

/// Runs one comparison from command-line flags and returns pretty-printed JSON.
pub fn run_cli_comparison<I, T>(args: I) -> ApiResult<String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let request = api_request_from_cli(&cli)?;
    let response = build_simulate_response(&request);
    Ok(serde_json::to_string_pretty(&response)?)
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/healthz", get(healthz_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route("/api/costs", get(costs_get_handler).post(costs_post_handler))
        .route("/api/rates", get(rates_get_handler).post(rates_post_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "rent-vs-buy HTTP API listening");

    axum::serve(listener, app).await
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<ScenarioPayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn costs_get_handler(Query(payload): Query<ScenarioPayload>) -> Response {
    costs_handler_impl(payload)
}

async fn costs_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    costs_handler_impl(payload)
}

async fn rates_get_handler(Query(payload): Query<ScenarioPayload>) -> Response {
    rates_handler_impl(payload)
}

async fn rates_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    rates_handler_impl(payload)
}

fn simulate_handler_impl(payload: ScenarioPayload) -> Response {
    match api_request_from_payload(payload) {
        Ok(request) => {
            tracing::info!(
                horizon_years = request.inputs.time_horizon_years,
                rate_mode = ?request.options.rate_mode,
                "running simulation"
            );
            json_response(StatusCode::OK, build_simulate_response(&request))
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn costs_handler_impl(payload: ScenarioPayload) -> Response {
    match api_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_costs_response(&request)),
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn rates_handler_impl(payload: ScenarioPayload) -> Response {
    match api_request_from_payload(payload) {
        Ok(request) => json_response(StatusCode::OK, build_rates_response(&request)),
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(status, serde_json::json!({ "error": msg }))
}
