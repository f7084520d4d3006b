use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use bizfin_core::config::{EngineConfig, ValuationAssumptions};
use bizfin_core::validation::{self, ValidationRule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Optional engine config passed alongside a request. Absent or empty means
/// built-in defaults.
fn parse_config(config_json: Option<String>) -> NapiResult<EngineConfig> {
    match config_json.as_deref().map(str::trim) {
        None | Some("") => Ok(EngineConfig::default()),
        Some(json) => serde_json::from_str(json).map_err(to_napi_error),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FieldRequest {
    name: String,
    #[serde(default)]
    value: String,
    rule: ValidationRule,
}

/// Validate a batch of form fields. Returns `{"values": {...}}` or
/// `{"errors": [...]}`; only malformed requests raise.
#[napi]
pub fn validate_fields(input_json: String) -> NapiResult<String> {
    let fields: Vec<FieldRequest> = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut validator = validation::FieldValidator::new();
    for f in &fields {
        validator.field(&f.name, &f.value, &f.rule);
    }
    let body = match validator.finish() {
        Ok(values) => serde_json::json!({ "values": values }),
        Err(errors) => serde_json::json!({ "errors": errors }),
    };
    serde_json::to_string(&body).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Break-even
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_break_even(input_json: String) -> NapiResult<String> {
    let input: bizfin_core::break_even::BreakEvenInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bizfin_core::break_even::calculate_break_even(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ValuationRequest {
    #[serde(flatten)]
    metrics: bizfin_core::valuation::FinancialMetrics,
    #[serde(default)]
    assumptions: Option<ValuationAssumptions>,
}

#[napi]
pub fn calculate_valuations(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let request: ValuationRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = match request.assumptions {
        Some(a) => a,
        None => parse_config(config_json)?.valuation,
    };
    let output = bizfin_core::valuation::calculate_valuations(&request.metrics, &assumptions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cash flow
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flows(
    input_json: String,
    periods: u32,
    config_json: Option<String>,
) -> NapiResult<String> {
    let data = bizfin_core::cash_flow::CashFlowData::from_json_str(&input_json)
        .map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = bizfin_core::cash_flow::project_cash_flows(&data, periods, &config.projection)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_expected(input_json: String) -> NapiResult<String> {
    let scenarios: Vec<bizfin_core::scenarios::Scenario> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bizfin_core::scenarios::compute_expected(&scenarios).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `new_value` is a decimal string (e.g. "33.5") so no precision is lost
/// crossing from JavaScript numbers.
#[napi]
pub fn rebalance_probabilities(
    input_json: String,
    changed_id: String,
    new_value: String,
) -> NapiResult<String> {
    let scenarios: Vec<bizfin_core::scenarios::Scenario> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let value: rust_decimal::Decimal = new_value.trim().parse().map_err(to_napi_error)?;
    let output = bizfin_core::scenarios::rebalance_probabilities(&scenarios, &changed_id, value)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Startup costs
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_startup_costs(input_json: String) -> NapiResult<String> {
    let input: bizfin_core::startup_costs::StartupCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        bizfin_core::startup_costs::estimate_startup_costs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
