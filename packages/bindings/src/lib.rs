use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use simcalc_core::reaction::percentile::ReferencePopulation;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Depreciation
// ---------------------------------------------------------------------------

#[napi]
pub fn depreciation_schedule(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::depreciation::schedule::DepreciationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = simcalc_core::depreciation::schedule::build_depreciation_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_schedule(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::loan::amortization::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        simcalc_core::loan::amortization::build_loan_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Same schedule, thinned to the first month and every twelfth month.
#[napi]
pub fn loan_annual_checkpoints(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::loan::amortization::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut output =
        simcalc_core::loan::amortization::build_loan_schedule(&input).map_err(to_napi_error)?;
    output.result.periods = simcalc_core::loan::amortization::annual_checkpoints(&output.result);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Investment
// ---------------------------------------------------------------------------

#[napi]
pub fn investment_projection(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::investment::growth::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        simcalc_core::investment::growth::project_investment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cost-volume-profit
// ---------------------------------------------------------------------------

#[napi]
pub fn break_even(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::cvp::break_even::CvpInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        simcalc_core::cvp::break_even::calculate_break_even(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn cvp_chart(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::cvp::break_even::CvpInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let points = simcalc_core::cvp::break_even::build_cvp_chart(&input).map_err(to_napi_error)?;
    serde_json::to_string(&points).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reaction time
// ---------------------------------------------------------------------------

#[napi]
pub fn reaction_rank(input_json: String) -> NapiResult<String> {
    let input: simcalc_core::reaction::percentile::ReactionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        simcalc_core::reaction::percentile::estimate_rank(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct DensityCurveInput {
    #[serde(default)]
    population: ReferencePopulation,
    player_mean: Decimal,
}

#[napi]
pub fn density_curve(input_json: String) -> NapiResult<String> {
    let input: DensityCurveInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let points =
        simcalc_core::reaction::percentile::density_curve(&input.population, input.player_mean)
            .map_err(to_napi_error)?;
    serde_json::to_string(&points).map_err(to_napi_error)
}
