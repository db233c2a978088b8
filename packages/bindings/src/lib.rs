use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan arithmetic
// ---------------------------------------------------------------------------

#[napi]
pub fn monthly_payment(input_json: String) -> NapiResult<String> {
    let input: refinance_core::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = refinance_core::annuity::calculate_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: refinance_core::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        refinance_core::amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_costs(input_json: String) -> NapiResult<String> {
    let input: refinance_core::costs::LoanCostsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = refinance_core::costs::calculate_loan_costs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn break_even(input_json: String) -> NapiResult<String> {
    let input: refinance_core::break_even::BreakEvenInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        refinance_core::break_even::analyze_break_even(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Refinancing
// ---------------------------------------------------------------------------

#[napi]
pub fn refinancing_offers(input_json: String) -> NapiResult<String> {
    let input: refinance_core::offers::RefinancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = refinance_core::offers::rank_offers(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_refinancing(input_json: String) -> NapiResult<String> {
    let input: refinance_core::offers::RefinancingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        refinance_core::analysis::analyze_refinancing(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Analysis straight from the raw form fields. Returns `"null"` while the
/// form is still incomplete.
#[napi]
pub fn analyze_form(form_json: String) -> NapiResult<String> {
    let form: refinance_core::form::LoanForm =
        serde_json::from_str(&form_json).map_err(to_napi_error)?;
    let output = refinance_core::form::analyze_form(&form, None).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn default_catalog() -> NapiResult<String> {
    serde_json::to_string(&refinance_core::offers::OfferCatalog::default()).map_err(to_napi_error)
}
