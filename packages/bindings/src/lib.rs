use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use lending_core::calendar::deserialize_day;
use lending_core::TermUnit;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_periodic_payment(input_json: String) -> NapiResult<String> {
    let input: lending_core::amortization::payment::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::amortization::payment::calculate_periodic_payment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn summarize_loan(input_json: String) -> NapiResult<String> {
    let input: lending_core::amortization::summary::LoanSummaryInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        lending_core::amortization::summary::summarize_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct EndDateInput {
    #[serde(deserialize_with = "deserialize_day")]
    first_due_date: chrono::NaiveDate,
    term_length: u32,
    #[serde(default)]
    term_unit: TermUnit,
}

#[napi]
pub fn calculate_end_date(input_json: String) -> NapiResult<String> {
    let input: EndDateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let end_date = lending_core::amortization::schedule::calculate_end_date(
        input.first_due_date,
        input.term_length,
        input.term_unit,
    )
    .map_err(to_napi_error)?;
    Ok(end_date.to_string())
}

// ---------------------------------------------------------------------------
// Penalties
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_late_penalty(input_json: String) -> NapiResult<String> {
    let input: lending_core::penalty::late_fee::PenaltyInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let result =
        lending_core::penalty::late_fee::calculate_late_penalty(&input).map_err(to_napi_error)?;
    let mut value = serde_json::to_value(&result).map_err(to_napi_error)?;
    if let serde_json::Value::Object(ref mut map) = value {
        let status = lending_core::penalty::status::PenaltyStatus::from(&result);
        map.insert("status".into(), serde_json::Value::String(status.to_string()));
        map.insert(
            "description".into(),
            serde_json::Value::String(lending_core::penalty::status::describe_penalty_status(
                &result,
            )),
        );
    }
    serde_json::to_string(&value).map_err(to_napi_error)
}

#[napi]
pub fn reassess_installments(input_json: String) -> NapiResult<String> {
    let input: lending_core::penalty::reassessment::ReassessmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = lending_core::penalty::reassessment::reassess_installments(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Amounts are decimal strings, e.g. `"1866.66"`.
#[napi]
pub fn calculate_payment_progress(paid_amount: String, total_amount: String) -> NapiResult<String> {
    let paid: Decimal = paid_amount.trim().parse().map_err(to_napi_error)?;
    let total: Decimal = total_amount.trim().parse().map_err(to_napi_error)?;
    let progress =
        lending_core::progress::calculate_payment_progress(paid, total).map_err(to_napi_error)?;
    Ok(progress.to_string())
}
