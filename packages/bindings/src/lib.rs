use napi::bindgen_prelude::Buffer;
use napi::Result as NapiResult;
use napi_derive::napi;

use amortization_core::amortization::{self, LoanInput};
use amortization_core::export::xlsx;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_loan(input_json: &str) -> NapiResult<LoanInput> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

/// Schedule only: `{ monthly_rate, monthly_payment, rows }`.
#[napi]
pub fn compute_plan(input_json: String) -> NapiResult<String> {
    let input = parse_loan(&input_json)?;
    let plan = amortization::compute_plan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&plan).map_err(to_napi_error)
}

/// Summary and schedule in the standard envelope, money rounded to `dp`
/// places when given.
#[napi]
pub fn amortize(input_json: String, dp: Option<u32>) -> NapiResult<String> {
    let input = parse_loan(&input_json)?;
    let mut output = amortization::amortize(&input).map_err(to_napi_error)?;
    if let Some(dp) = dp {
        output.result = output.result.rounded(dp);
    }
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Workbook bytes for a download, one sheet named `Amortización`.
#[napi]
pub fn export_plan_xlsx(input_json: String) -> NapiResult<Buffer> {
    let input = parse_loan(&input_json)?;
    let plan = amortization::compute_plan(&input).map_err(to_napi_error)?;
    let bytes = xlsx::plan_to_xlsx_bytes(&plan).map_err(to_napi_error)?;
    Ok(Buffer::from(bytes))
}

#[napi]
pub fn default_export_file_name() -> String {
    amortization_core::export::DEFAULT_XLSX_FILE_NAME.to_string()
}
