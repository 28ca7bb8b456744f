use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use amortization_core::amortization::{self, LoanInput, CURRENCY_DP};
use amortization_core::export::{csv_out, xlsx, DEFAULT_XLSX_FILE_NAME};
use amortization_core::{AmortizationResult, ComputationOutput};

use crate::input;

/// Arguments for an amortization plan
#[derive(Args)]
pub struct PlanArgs {
    /// Annual interest rate in percent (e.g. 12.5)
    #[arg(long, alias = "tasa")]
    pub rate: Option<Decimal>,

    /// Loan amount
    #[arg(long, alias = "monto")]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "plazo")]
    pub term: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Also save the schedule as an Excel workbook
    #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_XLSX_FILE_NAME)]
    pub xlsx: Option<PathBuf>,

    /// Also save the schedule as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Decimal places for money in the printed output
    #[arg(long, default_value_t = CURRENCY_DP)]
    pub precision: u32,
}

pub fn run_plan(args: PlanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = resolve_loan(&args)?;
    let output = amortization::amortize(&loan)?;
    let plan = output.result.plan();

    let mut exports = Vec::new();
    if let Some(ref path) = args.xlsx {
        exports.push(export_record("xlsx", path, xlsx::save_plan_xlsx(&plan, path)));
    }
    if let Some(ref path) = args.csv {
        exports.push(export_record("csv", path, csv_out::save_plan_csv(&plan, path)));
    }

    let mut value = serde_json::to_value(ComputationOutput {
        result: output.result.rounded(args.precision),
        ..output
    })?;
    if !exports.is_empty() {
        value["exports"] = Value::Array(exports);
    }
    Ok(value)
}

/// Export failures are reported alongside the plan instead of replacing it.
pub fn has_failed_export(value: &Value) -> bool {
    value
        .get("exports")
        .and_then(Value::as_array)
        .is_some_and(|e| e.iter().any(|x| x.get("error").is_some()))
}

fn resolve_loan(args: &PlanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    let flags_given = args.rate.is_some() || args.principal.is_some() || args.term.is_some();
    if args.input.is_some() || !flags_given {
        if let Some(loan) = input::loan_from_file_or_stdin(args.input.as_deref())? {
            return Ok(loan);
        }
    }

    Ok(LoanInput {
        annual_rate_percent: args
            .rate
            .ok_or("--rate is required (or provide --input)")?,
        principal: args
            .principal
            .ok_or("--principal is required (or provide --input)")?,
        term_months: args.term.ok_or("--term is required (or provide --input)")?,
    })
}

fn export_record(
    format: &str,
    path: &Path,
    outcome: AmortizationResult<PathBuf>,
) -> Value {
    match outcome {
        Ok(written) => {
            info!(format, path = %written.display(), "schedule exported");
            json!({"format": format, "path": written.display().to_string(), "status": "saved"})
        }
        Err(e) => {
            error!(format, path = %path.display(), error = %e, "schedule export failed");
            json!({
                "format": format,
                "path": path.display().to_string(),
                "status": "failed",
                "error": e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(dir: &Path) -> PlanArgs {
        PlanArgs {
            rate: Some(dec!(12.5)),
            principal: Some(dec!(10000)),
            term: Some(12),
            input: None,
            xlsx: Some(dir.join(DEFAULT_XLSX_FILE_NAME)),
            csv: None,
            precision: CURRENCY_DP,
        }
    }

    #[test]
    fn test_plan_from_flags_with_export() {
        let dir = tempfile::tempdir().unwrap();
        let value = run_plan(args(dir.path())).unwrap();

        assert_eq!(value["result"]["summary"]["monthly_payment"], "887.72");
        assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 12);
        assert_eq!(value["exports"][0]["status"], "saved");
        assert!(dir.path().join(DEFAULT_XLSX_FILE_NAME).exists());
        assert!(!has_failed_export(&value));
    }

    #[test]
    fn test_failed_export_keeps_plan() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path());
        a.xlsx = Some(dir.path().join("missing").join("plan.xlsx"));

        let value = run_plan(a).unwrap();
        assert_eq!(value["result"]["schedule"].as_array().unwrap().len(), 12);
        assert!(has_failed_export(&value));
    }

    #[test]
    fn test_invalid_term_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path());
        a.term = Some(0);
        a.xlsx = None;
        let err = run_plan(a).unwrap_err();
        assert!(err.to_string().contains("term_months"));
    }
}
