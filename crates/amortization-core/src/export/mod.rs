//! Spreadsheet serialization of a payment plan.
//!
//! Both writers emit the same five columns, in this order, with money
//! rounded to cents.

pub mod csv_out;
pub mod xlsx;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::amortization::{PaymentPlan, PaymentPlanRow, CURRENCY_DP};
use crate::error::AmortizationError;
use crate::AmortizationResult;

/// Column headers of the exported schedule.
pub const SCHEDULE_COLUMNS: [&str; 5] = [
    "Mes",
    "Pago Mensual",
    "Interés",
    "Abono a Capital",
    "Saldo Restante",
];

/// Default file name offered for the workbook.
pub const DEFAULT_XLSX_FILE_NAME: &str = "Plan_Amortizacion.xlsx";

/// Name of the single worksheet.
pub const SHEET_NAME: &str = "Amortización";

/// Money columns of one row, rounded for output, in column order.
fn money_cells(row: &PaymentPlanRow) -> [Decimal; 4] {
    [
        row.monthly_payment.round_dp(CURRENCY_DP),
        row.interest.round_dp(CURRENCY_DP),
        row.principal_portion.round_dp(CURRENCY_DP),
        row.remaining_balance.round_dp(CURRENCY_DP),
    ]
}

fn to_cell_number(value: Decimal, period: u32) -> AmortizationResult<f64> {
    value.to_f64().ok_or_else(|| {
        AmortizationError::ExportFailure(format!(
            "value {value} in period {period} cannot be written as a number"
        ))
    })
}

fn ensure_rows(plan: &PaymentPlan) -> AmortizationResult<()> {
    if plan.rows.is_empty() {
        return Err(AmortizationError::ExportFailure(
            "payment plan has no rows".into(),
        ));
    }
    Ok(())
}
