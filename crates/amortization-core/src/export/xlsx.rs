use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};

use super::{ensure_rows, money_cells, to_cell_number, SCHEDULE_COLUMNS, SHEET_NAME};
use crate::amortization::PaymentPlan;
use crate::AmortizationResult;

const MONEY_FORMAT: &str = "#,##0.00";

/// Lay the plan out on a single worksheet: header row, then one row per month.
pub fn plan_to_workbook(plan: &PaymentPlan) -> AmortizationResult<Workbook> {
    ensure_rows(plan)?;

    let mut workbook = Workbook::new();
    let money = Format::new().set_num_format(MONEY_FORMAT);
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in SCHEDULE_COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for row in &plan.rows {
        let line = row.period;
        worksheet.write_number(line, 0, f64::from(row.period))?;
        for (offset, value) in money_cells(row).into_iter().enumerate() {
            let number = to_cell_number(value, row.period)?;
            worksheet.write_number_with_format(line, offset as u16 + 1, number, &money)?;
        }
    }

    Ok(workbook)
}

/// Serialize the workbook in memory, e.g. for a download response.
pub fn plan_to_xlsx_bytes(plan: &PaymentPlan) -> AmortizationResult<Vec<u8>> {
    let mut workbook = plan_to_workbook(plan)?;
    Ok(workbook.save_to_buffer()?)
}

/// Write the workbook to `path` and return the path written.
pub fn save_plan_xlsx(plan: &PaymentPlan, path: impl AsRef<Path>) -> AmortizationResult<PathBuf> {
    let path = path.as_ref();
    let mut workbook = plan_to_workbook(plan)?;
    workbook.save(path)?;
    Ok(path.to_path_buf())
}
