use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use super::{ensure_rows, money_cells, SCHEDULE_COLUMNS};
use crate::amortization::PaymentPlan;
use crate::AmortizationResult;

/// Write the schedule as CSV with the spreadsheet column headers.
pub fn write_plan_csv<W: io::Write>(plan: &PaymentPlan, writer: W) -> AmortizationResult<()> {
    ensure_rows(plan)?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(SCHEDULE_COLUMNS)?;

    for row in &plan.rows {
        let mut record = vec![row.period.to_string()];
        record.extend(money_cells(row).iter().map(|v| format!("{v:.2}")));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_plan_csv(plan: &PaymentPlan, path: impl AsRef<Path>) -> AmortizationResult<PathBuf> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_plan_csv(plan, file)?;
    Ok(path.to_path_buf())
}
