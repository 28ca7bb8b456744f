pub mod file;
pub mod stdin;

use amortization_core::amortization::LoanInput;

/// Loan terms from `--input <file>` or, failing that, piped stdin.
pub fn loan_from_file_or_stdin(
    path: Option<&str>,
) -> Result<Option<LoanInput>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    stdin::read_stdin_json()
}
