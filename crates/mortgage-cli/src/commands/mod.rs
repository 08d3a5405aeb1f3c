pub mod products;
pub mod schedule;

use mortgage_core::amortization::LoanInput;

use crate::input;

/// Read the loan description from --input or piped stdin.
pub(crate) fn read_loan(path: &Option<String>) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("--input <file.json> or stdin required for the loan description".into())
    }
}
