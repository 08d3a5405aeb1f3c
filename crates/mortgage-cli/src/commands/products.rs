use clap::Args;
use serde_json::Value;

use mortgage_core::products::{self, BankProduct};

use crate::commands::read_loan;
use crate::input;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Loan description as a JSON file (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Product list as a JSON file; defaults to the standard catalog
    #[arg(long)]
    pub products: Option<String>,
}

#[derive(Args)]
pub struct CombinedArgs {
    /// Loan description as a JSON file (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Product list as a JSON file; defaults to the standard catalog
    #[arg(long)]
    pub products: Option<String>,

    /// Omit the month-by-month schedule, keep only the headline figures
    #[arg(long)]
    pub summary: bool,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = read_loan(&args.input)?;
    let product_list = read_products(&args.products)?;
    let result = products::analyze_products(&loan, &product_list)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_combined(args: CombinedArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = read_loan(&args.input)?;
    let product_list = read_products(&args.products)?;
    let result = products::compute_with_selected(&loan, &product_list)?;
    let mut value = serde_json::to_value(result)?;

    if args.summary {
        if let Some(obj) = value.get_mut("result").and_then(Value::as_object_mut) {
            obj.remove("schedule");
        }
    }

    Ok(value)
}

pub fn run_catalog() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(products::standard_products())?)
}

fn read_products(path: &Option<String>) -> Result<Vec<BankProduct>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => input::file::read_json(path),
        None => Ok(products::standard_products()),
    }
}
