use clap::Args;
use serde_json::Value;

use mortgage_core::amortization;

use crate::commands::read_loan;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan description as a JSON file (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Omit the month-by-month schedule, keep only the headline figures
    #[arg(long)]
    pub summary: bool,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = read_loan(&args.input)?;
    let result = amortization::compute_schedule(&loan)?;
    let mut value = serde_json::to_value(result)?;

    if args.summary {
        if let Some(obj) = value.get_mut("result").and_then(Value::as_object_mut) {
            obj.remove("schedule");
        }
    }

    Ok(value)
}
