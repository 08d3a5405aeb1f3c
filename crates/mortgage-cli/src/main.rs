mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::products::{AnalyzeArgs, CombinedArgs};
use commands::schedule::ScheduleArgs;

/// Mortgage amortization and bank-product benefit analysis
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Mortgage amortization and bank-product benefit analysis",
    long_about = "Computes month-by-month amortization schedules under fixed, \
                  variable, or mixed rate regimes with decimal precision, and \
                  evaluates whether bank add-on products (payroll deposit, home \
                  or life insurance) are worth their monthly cost given the rate \
                  discount they grant."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the full amortization schedule for a loan
    Schedule(ScheduleArgs),
    /// Evaluate each bank product's cost/benefit in isolation
    Analyze(AnalyzeArgs),
    /// Amortize with the selected products' discounts applied
    Combined(CombinedArgs),
    /// Print the standard bank-product catalog
    Products,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Analyze(args) => commands::products::run_analyze(args),
        Commands::Combined(args) => commands::products::run_combined(args),
        Commands::Products => commands::products::run_catalog(),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
