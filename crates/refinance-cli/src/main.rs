mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{BreakEvenArgs, CostsArgs, LoanTermsArgs};
use commands::refinance::{CatalogArgs, RefinanceArgs};

/// Loan refinancing calculator
#[derive(Parser)]
#[command(
    name = "refi",
    version,
    about = "Loan refinancing calculator",
    long_about = "Compares a current loan against refinancing offers with decimal \
                  precision. Computes annuity payments, amortization schedules, \
                  total costs and break-even points, and ranks offers by total savings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the fixed monthly payment of a loan
    Payment(LoanTermsArgs),
    /// Build a month-by-month amortization schedule
    Schedule(LoanTermsArgs),
    /// Total payments, interest and cost including one-time fees
    Costs(CostsArgs),
    /// Months of savings needed to recover a refinancing cost
    BreakEven(BreakEvenArgs),
    /// Rank refinancing offers against the current loan
    Offers(RefinanceArgs),
    /// Full refinancing analysis with recommendation and savings series
    Analyze(RefinanceArgs),
    /// Print the built-in offer catalog, or validate a catalog file
    Catalog(CatalogArgs),
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

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Costs(args) => commands::loan::run_costs(args),
        Commands::BreakEven(args) => commands::loan::run_break_even(args),
        Commands::Offers(args) => commands::refinance::run_offers(args),
        Commands::Analyze(args) => commands::refinance::run_analyze(args),
        Commands::Catalog(args) => commands::refinance::run_catalog(args),
        Commands::Version => {
            println!("refi {}", env!("CARGO_PKG_VERSION"));
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
