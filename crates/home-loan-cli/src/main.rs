mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::comparison::CompareArgs;
use commands::loan::{PaymentArgs, ScheduleArgs, SummaryArgs, TermArgs};

/// Fixed-rate home loan calculations
#[derive(Parser)]
#[command(
    name = "hlc",
    version,
    about = "Fixed-rate home loan calculator",
    long_about = "A CLI for fixed-rate home loan calculations with decimal precision. \
                  Computes monthly payments, amortisation schedules, payoff terms, \
                  and compares an original loan against a modified one."
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
    /// Calculate the fixed monthly payment
    Payment(PaymentArgs),
    /// Build the month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Loan summary: payment, interest paid, payoff date
    Summary(SummaryArgs),
    /// Estimate how long a monthly payment takes to repay a loan
    Term(TermArgs),
    /// Compare an original loan with a modified one
    Compare(CompareArgs),
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
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::loan::run_payment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Summary(args) => commands::loan::run_summary(args),
        Commands::Term(args) => commands::loan::run_term(args),
        Commands::Compare(args) => commands::comparison::run_compare(args),
        Commands::Version => {
            println!("hlc {}", env!("CARGO_PKG_VERSION"));
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
