mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortization::{EndDateArgs, PaymentArgs, ProgressArgs, ScheduleArgs};
use commands::penalty::{PenaltyArgs, ReassessArgs};

/// Loan installment schedules and late-payment penalties
#[derive(Parser)]
#[command(
    name = "lend",
    version,
    about = "Loan installment schedules and late-payment penalties",
    long_about = "A CLI for consumer-loan arithmetic with decimal precision. Computes \
                  periodic installments (simple or French annuity), full repayment \
                  schedules, maturity dates, late penalties and repayment progress."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. info, debug, lending_core=trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the periodic installment, total interest and total owed
    Payment(PaymentArgs),
    /// Generate the full repayment schedule with a loan summary
    Schedule(ScheduleArgs),
    /// Due date of the last installment
    EndDate(EndDateArgs),
    /// Assess the late penalty on one installment
    Penalty(PenaltyArgs),
    /// Refresh statuses and penalties across a stored installment list
    Reassess(ReassessArgs),
    /// Percentage of the total amount already repaid
    Progress(ProgressArgs),
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

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Schedule(args) => commands::amortization::run_schedule(args),
        Commands::EndDate(args) => commands::amortization::run_end_date(args),
        Commands::Penalty(args) => commands::penalty::run_penalty(args),
        Commands::Reassess(args) => commands::penalty::run_reassess(args),
        Commands::Progress(args) => commands::amortization::run_progress(args),
        Commands::Version => {
            println!("lend {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_schedule_flags() {
        let cli = Cli::try_parse_from([
            "lend",
            "schedule",
            "--principal",
            "5000",
            "--rate",
            "24",
            "--term",
            "6",
            "--method",
            "french",
            "--first-due-date",
            "2025-02-01",
            "--output",
            "table",
        ])
        .unwrap();
        assert!(matches!(cli.output, OutputFormat::Table));
        match cli.command {
            Commands::Schedule(args) => {
                assert_eq!(args.loan.term_length, Some(6));
                assert_eq!(args.loan.interest_method, lending_core::InterestMethod::French);
                assert_eq!(args.first_due_date.map(|d| d.to_string()).as_deref(), Some("2025-02-01"));
            }
            _ => panic!("expected schedule"),
        }
    }
}
