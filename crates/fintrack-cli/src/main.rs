mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::expenses::ExpenseSummaryArgs;
use commands::goals::GoalProjectionArgs;
use commands::loans::{LoanPaymentArgs, LoanScheduleArgs};
use config::LogFormat;

/// Personal finance calculations: loans, savings goals, expenses
#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance calculations with decimal precision",
    long_about = "A CLI for loan amortization schedules, principal-first loan payments, \
                  savings-goal projections and expense summaries. Inputs come from flags, \
                  a JSON/YAML file, or JSON on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true, env = "FINTRACK_OUTPUT")]
    output: OutputFormat,

    /// Log line format on stderr (filter with RUST_LOG)
    #[arg(long, default_value = "text", global = true, env = "FINTRACK_LOG_FORMAT")]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Amortization schedule for a fixed-installment loan
    LoanSchedule(LoanScheduleArgs),
    /// Monthly payment and totals for a loan given its principal
    LoanPayment(LoanPaymentArgs),
    /// Project when a savings goal is reached at a monthly contribution
    GoalProjection(GoalProjectionArgs),
    /// Expense totals by category and by day/week/month
    ExpenseSummary(ExpenseSummaryArgs),
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
    config::load_env_file();
    let cli = Cli::parse();
    config::init_tracing(cli.log_format);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::LoanSchedule(args) => commands::loans::run_loan_schedule(args),
        Commands::LoanPayment(args) => commands::loans::run_loan_payment(args),
        Commands::GoalProjection(args) => commands::goals::run_goal_projection(args),
        Commands::ExpenseSummary(args) => commands::expenses::run_expense_summary(args),
        Commands::Version => {
            println!("fintrack {}", env!("CARGO_PKG_VERSION"));
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
