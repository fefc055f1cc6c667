use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fintrack_core::loans::amortization;
use fintrack_core::loans::form::{LoanForm, LoanRepaymentForm, PrincipalLoanForm};
use fintrack_core::loans::payment;
use fintrack_core::validation::iso_date;

use crate::input;

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct LoanScheduleArgs {
    /// Path to JSON/YAML input file in any loan shape (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan name
    #[arg(long, default_value = "Loan")]
    pub name: String,

    /// Contractual term in months
    #[arg(long)]
    pub total_months: Option<i64>,

    /// Fixed monthly installment
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,

    /// Nominal annual interest rate in percent (12 = 12%)
    #[arg(long, alias = "rate", default_value = "0")]
    pub interest_percent: Decimal,

    /// Installments already paid
    #[arg(long, default_value_t = 0)]
    pub paid_months: i64,

    /// Currency code
    #[arg(long, env = "FINTRACK_DEFAULT_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Reference date for principal-first input (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub as_of: Option<String>,
}

/// Arguments for a principal-first payment calculation
#[derive(Args)]
pub struct LoanPaymentArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual interest rate in percent
    #[arg(long, alias = "rate", default_value = "0")]
    pub interest_percent: Decimal,

    /// Term in months
    #[arg(long)]
    pub term_months: Option<i64>,

    /// First repayment date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Currency code
    #[arg(long, env = "FINTRACK_DEFAULT_CURRENCY", default_value = "USD")]
    pub currency: String,

    /// Date to count paid months up to (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub as_of: Option<String>,
}

fn resolve_as_of(as_of: Option<&str>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match as_of {
        Some(text) => Ok(iso_date("asOf", text)?),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn run_loan_schedule(args: LoanScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = resolve_as_of(args.as_of.as_deref())?;
    let form: LoanForm = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        LoanForm::Repayment(LoanRepaymentForm {
            loan_name: args.name,
            total_month: args
                .total_months
                .ok_or("--total-months is required (or provide --input)")?,
            amount_per_month: args
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
            interest_percent: args.interest_percent,
            currency: args.currency,
            paid_months: Some(args.paid_months),
        })
    };

    let record = form.validate(as_of)?;
    tracing::info!(loan = %record.loan_name, "computing amortization schedule");
    let result = amortization::build_loan_report(&record.plan);
    Ok(serde_json::to_value(result)?)
}

pub fn run_loan_payment(args: LoanPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = resolve_as_of(args.as_of.as_deref())?;
    let form: PrincipalLoanForm = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        PrincipalLoanForm {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            interest_rate_annual: args.interest_percent,
            currency: args.currency,
            start_date: args
                .start_date
                .unwrap_or_else(|| as_of.format("%Y-%m-%d").to_string()),
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            description: None,
        }
    };

    let loan = form.validate()?;
    let result = payment::calculate_loan_payment(&loan, as_of)?;
    Ok(serde_json::to_value(result)?)
}
