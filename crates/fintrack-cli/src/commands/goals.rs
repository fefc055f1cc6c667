use chrono::Local;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fintrack_core::goals::form::GoalProjectionRequest;
use fintrack_core::goals::projection;
use fintrack_core::CurrencyCode;

use crate::input;

/// Arguments for a savings-goal projection
#[derive(Args)]
pub struct GoalProjectionArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount to reach
    #[arg(long)]
    pub target_amount: Option<Decimal>,

    /// Amount saved so far
    #[arg(long, default_value = "0")]
    pub current_amount: Decimal,

    /// Date the goal should be met by (YYYY-MM-DD)
    #[arg(long)]
    pub target_date: Option<String>,

    /// Hypothetical contribution per month (must be > 0)
    #[arg(long)]
    pub monthly_saving: Option<Decimal>,

    /// Projection start date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub as_of: Option<String>,

    /// Currency code, also used when the input file has none
    #[arg(long, env = "FINTRACK_DEFAULT_CURRENCY", default_value = "USD")]
    pub currency: String,
}

pub fn run_goal_projection(args: GoalProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let default_currency = CurrencyCode::new(&args.currency)?;
    let request: GoalProjectionRequest = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        GoalProjectionRequest {
            target_amount: args
                .target_amount
                .ok_or("--target-amount is required (or provide --input)")?,
            current_amount: Some(args.current_amount),
            target_date: args
                .target_date
                .ok_or("--target-date is required (or provide --input)")?,
            monthly_saving: args
                .monthly_saving
                .ok_or("--monthly-saving is required (or provide --input)")?,
            as_of: args.as_of,
            currency: None,
        }
    };

    let params = request.validate(Local::now().date_naive(), &default_currency)?;
    let result = projection::build_goal_report(
        &params.goal,
        &params.currency,
        params.monthly_saving,
        params.as_of,
    );
    Ok(serde_json::to_value(result)?)
}
