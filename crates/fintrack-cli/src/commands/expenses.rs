use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use fintrack_core::expenses::model::{ExpenseForm, ExpenseRecord, SummaryQueryForm};
use fintrack_core::expenses::summary;

use crate::input;

/// Arguments for an expense summary
#[derive(Args)]
pub struct ExpenseSummaryArgs {
    /// Path to JSON/YAML input file with an `expenses` array
    #[arg(long)]
    pub input: Option<String>,

    /// Bucket size for the time series: day, week or month
    #[arg(long)]
    pub period: Option<String>,

    /// Earliest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Deserialize)]
struct ExpenseSummaryInput {
    expenses: Vec<ExpenseForm>,
    #[serde(flatten)]
    query: SummaryQueryForm,
}

pub fn run_expense_summary(args: ExpenseSummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data: ExpenseSummaryInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input <file.json> or stdin required for expense summary".into());
    };

    // Flags win over values in the file.
    let query_form = SummaryQueryForm {
        from: args.from.or(data.query.from),
        to: args.to.or(data.query.to),
        period: args.period.or(data.query.period),
    };
    let query = query_form.validate()?;

    let expenses = data
        .expenses
        .iter()
        .enumerate()
        .map(|(i, form)| form.validate().map_err(|e| format!("expenses[{i}]: {e}")))
        .collect::<Result<Vec<ExpenseRecord>, String>>()?;

    let result = summary::build_expense_summary(&expenses, &query);
    Ok(serde_json::to_value(result)?)
}
