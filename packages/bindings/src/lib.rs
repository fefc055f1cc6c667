use chrono::{Local, NaiveDate};
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use fintrack_core::expenses::model::{ExpenseForm, ExpenseRecord, SummaryQueryForm};
use fintrack_core::validation::optional_iso_date;
use fintrack_core::CurrencyCode;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn resolve_as_of(as_of: Option<String>) -> NapiResult<NaiveDate> {
    Ok(optional_iso_date("asOf", as_of.as_deref())
        .map_err(to_napi_error)?
        .unwrap_or_else(|| Local::now().date_naive()))
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

/// Amortization report for any loan shape. `asOf` (YYYY-MM-DD, default
/// today) only matters for principal-first input.
#[napi]
pub fn loan_schedule(input_json: String, as_of: Option<String>) -> NapiResult<String> {
    let as_of = resolve_as_of(as_of)?;
    let form: fintrack_core::loans::form::LoanForm =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let record = form.validate(as_of).map_err(to_napi_error)?;
    let output = fintrack_core::loans::amortization::build_loan_report(&record.plan);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn loan_payment(input_json: String, as_of: Option<String>) -> NapiResult<String> {
    let as_of = resolve_as_of(as_of)?;
    let form: fintrack_core::loans::form::PrincipalLoanForm =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let loan = form.validate().map_err(to_napi_error)?;
    let output =
        fintrack_core::loans::payment::calculate_loan_payment(&loan, as_of).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[napi]
pub fn goal_projection(input_json: String) -> NapiResult<String> {
    let request: fintrack_core::goals::form::GoalProjectionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let params = request
        .validate(Local::now().date_naive(), &CurrencyCode::default())
        .map_err(to_napi_error)?;
    let output = fintrack_core::goals::projection::build_goal_report(
        &params.goal,
        &params.currency,
        params.monthly_saving,
        params.as_of,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Expenses
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ExpenseSummaryInput {
    expenses: Vec<ExpenseForm>,
    #[serde(flatten)]
    query: SummaryQueryForm,
}

#[napi]
pub fn expense_summary(input_json: String) -> NapiResult<String> {
    let input: ExpenseSummaryInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let query = input.query.validate().map_err(to_napi_error)?;
    let expenses = input
        .expenses
        .iter()
        .enumerate()
        .map(|(i, form)| {
            form.validate()
                .map_err(|e| to_napi_error(format!("expenses[{i}]: {e}")))
        })
        .collect::<NapiResult<Vec<ExpenseRecord>>>()?;
    let output = fintrack_core::expenses::summary::build_expense_summary(&expenses, &query);
    serde_json::to_string(&output).map_err(to_napi_error)
}
