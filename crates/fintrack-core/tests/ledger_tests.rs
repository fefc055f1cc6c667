#![cfg(all(feature = "store", feature = "loans", feature = "goals", feature = "expenses"))]

use chrono::NaiveDate;
use fintrack_core::expenses::model::{ExpenseForm, SummaryPeriod, SummaryQueryForm};
use fintrack_core::goals::form::GoalForm;
use fintrack_core::goals::projection::MonthlySaving;
use fintrack_core::ledger::Ledger;
use fintrack_core::loans::form::LoanForm;
use fintrack_core::FinTrackError;
use rust_decimal_macros::dec;

const ALICE: u64 = 7;
const MALLORY: u64 = 8;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn loan_form() -> LoanForm {
    serde_json::from_value(serde_json::json!({
        "loanName": "Car",
        "totalMonth": 24,
        "amountPerMonth": 500,
        "interestPercent": 12,
        "currency": "USD",
        "paidMonths": 4
    }))
    .unwrap()
}

fn expense(amount: &str, category: &str, occurred_at: &str) -> ExpenseForm {
    serde_json::from_value(serde_json::json!({
        "amount": amount,
        "currency": "USD",
        "category": category,
        "occurredAt": occurred_at
    }))
    .unwrap()
}

#[test]
fn test_loan_report_through_ledger() {
    let ledger = Ledger::in_memory();
    let stored = ledger.add_loan(ALICE, &loan_form(), date(2025, 1, 1)).unwrap();

    let report = ledger.loan_report(ALICE, stored.id).unwrap();
    assert_eq!(report.result.series.len(), 20);
    assert_eq!(report.result.series[0].month_index, 5);

    assert!(matches!(
        ledger.loan_report(MALLORY, stored.id),
        Err(FinTrackError::NotFound { .. })
    ));
}

#[test]
fn test_invalid_loan_is_not_stored() {
    let ledger = Ledger::in_memory();
    let bad: LoanForm = serde_json::from_value(serde_json::json!({
        "loanName": "Bad",
        "totalMonth": 0,
        "amountPerMonth": 10,
        "interestPercent": 1,
        "currency": "USD"
    }))
    .unwrap();
    assert!(ledger.add_loan(ALICE, &bad, date(2025, 1, 1)).is_err());
    assert!(ledger.loans(ALICE).unwrap().is_empty());
}

#[test]
fn test_goals_sorted_by_target_date_and_projected() {
    let ledger = Ledger::in_memory();
    let later: GoalForm = serde_json::from_value(serde_json::json!({
        "name": "House", "targetAmount": 50000, "currency": "USD", "targetDate": "2030-01-01"
    }))
    .unwrap();
    let sooner: GoalForm = serde_json::from_value(serde_json::json!({
        "name": "Holiday", "targetAmount": 3000, "currentAmount": 1000,
        "currency": "USD", "targetDate": "2025-12-01"
    }))
    .unwrap();
    ledger.add_goal(ALICE, &later).unwrap();
    let holiday = ledger.add_goal(ALICE, &sooner).unwrap();

    let names: Vec<String> = ledger
        .goals(ALICE)
        .unwrap()
        .into_iter()
        .map(|g| g.record.name)
        .collect();
    assert_eq!(names, vec!["Holiday", "House"]);

    let report = ledger
        .goal_report(ALICE, holiday.id, MonthlySaving::new(dec!(500)).unwrap(), date(2025, 1, 1))
        .unwrap();
    assert_eq!(report.result.projection.months_needed, 4);
    assert_eq!(report.result.progress.percent, 33);
}

#[test]
fn test_expense_summary_is_owner_scoped() {
    let ledger = Ledger::in_memory();
    ledger.add_expense(ALICE, &expense("12.50", "Food", "2025-01-03")).unwrap();
    ledger.add_expense(ALICE, &expense("40", "Transport", "2025-01-20")).unwrap();
    ledger.add_expense(ALICE, &expense("7.50", "Food", "2025-02-02")).unwrap();
    ledger.add_expense(MALLORY, &expense("1000", "Food", "2025-01-05")).unwrap();

    let query = SummaryQueryForm::default().validate().unwrap();
    let summary = ledger.expense_summary(ALICE, &query).unwrap().result;

    assert_eq!(summary.period, SummaryPeriod::Month);
    assert_eq!(summary.by_category[0].category, "Transport");
    assert_eq!(summary.by_category[0].total, dec!(40));
    assert_eq!(summary.by_category[1].total, dec!(20));
    let months: Vec<(&str, _)> = summary
        .timeseries
        .iter()
        .map(|p| (p.period.as_str(), p.total))
        .collect();
    assert_eq!(months, vec![("2025-01", dec!(52.50)), ("2025-02", dec!(7.50))]);
}

#[test]
fn test_expense_summary_date_bounds_are_inclusive() {
    let ledger = Ledger::in_memory();
    ledger.add_expense(ALICE, &expense("1", "Food", "2025-01-01")).unwrap();
    ledger.add_expense(ALICE, &expense("2", "Food", "2025-01-31")).unwrap();
    ledger.add_expense(ALICE, &expense("4", "Food", "2025-02-01")).unwrap();

    let query = SummaryQueryForm {
        from: Some("2025-01-01".into()),
        to: Some("2025-01-31".into()),
        period: Some("day".into()),
    }
    .validate()
    .unwrap();
    let summary = ledger.expense_summary(ALICE, &query).unwrap().result;
    assert_eq!(summary.by_category[0].total, dec!(3));
    assert_eq!(summary.timeseries.len(), 2);
}

#[test]
fn test_expenses_listed_most_recent_first() {
    let ledger = Ledger::in_memory();
    ledger.add_expense(ALICE, &expense("1", "Food", "2025-03-01")).unwrap();
    ledger.add_expense(ALICE, &expense("2", "Food", "2025-01-01")).unwrap();
    ledger.add_expense(ALICE, &expense("3", "Food", "2025-05-01")).unwrap();

    let dates: Vec<NaiveDate> = ledger
        .expenses(ALICE)
        .unwrap()
        .into_iter()
        .map(|e| e.record.occurred_at)
        .collect();
    assert_eq!(dates, vec![date(2025, 5, 1), date(2025, 3, 1), date(2025, 1, 1)]);
}

#[test]
fn test_update_and_delete_respect_owner() {
    let ledger = Ledger::in_memory();
    let stored = ledger.add_expense(ALICE, &expense("10", "Food", "2025-01-01")).unwrap();

    assert!(ledger
        .update_expense(MALLORY, stored.id, &expense("99", "Food", "2025-01-01"))
        .is_err());
    let updated = ledger
        .update_expense(ALICE, stored.id, &expense("11", "Food", "2025-01-01"))
        .unwrap();
    assert_eq!(updated.record.amount, dec!(11));

    assert!(ledger.delete_expense(MALLORY, stored.id).is_err());
    ledger.delete_expense(ALICE, stored.id).unwrap();
    assert!(ledger.expenses(ALICE).unwrap().is_empty());
}
