#![cfg(feature = "expenses")]

use fintrack_core::expenses::model::{ExpenseForm, ExpenseRecord, SummaryPeriod, SummaryQueryForm};
use fintrack_core::expenses::summary::{build_expense_summary, summarize_expenses};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn expense(amount: Decimal, category: &str, occurred_at: &str) -> ExpenseRecord {
    ExpenseForm {
        amount,
        currency: "usd".into(),
        category: category.into(),
        description: None,
        occurred_at: occurred_at.into(),
    }
    .validate()
    .unwrap()
}

fn sample() -> Vec<ExpenseRecord> {
    vec![
        expense(dec!(12.50), "Food", "2025-01-06"),
        expense(dec!(7.50), "Food", "2025-01-12"),
        expense(dec!(900), "Rent", "2025-01-13"),
        expense(dec!(30), "Transport", "2025-02-03"),
        expense(dec!(5.25), "Transport", "2024-12-31"),
    ]
}

fn query(from: Option<&str>, to: Option<&str>, period: Option<&str>) -> SummaryQueryForm {
    SummaryQueryForm {
        from: from.map(String::from),
        to: to.map(String::from),
        period: period.map(String::from),
    }
}

#[test]
fn test_categories_sorted_by_total_descending() {
    let q = query(None, None, None).validate().unwrap();
    let summary = summarize_expenses(&sample(), &q);

    let categories: Vec<(&str, Decimal)> = summary
        .by_category
        .iter()
        .map(|c| (c.category.as_str(), c.total))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("Rent", dec!(900)),
            ("Transport", dec!(35.25)),
            ("Food", dec!(20)),
        ]
    );
    assert!(summary.by_category.iter().all(|c| c.currency.as_str() == "USD"));
}

#[test]
fn test_month_buckets_default() {
    let q = query(None, None, None).validate().unwrap();
    let summary = summarize_expenses(&sample(), &q);

    assert_eq!(summary.period, SummaryPeriod::Month);
    let months: Vec<(&str, Decimal)> = summary
        .timeseries
        .iter()
        .map(|p| (p.period.as_str(), p.total))
        .collect();
    assert_eq!(
        months,
        vec![
            ("2024-12", dec!(5.25)),
            ("2025-01", dec!(920)),
            ("2025-02", dec!(30)),
        ]
    );
}

#[test]
fn test_week_buckets_follow_iso_weeks() {
    let q = query(None, None, Some("week")).validate().unwrap();
    let summary = summarize_expenses(&sample(), &q);

    let weeks: Vec<(&str, Decimal)> = summary
        .timeseries
        .iter()
        .map(|p| (p.period.as_str(), p.total))
        .collect();
    // Monday 6th and Sunday 12th January share a week; 31 Dec 2024 is 2025-W01.
    assert_eq!(
        weeks,
        vec![
            ("2025-W01", dec!(5.25)),
            ("2025-W02", dec!(20)),
            ("2025-W03", dec!(900)),
            ("2025-W06", dec!(30)),
        ]
    );
}

#[test]
fn test_day_buckets_use_day_first_labels() {
    let q = query(Some("2025-01-06"), Some("2025-01-12"), Some("day"))
        .validate()
        .unwrap();
    let summary = summarize_expenses(&sample(), &q);

    let days: Vec<&str> = summary.timeseries.iter().map(|p| p.period.as_str()).collect();
    assert_eq!(days, vec!["06/01/2025", "12/01/2025"]);
}

#[test]
fn test_date_range_is_inclusive() {
    let q = query(Some("2025-01-12"), Some("2025-01-13"), None)
        .validate()
        .unwrap();
    let summary = summarize_expenses(&sample(), &q);

    let total: Decimal = summary.by_category.iter().map(|c| c.total).sum();
    assert_eq!(total, dec!(907.50));
    assert_eq!(summary.timeseries.len(), 1);
    assert_eq!(summary.timeseries[0].period, "2025-01");
}

#[test]
fn test_empty_range_gives_empty_summary() {
    let q = query(Some("2030-01-01"), None, None).validate().unwrap();
    let report = build_expense_summary(&sample(), &q);

    assert!(report.result.by_category.is_empty());
    assert!(report.result.timeseries.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_unknown_period_rejected() {
    assert!(query(None, None, Some("fortnight")).validate().is_err());
}

#[test]
fn test_mixed_currency_outside_range_does_not_warn() {
    let mut expenses = sample();
    let mut eur = expense(dec!(40), "Travel", "2023-06-01");
    eur.currency = fintrack_core::CurrencyCode::new("EUR").unwrap();
    expenses.push(eur);

    let in_range = query(Some("2025-01-01"), None, None).validate().unwrap();
    assert!(build_expense_summary(&expenses, &in_range).warnings.is_empty());

    let everything = query(None, None, None).validate().unwrap();
    let report = build_expense_summary(&expenses, &everything);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("EUR, USD"));
}

#[test]
fn test_summary_json_shape() {
    let q = query(None, None, Some("month")).validate().unwrap();
    let report = build_expense_summary(&sample(), &q);
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["result"]["period"], "month");
    assert_eq!(json["result"]["byCategory"][0]["category"], "Rent");
    assert_eq!(json["result"]["byCategory"][0]["currency"], "USD");
    assert_eq!(json["result"]["timeseries"][0]["period"], "2024-12");
    assert_eq!(json["metadata"]["precision"], "rust_decimal_128bit");
}
