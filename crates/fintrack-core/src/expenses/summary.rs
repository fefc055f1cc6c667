use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use crate::expenses::model::{ExpenseRecord, ExpenseSummaryQuery, SummaryPeriod};
use crate::types::{round_money, with_metadata, ComputationOutput, CurrencyCode, Money};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub currency: CurrencyCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotal {
    /// `dd/mm/YYYY`, `YYYY-Www` (ISO week) or `YYYY-MM` depending on the period.
    pub period: String,
    pub total: Money,
    pub currency: CurrencyCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    pub by_category: Vec<CategoryTotal>,
    pub timeseries: Vec<PeriodTotal>,
    pub period: SummaryPeriod,
}

/// Running total for one group. Amounts are summed as-is; currencies are
/// collected so mixed groups can be reported.
#[derive(Default)]
struct Bucket {
    total: Decimal,
    currencies: BTreeSet<CurrencyCode>,
}

impl Bucket {
    fn add(&mut self, expense: &ExpenseRecord) {
        self.total += expense.amount;
        self.currencies.insert(expense.currency.clone());
    }

    /// Lexicographically smallest currency seen in the group.
    fn currency(&self) -> CurrencyCode {
        self.currencies.iter().next().cloned().unwrap_or_default()
    }
}

/// Sort key that orders buckets chronologically.
fn bucket_key(date: NaiveDate, period: SummaryPeriod) -> (i32, u32, u32) {
    match period {
        SummaryPeriod::Day => (date.year(), date.month(), date.day()),
        SummaryPeriod::Week => {
            let week = date.iso_week();
            (week.year(), week.week(), 0)
        }
        SummaryPeriod::Month => (date.year(), date.month(), 0),
    }
}

fn bucket_label(key: (i32, u32, u32), period: SummaryPeriod) -> String {
    let (year, a, b) = key;
    match period {
        SummaryPeriod::Day => format!("{b:02}/{a:02}/{year:04}"),
        SummaryPeriod::Week => format!("{year:04}-W{a:02}"),
        SummaryPeriod::Month => format!("{year:04}-{a:02}"),
    }
}

fn in_range(date: NaiveDate, query: &ExpenseSummaryQuery) -> bool {
    query.from.map_or(true, |from| date >= from) && query.to.map_or(true, |to| date <= to)
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Totals per category (largest first) and per time bucket (oldest first)
/// over the expenses that fall inside the query's date range.
pub fn summarize_expenses(expenses: &[ExpenseRecord], query: &ExpenseSummaryQuery) -> ExpenseSummary {
    let mut categories: BTreeMap<&str, Bucket> = BTreeMap::new();
    let mut periods: BTreeMap<(i32, u32, u32), Bucket> = BTreeMap::new();

    for expense in expenses.iter().filter(|e| in_range(e.occurred_at, query)) {
        categories.entry(expense.category.as_str()).or_default().add(expense);
        periods
            .entry(bucket_key(expense.occurred_at, query.period))
            .or_default()
            .add(expense);
    }

    let mut by_category: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, bucket)| CategoryTotal {
            category: category.to_string(),
            total: round_money(bucket.total),
            currency: bucket.currency(),
        })
        .collect();
    // Stable sort keeps the BTreeMap's name order for equal totals.
    by_category.sort_by(|a, b| b.total.cmp(&a.total));

    let timeseries = periods
        .into_iter()
        .map(|(key, bucket)| PeriodTotal {
            period: bucket_label(key, query.period),
            total: round_money(bucket.total),
            currency: bucket.currency(),
        })
        .collect();

    ExpenseSummary {
        by_category,
        timeseries,
        period: query.period,
    }
}

/// [`summarize_expenses`] in the standard envelope, warning when totals add
/// up amounts in different currencies.
pub fn build_expense_summary(
    expenses: &[ExpenseRecord],
    query: &ExpenseSummaryQuery,
) -> ComputationOutput<ExpenseSummary> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let currencies: BTreeSet<&str> = expenses
        .iter()
        .filter(|e| in_range(e.occurred_at, query))
        .map(|e| e.currency.as_str())
        .collect();
    if currencies.len() > 1 {
        let listed: Vec<&str> = currencies.into_iter().collect();
        warnings.push(format!(
            "Expenses span several currencies ({}); totals are summed without conversion",
            listed.join(", ")
        ));
    }

    let summary = summarize_expenses(expenses, query);

    tracing::debug!(
        expenses = expenses.len(),
        categories = summary.by_category.len(),
        buckets = summary.timeseries.len(),
        period = %query.period,
        "summarized expenses"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Sum of expense amounts by category and calendar bucket",
        query,
        warnings,
        elapsed,
        summary,
    )
}
