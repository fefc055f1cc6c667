use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinTrackError;
use crate::types::{CurrencyCode, Money};
use crate::validation::{
    iso_date, optional_iso_date, optional_text, positive, required_text, MAX_CATEGORY_LEN,
    MAX_DESCRIPTION_LEN,
};
use crate::FinTrackResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub amount: Money,
    pub currency: CurrencyCode,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub occurred_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseForm {
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    pub occurred_at: String,
}

impl ExpenseForm {
    pub fn validate(&self) -> FinTrackResult<ExpenseRecord> {
        Ok(ExpenseRecord {
            amount: positive("amount", self.amount)?,
            currency: CurrencyCode::new(&self.currency)?,
            category: required_text("category", &self.category, MAX_CATEGORY_LEN)?,
            description: optional_text(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
            occurred_at: iso_date("occurredAt", &self.occurred_at)?,
        })
    }
}

/// Time bucket for the expense time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Day,
    Week,
    #[default]
    Month,
}

impl FromStr for SummaryPeriod {
    type Err = FinTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(SummaryPeriod::Day),
            "week" => Ok(SummaryPeriod::Week),
            "month" => Ok(SummaryPeriod::Month),
            other => Err(FinTrackError::InvalidInput {
                field: "period".into(),
                reason: format!("'{other}' is not one of day, week, month"),
            }),
        }
    }
}

impl fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SummaryPeriod::Day => "day",
            SummaryPeriod::Week => "week",
            SummaryPeriod::Month => "month",
        };
        f.write_str(name)
    }
}

/// Checked summary query. Both bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummaryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub period: SummaryPeriod,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQueryForm {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

impl SummaryQueryForm {
    pub fn validate(&self) -> FinTrackResult<ExpenseSummaryQuery> {
        let from = optional_iso_date("from", self.from.as_deref())?;
        let to = optional_iso_date("to", self.to.as_deref())?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(FinTrackError::InvalidInput {
                    field: "from".into(),
                    reason: format!("{from} is after {to}"),
                });
            }
        }
        let period = match self.period.as_deref() {
            Some(p) => p.parse()?,
            None => SummaryPeriod::default(),
        };
        Ok(ExpenseSummaryQuery { from, to, period })
    }
}
