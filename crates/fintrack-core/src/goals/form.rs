use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::projection::{GoalState, MonthlySaving};
use crate::types::CurrencyCode;
use crate::validation::{
    iso_date, non_negative, optional_iso_date, positive, required_text, MAX_NAME_LEN,
};
use crate::FinTrackResult;

/// A named savings goal as kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub name: String,
    pub currency: CurrencyCode,
    pub goal: GoalState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalForm {
    pub name: String,
    pub target_amount: Decimal,
    pub currency: String,
    pub target_date: String,
    #[serde(default)]
    pub current_amount: Option<Decimal>,
}

impl GoalForm {
    pub fn validate(&self) -> FinTrackResult<GoalRecord> {
        Ok(GoalRecord {
            name: required_text("name", &self.name, MAX_NAME_LEN)?,
            currency: CurrencyCode::new(&self.currency)?,
            goal: GoalState {
                target_amount: positive("targetAmount", self.target_amount)?,
                current_amount: non_negative(
                    "currentAmount",
                    self.current_amount.unwrap_or(Decimal::ZERO),
                )?,
                target_date: iso_date("targetDate", &self.target_date)?,
            },
        })
    }
}

/// Everything a projection needs, checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParams {
    pub goal: GoalState,
    pub currency: CurrencyCode,
    pub monthly_saving: MonthlySaving,
    pub as_of: NaiveDate,
}

/// Ad-hoc projection request. Unlike a stored goal, a zero target is allowed
/// (it simply counts as met).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjectionRequest {
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Option<Decimal>,
    pub target_date: String,
    pub monthly_saving: Decimal,
    #[serde(default)]
    pub as_of: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl GoalProjectionRequest {
    /// `today` fills in a missing `asOf`; `default_currency` a missing currency.
    pub fn validate(
        &self,
        today: NaiveDate,
        default_currency: &CurrencyCode,
    ) -> FinTrackResult<ProjectionParams> {
        let currency = match self.currency.as_deref() {
            Some(code) => CurrencyCode::new(code)?,
            None => default_currency.clone(),
        };
        Ok(ProjectionParams {
            goal: GoalState {
                target_amount: non_negative("targetAmount", self.target_amount)?,
                current_amount: non_negative(
                    "currentAmount",
                    self.current_amount.unwrap_or(Decimal::ZERO),
                )?,
                target_date: iso_date("targetDate", &self.target_date)?,
            },
            currency,
            monthly_saving: MonthlySaving::new(self.monthly_saving)?,
            as_of: optional_iso_date("asOf", self.as_of.as_deref())?.unwrap_or(today),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinTrackError;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_goal_form_defaults_current_amount() {
        let form: GoalForm = serde_json::from_value(serde_json::json!({
            "name": "Emergency fund",
            "targetAmount": 12000,
            "currency": "gbp",
            "targetDate": "2026-01-01"
        }))
        .unwrap();
        let record = form.validate().unwrap();
        assert_eq!(record.goal.current_amount, Decimal::ZERO);
        assert_eq!(record.currency.as_str(), "GBP");
    }

    #[test]
    fn test_goal_form_rejects_zero_target() {
        let form = GoalForm {
            name: "x".into(),
            target_amount: Decimal::ZERO,
            currency: "USD".into(),
            target_date: "2026-01-01".into(),
            current_amount: None,
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_projection_request_rejects_zero_saving() {
        let req = GoalProjectionRequest {
            target_amount: dec!(100),
            current_amount: None,
            target_date: "2026-01-01".into(),
            monthly_saving: Decimal::ZERO,
            as_of: None,
            currency: None,
        };
        match req.validate(today(), &CurrencyCode::default()) {
            Err(FinTrackError::InvalidInput { field, .. }) => assert_eq!(field, "monthlySaving"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_projection_request_fills_defaults() {
        let req: GoalProjectionRequest = serde_json::from_value(serde_json::json!({
            "targetAmount": "12000",
            "currentAmount": "2000",
            "targetDate": "2026-01-01",
            "monthlySaving": 1000
        }))
        .unwrap();
        let params = req.validate(today(), &CurrencyCode::new("CHF").unwrap()).unwrap();
        assert_eq!(params.as_of, today());
        assert_eq!(params.currency.as_str(), "CHF");
        assert_eq!(params.monthly_saving.amount(), dec!(1000));
    }
}
