use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinTrackError;
use crate::types::{round_money, with_metadata, ComputationOutput, CurrencyCode, Money};
use crate::FinTrackResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Snapshot of a savings goal at projection time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalState {
    pub target_amount: Money,
    /// May exceed `target_amount`; the goal then counts as met.
    pub current_amount: Money,
    pub target_date: NaiveDate,
}

/// Hypothetical monthly contribution. Only constructible when strictly
/// positive, so projections never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MonthlySaving(Decimal);

impl MonthlySaving {
    pub fn new(amount: Decimal) -> FinTrackResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(FinTrackError::InvalidInput {
                field: "monthlySaving".into(),
                reason: "must be > 0".into(),
            });
        }
        Ok(MonthlySaving(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for MonthlySaving {
    type Error = FinTrackError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        MonthlySaving::new(value)
    }
}

impl From<MonthlySaving> for Decimal {
    fn from(saving: MonthlySaving) -> Self {
        saving.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub months_needed: u32,
    pub projected_date: NaiveDate,
    pub meets_target: bool,
    /// Days between projected completion and the target date. Positive means late.
    pub delta_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub current_amount: Money,
    pub target_amount: Money,
    pub percent: u32,
    pub currency: CurrencyCode,
}

/// Top-level output from `build_goal_report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalReport {
    pub projection: GoalProjection,
    pub progress: GoalProgress,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GoalAssumptions<'a> {
    goal: &'a GoalState,
    monthly_saving: MonthlySaving,
    as_of: NaiveDate,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Months of saving `monthly_saving` needed to close the gap to the target.
/// Saturates at `u32::MAX` for gaps too large to express.
pub fn months_needed(goal: &GoalState, monthly_saving: MonthlySaving) -> u32 {
    let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    if remaining.is_zero() {
        return 0;
    }
    remaining
        .checked_div(monthly_saving.amount())
        .and_then(|months| months.ceil().to_u32())
        .unwrap_or(u32::MAX)
}

/// Project when the goal is reached if `monthly_saving` is put aside every
/// month starting from `as_of`.
///
/// Calendar months are added with chrono: the day of month is kept where it
/// exists and otherwise clamped to the month's last day (Jan 31 + 1 month is
/// Feb 28/29). Dates beyond chrono's range saturate at `NaiveDate::MAX`.
pub fn compute_projection(
    goal: &GoalState,
    monthly_saving: MonthlySaving,
    as_of: NaiveDate,
) -> GoalProjection {
    let months = months_needed(goal, monthly_saving);
    let projected_date = as_of
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX);

    GoalProjection {
        months_needed: months,
        projected_date,
        meets_target: projected_date <= goal.target_date,
        delta_days: (projected_date - goal.target_date).num_days(),
    }
}

/// Share of the target already saved, as a whole percentage capped at 100.
/// A zero target counts as complete.
pub fn progress_percent(goal: &GoalState) -> u32 {
    if goal.target_amount.is_zero() {
        return 100;
    }
    goal.current_amount
        .checked_div(goal.target_amount)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .map(|pct| {
            pct.min(dec!(100))
                .max(Decimal::ZERO)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        })
        .and_then(|pct| pct.to_u32())
        .unwrap_or(100)
}

/// Projection plus progress, in the standard envelope.
pub fn build_goal_report(
    goal: &GoalState,
    currency: &CurrencyCode,
    monthly_saving: MonthlySaving,
    as_of: NaiveDate,
) -> ComputationOutput<GoalReport> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let projection = compute_projection(goal, monthly_saving, as_of);

    if goal.target_date < as_of {
        warnings.push(format!(
            "Target date {} is already past as of {as_of}",
            goal.target_date
        ));
    }
    if !projection.meets_target {
        warnings.push(format!(
            "At {} {currency} per month the goal completes {} days after its target date",
            round_money(monthly_saving.amount()),
            projection.delta_days
        ));
    }

    let progress = GoalProgress {
        current_amount: round_money(goal.current_amount),
        target_amount: round_money(goal.target_amount),
        percent: progress_percent(goal),
        currency: currency.clone(),
    };

    tracing::debug!(
        months_needed = projection.months_needed,
        meets_target = projection.meets_target,
        "built goal projection"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Linear monthly contributions, whole calendar months",
        &GoalAssumptions {
            goal,
            monthly_saving,
            as_of,
        },
        warnings,
        elapsed,
        GoalReport {
            projection,
            progress,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn saving(amount: Decimal) -> MonthlySaving {
        MonthlySaving::new(amount).unwrap()
    }

    fn goal(target: Decimal, current: Decimal) -> GoalState {
        GoalState {
            target_amount: target,
            current_amount: current,
            target_date: date(2026, 1, 1),
        }
    }

    #[test]
    fn test_monthly_saving_must_be_positive() {
        assert!(MonthlySaving::new(Decimal::ZERO).is_err());
        assert!(MonthlySaving::new(dec!(-5)).is_err());
        assert!(serde_json::from_str::<MonthlySaving>("0").is_err());
        assert_eq!(
            serde_json::from_str::<MonthlySaving>("\"250\"").unwrap().amount(),
            dec!(250)
        );
    }

    #[test]
    fn test_months_needed_rounds_up() {
        assert_eq!(months_needed(&goal(dec!(1000), dec!(0)), saving(dec!(300))), 4);
        assert_eq!(months_needed(&goal(dec!(900), dec!(0)), saving(dec!(300))), 3);
    }

    #[test]
    fn test_months_needed_saturates() {
        let g = goal(dec!(1_000_000_000_000), Decimal::ZERO);
        assert_eq!(months_needed(&g, saving(dec!(0.0000000001))), u32::MAX);
    }

    #[test]
    fn test_projection_late_has_positive_delta() {
        let p = compute_projection(&goal(dec!(12000), dec!(0)), saving(dec!(1000)), date(2025, 1, 1));
        assert_eq!(p.months_needed, 12);
        assert_eq!(p.projected_date, date(2026, 1, 1));
        assert!(p.meets_target);
        assert_eq!(p.delta_days, 0);

        let late = compute_projection(&goal(dec!(12000), dec!(0)), saving(dec!(999)), date(2025, 1, 1));
        assert_eq!(late.months_needed, 13);
        assert!(!late.meets_target);
        assert_eq!(late.delta_days, 31);
    }

    #[test]
    fn test_projection_end_of_month_clamps() {
        let p = compute_projection(&goal(dec!(100), dec!(0)), saving(dec!(100)), date(2025, 1, 31));
        assert_eq!(p.projected_date, date(2025, 2, 28));
    }

    #[test]
    fn test_projection_saturates_at_max_date() {
        let g = goal(dec!(1_000_000_000_000), Decimal::ZERO);
        let p = compute_projection(&g, saving(dec!(0.0000000001)), date(2025, 1, 1));
        assert_eq!(p.projected_date, NaiveDate::MAX);
        assert!(!p.meets_target);
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(&goal(dec!(12000), dec!(2000))), 17);
        assert_eq!(progress_percent(&goal(dec!(200), dec!(1))), 1);
        assert_eq!(progress_percent(&goal(dec!(200), dec!(500))), 100);
        assert_eq!(progress_percent(&goal(Decimal::ZERO, dec!(0))), 100);
        assert_eq!(progress_percent(&goal(dec!(8), dec!(1))), 13);
    }

    #[test]
    fn test_report_warns_when_late_and_past() {
        let g = GoalState {
            target_amount: dec!(5000),
            current_amount: dec!(0),
            target_date: date(2024, 6, 1),
        };
        let report = build_goal_report(&g, &CurrencyCode::default(), saving(dec!(500)), date(2025, 1, 1));
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.result.progress.percent, 0);
    }
}
