use chrono::NaiveDate;
use fintrack_core::goals::form::GoalProjectionRequest;
use fintrack_core::goals::projection::{
    build_goal_report, compute_projection, progress_percent, GoalProjection, GoalState,
    MonthlySaving,
};
use fintrack_core::CurrencyCode;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn emergency_fund() -> GoalState {
    GoalState {
        target_amount: dec!(12000),
        current_amount: dec!(2000),
        target_date: date(2026, 1, 1),
    }
}

// ===========================================================================
// Worked examples
// ===========================================================================

#[test]
fn test_projection_on_schedule() {
    let saving = MonthlySaving::new(dec!(1000)).unwrap();
    let projection = compute_projection(&emergency_fund(), saving, date(2025, 1, 1));

    assert_eq!(
        projection,
        GoalProjection {
            months_needed: 10,
            projected_date: date(2025, 11, 1),
            meets_target: true,
            delta_days: -61,
        }
    );
}

#[test]
fn test_goal_already_met() {
    let goal = GoalState {
        target_amount: dec!(500),
        current_amount: dec!(750),
        target_date: date(2026, 1, 1),
    };
    let as_of = date(2025, 6, 15);
    let projection = compute_projection(&goal, MonthlySaving::new(dec!(50)).unwrap(), as_of);

    assert_eq!(projection.months_needed, 0);
    assert_eq!(projection.projected_date, as_of);
    assert!(projection.meets_target);
    assert_eq!(progress_percent(&goal), 100);
}

#[test]
fn test_exactly_met_goal_needs_no_months() {
    let goal = GoalState {
        target_amount: dec!(500),
        current_amount: dec!(500),
        target_date: date(2026, 1, 1),
    };
    let projection = compute_projection(&goal, MonthlySaving::new(dec!(1)).unwrap(), date(2025, 1, 1));
    assert_eq!(projection.months_needed, 0);
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_projection_is_idempotent() {
    let saving = MonthlySaving::new(dec!(333.33)).unwrap();
    let as_of = date(2025, 3, 31);
    let first = compute_projection(&emergency_fund(), saving, as_of);
    let second = compute_projection(&emergency_fund(), saving, as_of);
    assert_eq!(first, second);
}

#[test]
fn test_delta_sign_tracks_meets_target() {
    for amount in [dec!(100), dec!(500), dec!(999.99), dec!(1000), dec!(5000)] {
        let p = compute_projection(
            &emergency_fund(),
            MonthlySaving::new(amount).unwrap(),
            date(2025, 1, 1),
        );
        assert_eq!(p.meets_target, p.delta_days <= 0, "saving {amount}");
    }
}

#[test]
fn test_more_saving_never_takes_longer() {
    let mut previous = u32::MAX;
    for amount in [dec!(10), dec!(100), dec!(250), dec!(1000), dec!(10000)] {
        let months = compute_projection(
            &emergency_fund(),
            MonthlySaving::new(amount).unwrap(),
            date(2025, 1, 1),
        )
        .months_needed;
        assert!(months <= previous);
        previous = months;
    }
}

// ===========================================================================
// Report envelope
// ===========================================================================

#[test]
fn test_report_progress_block() {
    let currency = CurrencyCode::new("EUR").unwrap();
    let report = build_goal_report(
        &emergency_fund(),
        &currency,
        MonthlySaving::new(dec!(1000)).unwrap(),
        date(2025, 1, 1),
    );

    let progress = &report.result.progress;
    assert_eq!(progress.percent, 17);
    assert_eq!(progress.current_amount, dec!(2000));
    assert_eq!(progress.target_amount, dec!(12000));
    assert_eq!(progress.currency, currency);
    assert!(report.warnings.is_empty());
}

#[test]
fn test_report_json_shape() {
    let report = build_goal_report(
        &emergency_fund(),
        &CurrencyCode::default(),
        MonthlySaving::new(dec!(1000)).unwrap(),
        date(2025, 1, 1),
    );
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["result"]["projection"]["monthsNeeded"], 10);
    assert_eq!(json["result"]["projection"]["projectedDate"], "2025-11-01");
    assert_eq!(json["result"]["projection"]["meetsTarget"], true);
    assert_eq!(json["result"]["progress"]["currency"], "USD");
    assert_eq!(json["assumptions"]["asOf"], "2025-01-01");
}

#[test]
fn test_request_to_report() {
    let request: GoalProjectionRequest = serde_json::from_value(serde_json::json!({
        "targetAmount": 12000,
        "currentAmount": 2000,
        "targetDate": "2026-01-01",
        "monthlySaving": 1000,
        "asOf": "2025-01-01",
        "currency": "usd"
    }))
    .unwrap();
    let params = request
        .validate(date(2030, 1, 1), &CurrencyCode::default())
        .unwrap();
    assert_eq!(params.as_of, date(2025, 1, 1));

    let report = build_goal_report(&params.goal, &params.currency, params.monthly_saving, params.as_of);
    assert_eq!(report.result.projection.months_needed, 10);
}

#[test]
fn test_zero_target_counts_as_complete() {
    let goal = GoalState {
        target_amount: Decimal::ZERO,
        current_amount: Decimal::ZERO,
        target_date: date(2026, 1, 1),
    };
    assert_eq!(progress_percent(&goal), 100);
}
