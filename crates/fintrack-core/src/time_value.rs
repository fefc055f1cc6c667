use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::FinTrackError;
use crate::types::{Money, Rate};
use crate::FinTrackResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Convert a nominal annual percentage (e.g. 12 for 12%) into the monthly
/// periodic rate (0.01).
pub fn periodic_rate(annual_percent: Decimal) -> Rate {
    annual_percent / MONTHS_PER_YEAR / PERCENT
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
///
/// Returns `None` when the factor leaves the Decimal range.
pub fn checked_compound(rate: Rate, n: u32) -> Option<Decimal> {
    if rate.is_zero() {
        return Some(Decimal::ONE);
    }
    let factor = Decimal::ONE.checked_add(rate)?;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.checked_mul(factor)?;
    }
    Some(result)
}

/// Discount factor (1 + r)^-n, built from repeated multiplication by 1/(1 + r).
///
/// For non-negative rates the factor only shrinks. Rates at or below -100%
/// saturate instead of dividing by zero.
pub fn discount(rate: Rate, n: u32) -> Decimal {
    if rate.is_zero() {
        return Decimal::ONE;
    }
    let Some(v) = Decimal::ONE
        .checked_add(rate)
        .and_then(|base| Decimal::ONE.checked_div(base))
    else {
        return Decimal::MAX;
    };
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result.saturating_mul(v);
        if result.is_zero() {
            break;
        }
    }
    result
}

/// Present value of an ordinary annuity of 1 per period: (1 - (1+r)^-n) / r.
/// Degenerates to `n` when the rate is zero.
pub fn annuity_factor(rate: Rate, n: u32) -> Decimal {
    if rate.is_zero() {
        return Decimal::from(n);
    }
    let numerator = Decimal::ONE.saturating_sub(discount(rate, n));
    numerator.checked_div(rate).unwrap_or_else(|| {
        if numerator.is_sign_negative() == rate.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

/// Payment (PMT), spreadsheet sign convention: a positive present value
/// (money received) yields a negative payment.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> FinTrackResult<Money> {
    if nper == 0 {
        return Err(FinTrackError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let out_of_range = || FinTrackError::InvalidInput {
        field: "presentValue".into(),
        reason: "Payment exceeds the representable decimal range".into(),
    };

    if rate.is_zero() {
        return present_value
            .checked_add(future_value)
            .map(|total| -total / Decimal::from(nper))
            .ok_or_else(out_of_range);
    }

    if rate <= dec!(-1) {
        return Err(FinTrackError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -100%".into(),
        });
    }

    // Divide through by (1+r)^n so only the shrinking discount factor is needed.
    let v_n = discount(rate, nper);
    let denominator = Decimal::ONE - v_n;
    if denominator.is_zero() {
        return Err(FinTrackError::InvalidInput {
            field: "rate".into(),
            reason: "Rate too small to amortize over the given term".into(),
        });
    }

    future_value
        .checked_mul(v_n)
        .and_then(|fv| present_value.checked_add(fv))
        .and_then(|total| total.checked_mul(rate))
        .and_then(|scaled| scaled.checked_div(denominator))
        .map(|payment| -payment)
        .ok_or_else(out_of_range)
}
