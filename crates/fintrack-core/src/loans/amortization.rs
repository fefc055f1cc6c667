use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{annuity_factor, checked_compound, periodic_rate};
use crate::types::{round_money, with_metadata, ComputationOutput, CurrencyCode, Money, Rate};
use crate::validation::MAX_TERM_MONTHS;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A payment-first description of a loan: what the borrower pays, for how
/// long, at what rate. The original principal is never stored; it is implied
/// by the other fields (see [`derive_principal`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRepaymentPlan {
    /// Contractual term in months (> 0).
    pub total_months: u32,
    /// Fixed installment.
    pub monthly_payment: Money,
    /// Nominal annual rate in percent (12 = 12%).
    pub annual_interest_percent: Decimal,
    /// Installments already made. Expected to be <= `total_months`, not enforced.
    #[serde(default)]
    pub paid_months: u32,
    pub currency: CurrencyCode,
}

/// One remaining month of the schedule. Monetary fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationEntry {
    pub month_index: u32,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Output of [`compute_schedule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    /// Balance outstanding after `paid_months` installments (unrounded).
    pub remaining_balance: Money,
    /// Interest over the remaining months, summed before rounding.
    pub total_interest: Money,
    pub entries: Vec<AmortizationEntry>,
}

/// Header block of a loan report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub total_months: u32,
    pub paid_months: u32,
    pub monthly_payment: Money,
    pub interest_percent: Decimal,
    pub remaining_balance: Money,
    pub currency: CurrencyCode,
    pub implied_principal: Money,
    pub total_interest_remaining: Money,
}

/// Top-level output from `build_loan_report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanReport {
    pub summary: LoanSummary,
    pub series: Vec<AmortizationEntry>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Reconstruct the original principal of a fixed-payment loan:
/// `P = payment * (1 - (1+r)^-n) / r`, or `payment * n` at a zero rate.
/// Saturates at the decimal range bounds.
pub fn derive_principal(monthly_payment: Money, rate: Rate, total_months: u32) -> Money {
    monthly_payment.saturating_mul(annuity_factor(rate, total_months))
}

/// Balance outstanding after `plan.paid_months` installments.
///
/// Zero rate is linear: `payment * (total - paid)`. Otherwise this is the
/// closed form `P(1+r)^n - payment((1+r)^n - 1)/r` with `P` from
/// [`derive_principal`]; since `P` comes from the same payment, rate and term
/// it reduces to `payment * (1 - (1+r)^-(N-n)) / r`, which only needs the
/// shrinking discount factor while `n <= N`. Past the term the balance goes
/// negative and saturates at `Decimal::MIN` if the growth factor overflows.
/// Every product saturates, so no input panics.
pub fn remaining_balance(plan: &LoanRepaymentPlan, rate: Rate) -> Money {
    let payment = plan.monthly_payment;
    let total = plan.total_months;
    let paid = plan.paid_months;

    if rate.is_zero() {
        return payment.saturating_mul(Decimal::from(total) - Decimal::from(paid));
    }

    if paid <= total {
        return derive_principal(payment, rate, total - paid);
    }

    if payment.is_zero() {
        return Decimal::ZERO;
    }

    checked_compound(rate, paid - total)
        .and_then(|growth| {
            let per_rate = payment.checked_div(rate)?;
            Decimal::ONE.checked_sub(growth)?.checked_mul(per_rate)
        })
        .unwrap_or(Decimal::MIN)
}

/// Produce the month-by-month schedule for the months still to be paid.
///
/// Never fails: an installment that does not cover the period's interest
/// simply amortizes nothing that month, so such a schedule may end with a
/// balance above zero.
pub fn compute_schedule(plan: &LoanRepaymentPlan) -> AmortizationSchedule {
    let rate = periodic_rate(plan.annual_interest_percent);
    let opening = remaining_balance(plan, rate);
    let remaining_months = plan.total_months.saturating_sub(plan.paid_months);

    let mut balance = opening;
    let mut total_interest = Decimal::ZERO;
    let mut entries = Vec::with_capacity(remaining_months.min(MAX_TERM_MONTHS) as usize);

    for i in 0..remaining_months {
        let interest = if rate.is_zero() {
            Decimal::ZERO
        } else {
            balance.saturating_mul(rate)
        };
        total_interest = total_interest.saturating_add(interest);
        let principal = plan
            .monthly_payment
            .saturating_sub(interest)
            .max(Decimal::ZERO)
            .min(balance);
        balance = balance.saturating_sub(principal).max(Decimal::ZERO);

        entries.push(AmortizationEntry {
            month_index: plan.paid_months + i + 1,
            interest: round_money(interest),
            principal: round_money(principal),
            balance: round_money(balance),
        });
    }

    AmortizationSchedule {
        remaining_balance: opening,
        total_interest,
        entries,
    }
}

/// Run [`compute_schedule`] and wrap it with the summary block, warnings and
/// the standard metadata envelope.
pub fn build_loan_report(plan: &LoanRepaymentPlan) -> ComputationOutput<LoanReport> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rate = periodic_rate(plan.annual_interest_percent);
    let schedule = compute_schedule(plan);

    if plan.paid_months > plan.total_months {
        warnings.push(format!(
            "paid_months ({}) exceeds total_months ({}); remaining balance is extrapolated past the term",
            plan.paid_months, plan.total_months
        ));
    }

    if !schedule.entries.is_empty() && plan.monthly_payment.is_zero() {
        warnings.push("Monthly payment is zero; the schedule amortizes nothing".to_string());
    }

    if let Some(last) = schedule.entries.last() {
        if last.balance > Decimal::ZERO {
            warnings.push(format!(
                "Schedule ends with an outstanding balance of {} {}",
                last.balance, plan.currency
            ));
        }
    }

    let summary = LoanSummary {
        total_months: plan.total_months,
        paid_months: plan.paid_months,
        monthly_payment: round_money(plan.monthly_payment),
        interest_percent: plan.annual_interest_percent,
        remaining_balance: round_money(schedule.remaining_balance),
        currency: plan.currency.clone(),
        implied_principal: round_money(derive_principal(
            plan.monthly_payment,
            rate,
            plan.total_months,
        )),
        total_interest_remaining: round_money(schedule.total_interest),
    };

    tracing::debug!(
        total_months = plan.total_months,
        paid_months = plan.paid_months,
        entries = schedule.entries.len(),
        warnings = warnings.len(),
        "built loan schedule"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-payment amortization, principal implied from payment, rate and term",
        plan,
        warnings,
        elapsed,
        LoanReport {
            summary,
            series: schedule.entries,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
