use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::loans::amortization::LoanRepaymentPlan;
use crate::time_value::{periodic_rate, pmt};
use crate::types::{round_money, with_metadata, ComputationOutput, CurrencyCode, Money};
use crate::FinTrackResult;

/// A loan described principal-first: amount borrowed, rate, term and the
/// date repayments started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalLoan {
    pub principal: Money,
    pub annual_interest_percent: Decimal,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub currency: CurrencyCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPaymentOutput {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub paid_months: u32,
    pub plan: LoanRepaymentPlan,
}

/// Level monthly installment that repays `principal` over `term_months`.
pub fn monthly_payment_for(
    principal: Money,
    annual_interest_percent: Decimal,
    term_months: u32,
) -> FinTrackResult<Money> {
    let payment = pmt(
        periodic_rate(annual_interest_percent),
        term_months,
        principal,
        Decimal::ZERO,
    )?;
    Ok(-payment)
}

/// Whole months between `start` and `as_of`. A month only counts once its
/// day-of-month has been reached; dates before `start` give zero.
pub fn months_elapsed(start: NaiveDate, as_of: NaiveDate) -> u32 {
    if as_of <= start {
        return 0;
    }
    let mut months = (as_of.year() - start.year()) * 12 + as_of.month() as i32 - start.month() as i32;
    if as_of.day() < start.day() {
        months -= 1;
    }
    u32::try_from(months).unwrap_or(0)
}

/// Restate a principal-first loan as a payment-first plan so it can run
/// through the same schedule engine. Months paid are counted from the start
/// date up to `as_of` and capped at the term.
pub fn plan_from_principal(loan: &PrincipalLoan, as_of: NaiveDate) -> FinTrackResult<LoanRepaymentPlan> {
    let monthly_payment =
        monthly_payment_for(loan.principal, loan.annual_interest_percent, loan.term_months)?;
    let paid_months = months_elapsed(loan.start_date, as_of).min(loan.term_months);

    Ok(LoanRepaymentPlan {
        total_months: loan.term_months,
        monthly_payment,
        annual_interest_percent: loan.annual_interest_percent,
        paid_months,
        currency: loan.currency.clone(),
    })
}

/// Payment summary for a principal-first loan, in the standard envelope.
pub fn calculate_loan_payment(
    loan: &PrincipalLoan,
    as_of: NaiveDate,
) -> FinTrackResult<ComputationOutput<LoanPaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let plan = plan_from_principal(loan, as_of)?;
    let total_paid = plan
        .monthly_payment
        .saturating_mul(Decimal::from(plan.total_months));

    if as_of < loan.start_date {
        warnings.push(format!(
            "as_of ({as_of}) is before the loan start date ({})",
            loan.start_date
        ));
    }

    let output = LoanPaymentOutput {
        monthly_payment: round_money(plan.monthly_payment),
        total_paid: round_money(total_paid),
        total_interest: round_money(total_paid.saturating_sub(loan.principal)),
        paid_months: plan.paid_months,
        plan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level payment (PMT) on a fully amortizing principal",
        loan,
        warnings,
        elapsed,
        output,
    ))
}
