use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::loans::amortization::LoanRepaymentPlan;
use crate::loans::payment::{plan_from_principal, PrincipalLoan};
use crate::types::CurrencyCode;
use crate::validation::{
    iso_date, non_negative, non_negative_months, optional_text, positive, positive_months,
    required_text, MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};
use crate::FinTrackResult;

const DEFAULT_LOAN_NAME: &str = "Loan";

/// A named repayment plan as kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRepaymentRecord {
    pub loan_name: String,
    pub plan: LoanRepaymentPlan,
}

/// Repayment form as posted by the web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRepaymentForm {
    pub loan_name: String,
    pub total_month: i64,
    pub amount_per_month: Decimal,
    pub interest_percent: Decimal,
    pub currency: String,
    #[serde(default)]
    pub paid_months: Option<i64>,
}

impl LoanRepaymentForm {
    pub fn validate(&self) -> FinTrackResult<LoanRepaymentRecord> {
        let loan_name = required_text("loanName", &self.loan_name, MAX_NAME_LEN)?;
        let plan = LoanRepaymentPlan {
            total_months: positive_months("totalMonth", self.total_month)?,
            monthly_payment: non_negative("amountPerMonth", self.amount_per_month)?,
            annual_interest_percent: non_negative("interestPercent", self.interest_percent)?,
            paid_months: non_negative_months("paidMonths", self.paid_months.unwrap_or(0))?,
            currency: CurrencyCode::new(&self.currency)?,
        };
        Ok(LoanRepaymentRecord { loan_name, plan })
    }
}

/// Principal-first loan form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalLoanForm {
    pub principal: Decimal,
    pub interest_rate_annual: Decimal,
    pub currency: String,
    pub start_date: String,
    pub term_months: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl PrincipalLoanForm {
    pub fn validate(&self) -> FinTrackResult<PrincipalLoan> {
        Ok(PrincipalLoan {
            principal: positive("principal", self.principal)?,
            annual_interest_percent: non_negative("interestRateAnnual", self.interest_rate_annual)?,
            term_months: positive_months("termMonths", self.term_months)?,
            start_date: iso_date("startDate", &self.start_date)?,
            currency: CurrencyCode::new(&self.currency)?,
            description: optional_text(
                "description",
                self.description.as_deref(),
                MAX_DESCRIPTION_LEN,
            )?,
        })
    }
}

/// A [`LoanRepaymentPlan`] in its own wire shape
/// (`totalMonths`, `monthlyPayment`, `annualInterestPercent`, ...), with an
/// optional name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPlanForm {
    #[serde(default)]
    pub loan_name: Option<String>,
    pub total_months: i64,
    pub monthly_payment: Decimal,
    pub annual_interest_percent: Decimal,
    #[serde(default)]
    pub paid_months: Option<i64>,
    pub currency: String,
}

impl LoanPlanForm {
    pub fn validate(&self) -> FinTrackResult<LoanRepaymentRecord> {
        let loan_name = optional_text("loanName", self.loan_name.as_deref(), MAX_NAME_LEN)?
            .unwrap_or_else(|| DEFAULT_LOAN_NAME.to_string());
        let plan = LoanRepaymentPlan {
            total_months: positive_months("totalMonths", self.total_months)?,
            monthly_payment: non_negative("monthlyPayment", self.monthly_payment)?,
            annual_interest_percent: non_negative(
                "annualInterestPercent",
                self.annual_interest_percent,
            )?,
            paid_months: non_negative_months("paidMonths", self.paid_months.unwrap_or(0))?,
            currency: CurrencyCode::new(&self.currency)?,
        };
        Ok(LoanRepaymentRecord { loan_name, plan })
    }
}

/// Any of the accepted loan shapes, tried in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoanForm {
    Principal(PrincipalLoanForm),
    Repayment(LoanRepaymentForm),
    Plan(LoanPlanForm),
}

impl LoanForm {
    /// Normalize any shape into a repayment record. Principal-first loans
    /// are restated as a payment-first plan as of `as_of`.
    pub fn validate(&self, as_of: NaiveDate) -> FinTrackResult<LoanRepaymentRecord> {
        match self {
            LoanForm::Repayment(form) => form.validate(),
            LoanForm::Plan(form) => form.validate(),
            LoanForm::Principal(form) => {
                let loan = form.validate()?;
                let plan = plan_from_principal(&loan, as_of)?;
                Ok(LoanRepaymentRecord {
                    loan_name: loan.description.unwrap_or_else(|| DEFAULT_LOAN_NAME.to_string()),
                    plan,
                })
            }
        }
    }
}
