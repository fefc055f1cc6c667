//! Per-user ledger: owner-scoped storage wired to the calculators.

use chrono::NaiveDate;
use std::sync::Arc;

use crate::expenses::model::{ExpenseForm, ExpenseRecord, ExpenseSummaryQuery};
use crate::expenses::summary::{build_expense_summary, ExpenseSummary};
use crate::goals::form::{GoalForm, GoalRecord};
use crate::goals::projection::{build_goal_report, GoalReport, MonthlySaving};
use crate::loans::amortization::{build_loan_report, LoanReport};
use crate::loans::form::{LoanForm, LoanRepaymentRecord};
use crate::store::{InMemoryStore, RecordStore, Stored};
use crate::types::{ComputationOutput, UserId};
use crate::FinTrackResult;

pub struct Ledger {
    loans: Arc<dyn RecordStore<LoanRepaymentRecord>>,
    goals: Arc<dyn RecordStore<GoalRecord>>,
    expenses: Arc<dyn RecordStore<ExpenseRecord>>,
}

impl Ledger {
    pub fn new(
        loans: Arc<dyn RecordStore<LoanRepaymentRecord>>,
        goals: Arc<dyn RecordStore<GoalRecord>>,
        expenses: Arc<dyn RecordStore<ExpenseRecord>>,
    ) -> Self {
        Self {
            loans,
            goals,
            expenses,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryStore::new("loan")),
            Arc::new(InMemoryStore::new("goal")),
            Arc::new(InMemoryStore::new("expense")),
        )
    }

    // -- loans ---------------------------------------------------------------

    pub fn add_loan(
        &self,
        owner: UserId,
        form: &LoanForm,
        as_of: NaiveDate,
    ) -> FinTrackResult<Stored<LoanRepaymentRecord>> {
        let record = form.validate(as_of)?;
        self.loans.insert(owner, record)
    }

    pub fn update_loan(
        &self,
        owner: UserId,
        id: u64,
        form: &LoanForm,
        as_of: NaiveDate,
    ) -> FinTrackResult<Stored<LoanRepaymentRecord>> {
        let record = form.validate(as_of)?;
        self.loans.update(owner, id, record)
    }

    pub fn loans(&self, owner: UserId) -> FinTrackResult<Vec<Stored<LoanRepaymentRecord>>> {
        self.loans.list(owner)
    }

    pub fn delete_loan(&self, owner: UserId, id: u64) -> FinTrackResult<()> {
        self.loans.delete(owner, id)
    }

    pub fn loan_report(&self, owner: UserId, id: u64) -> FinTrackResult<ComputationOutput<LoanReport>> {
        let stored = self.loans.get(owner, id)?;
        Ok(build_loan_report(&stored.record.plan))
    }

    // -- goals ---------------------------------------------------------------

    pub fn add_goal(&self, owner: UserId, form: &GoalForm) -> FinTrackResult<Stored<GoalRecord>> {
        let record = form.validate()?;
        self.goals.insert(owner, record)
    }

    pub fn update_goal(
        &self,
        owner: UserId,
        id: u64,
        form: &GoalForm,
    ) -> FinTrackResult<Stored<GoalRecord>> {
        let record = form.validate()?;
        self.goals.update(owner, id, record)
    }

    /// Goals ordered by target date, soonest first.
    pub fn goals(&self, owner: UserId) -> FinTrackResult<Vec<Stored<GoalRecord>>> {
        let mut goals = self.goals.list(owner)?;
        goals.sort_by_key(|g| (g.record.goal.target_date, g.id));
        Ok(goals)
    }

    pub fn delete_goal(&self, owner: UserId, id: u64) -> FinTrackResult<()> {
        self.goals.delete(owner, id)
    }

    pub fn goal_report(
        &self,
        owner: UserId,
        id: u64,
        monthly_saving: MonthlySaving,
        as_of: NaiveDate,
    ) -> FinTrackResult<ComputationOutput<GoalReport>> {
        let stored = self.goals.get(owner, id)?;
        Ok(build_goal_report(
            &stored.record.goal,
            &stored.record.currency,
            monthly_saving,
            as_of,
        ))
    }

    // -- expenses ------------------------------------------------------------

    pub fn add_expense(&self, owner: UserId, form: &ExpenseForm) -> FinTrackResult<Stored<ExpenseRecord>> {
        let record = form.validate()?;
        self.expenses.insert(owner, record)
    }

    pub fn update_expense(
        &self,
        owner: UserId,
        id: u64,
        form: &ExpenseForm,
    ) -> FinTrackResult<Stored<ExpenseRecord>> {
        let record = form.validate()?;
        self.expenses.update(owner, id, record)
    }

    /// Expenses ordered by date, most recent first.
    pub fn expenses(&self, owner: UserId) -> FinTrackResult<Vec<Stored<ExpenseRecord>>> {
        let mut expenses = self.expenses.list(owner)?;
        expenses.sort_by(|a, b| {
            b.record
                .occurred_at
                .cmp(&a.record.occurred_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(expenses)
    }

    pub fn delete_expense(&self, owner: UserId, id: u64) -> FinTrackResult<()> {
        self.expenses.delete(owner, id)
    }

    pub fn expense_summary(
        &self,
        owner: UserId,
        query: &ExpenseSummaryQuery,
    ) -> FinTrackResult<ComputationOutput<ExpenseSummary>> {
        let records: Vec<ExpenseRecord> = self
            .expenses
            .list(owner)?
            .into_iter()
            .map(|s| s.record)
            .collect();
        Ok(build_expense_summary(&records, query))
    }
}
