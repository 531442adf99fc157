//! In-memory view of one month of the ledger.

use crate::{
    core::{
        budget, category_budget, expense, income,
        metrics::{self, AvailableBudget, BudgetCalculation},
        period::MonthKey,
        recurring_expense, recurring_income, savings,
    },
    entities::{
        BudgetModel, CategoryBudgetModel, ExpenseModel, IncomeModel, RecurringExpenseModel,
        RecurringIncomeModel, SavingsTrackerModel,
    },
    errors::Result,
};
use sea_orm::ConnectionTrait;

/// Totals derived from a snapshot's records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Full period summary
    pub metrics: BudgetCalculation,
    /// Spendable and remaining money, with the manual budget fallback applied
    pub available: AvailableBudget,
}

impl Totals {
    fn compute(snapshot: &Snapshot) -> Self {
        let metrics = metrics::calculate_budget_metrics(
            &snapshot.incomes,
            &snapshot.recurring_expenses,
            &snapshot.category_budgets,
            &snapshot.expenses,
            snapshot.savings.as_ref(),
        );
        let available = metrics::resolve_available_budget(
            &metrics,
            !snapshot.incomes.is_empty(),
            snapshot.budget.as_ref().map(|b| b.amount),
        );
        Self { metrics, available }
    }
}

/// The records of one month plus their totals.
///
/// Recurring templates are not month-scoped and are always held in full.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Month the snapshot holds
    pub month: MonthKey,
    /// Manual budget row of the month
    pub budget: Option<BudgetModel>,
    /// Expenses of the month, newest first
    pub expenses: Vec<ExpenseModel>,
    /// Every recurring expense template
    pub recurring_expenses: Vec<RecurringExpenseModel>,
    /// Every recurring income template
    pub recurring_incomes: Vec<RecurringIncomeModel>,
    /// Incomes of the month, oldest first
    pub incomes: Vec<IncomeModel>,
    /// Category ceilings of the month
    pub category_budgets: Vec<CategoryBudgetModel>,
    /// Savings tracker of the month
    pub savings: Option<SavingsTrackerModel>,
    /// Derived totals, always in sync with the records above
    pub totals: Totals,
    /// Bumped on every recompute
    pub version: u64,
}

impl Snapshot {
    /// A month with no records.
    #[must_use]
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            budget: None,
            expenses: Vec::new(),
            recurring_expenses: Vec::new(),
            recurring_incomes: Vec::new(),
            incomes: Vec::new(),
            category_budgets: Vec::new(),
            savings: None,
            totals: Totals::default(),
            version: 0,
        }
    }

    /// Loads every collection of `month` and computes its totals.
    pub async fn load<C>(db: &C, month: MonthKey) -> Result<Self>
    where
        C: ConnectionTrait,
    {
        let mut snapshot = Self::empty(month);
        snapshot.budget = budget::get_budget_by_month(db, month).await?;
        snapshot.expenses = expense::get_expenses_by_month(db, month).await?;
        snapshot.recurring_expenses = recurring_expense::get_all_recurring_expenses(db).await?;
        snapshot.recurring_incomes = recurring_income::get_all_recurring_incomes(db).await?;
        snapshot.incomes = income::get_incomes_by_month(db, month).await?;
        snapshot.category_budgets = category_budget::get_category_budgets_by_month(db, month).await?;
        snapshot.savings = savings::get_savings_tracker(db, month).await?;
        snapshot.recompute();
        Ok(snapshot)
    }

    /// Recomputes the totals from the held records.
    pub fn recompute(&mut self) {
        self.totals = Totals::compute(self);
        self.version += 1;
    }

    /// Whether the month has any income on record.
    #[must_use]
    pub fn has_income(&self) -> bool {
        !self.incomes.is_empty()
    }
}
