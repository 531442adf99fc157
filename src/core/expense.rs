//! Expense business logic - Handles all expense-related operations.
//!
//! Expenses are attached to the budget row of the month their date falls in;
//! recording an expense for a month without a budget creates an empty one
//! first. Amounts must be positive and finite and a category must be chosen.

use crate::{
    core::{budget, period::MonthKey},
    entities::{Expense, expense},
    errors::{Error, Result, ensure_positive_amount},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields supplied when recording or editing an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    /// Amount spent, must be positive
    pub amount: f64,
    /// Category catalog id
    pub category: String,
    /// Optional note
    pub description: Option<String>,
    /// When the money was spent
    pub date: DateTime<Utc>,
}

impl ExpenseInput {
    fn validate(&self) -> Result<()> {
        ensure_positive_amount(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(Error::MissingCategory);
        }
        Ok(())
    }
}

/// Records a new expense, creating the month's budget row if necessary.
pub async fn create_expense<C>(db: &C, input: ExpenseInput) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;

    let month = MonthKey::from_date(&input.date);
    let budget = budget::get_or_create_budget(db, month).await?;

    let expense = expense::ActiveModel {
        budget_id: Set(budget.id),
        amount: Set(input.amount),
        category: Set(input.category.trim().to_string()),
        description: Set(normalize_description(input.description)),
        date: Set(input.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = expense.insert(db).await?;
    Ok(result)
}

/// Retrieves an expense by its unique ID.
pub async fn get_expense_by_id<C>(db: &C, expense_id: i64) -> Result<Option<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find_by_id(expense_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the expenses of one month, newest first.
pub async fn get_expenses_by_month<C>(db: &C, month: MonthKey) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    let Some(budget) = budget::get_budget_by_month(db, month).await? else {
        return Ok(Vec::new());
    };

    Expense::find()
        .filter(expense::Column::BudgetId.eq(budget.id))
        .order_by_desc(expense::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every expense, newest first.
pub async fn get_all_expenses<C>(db: &C) -> Result<Vec<expense::Model>>
where
    C: ConnectionTrait,
{
    Expense::find()
        .order_by_desc(expense::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the editable fields of an expense.
///
/// Moving the date into another month re-attaches the expense to that
/// month's budget row.
pub async fn update_expense<C>(db: &C, expense_id: i64, input: ExpenseInput) -> Result<expense::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;

    let existing = get_expense_by_id(db, expense_id)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "expense",
            id: expense_id,
        })?;

    let old_month = MonthKey::from_date(&existing.date);
    let new_month = MonthKey::from_date(&input.date);

    let mut active_model: expense::ActiveModel = existing.into();
    if old_month != new_month {
        let budget = budget::get_or_create_budget(db, new_month).await?;
        active_model.budget_id = Set(budget.id);
    }
    active_model.amount = Set(input.amount);
    active_model.category = Set(input.category.trim().to_string());
    active_model.description = Set(normalize_description(input.description));
    active_model.date = Set(input.date);

    active_model.update(db).await.map_err(Into::into)
}

/// Hard-deletes an expense.
pub async fn delete_expense<C>(db: &C, expense_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Expense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "expense",
            id: expense_id,
        });
    }
    Ok(())
}

/// Trims a description and drops it when empty.
pub(crate) fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
