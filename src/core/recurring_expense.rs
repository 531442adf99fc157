//! Recurring expense templates.
//!
//! In personal mode a template only contributes its amount to the monthly
//! recurring total. In shared mode creating a template also posts a dated
//! expense for the current month, see [`create_recurring_expense_with_instance`].

use crate::{
    core::expense::{self, ExpenseInput, normalize_description},
    entities::{RecurringExpense, expense as expense_entity, recurring_expense},
    errors::{Error, Result, ensure_positive_amount},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields supplied when creating or editing a recurring expense.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringExpenseInput {
    /// Monthly amount, must be positive
    pub amount: f64,
    /// Category catalog id
    pub category: String,
    /// Optional note
    pub description: Option<String>,
    /// Whether the template counts towards totals
    pub is_active: bool,
}

impl RecurringExpenseInput {
    fn validate(&self) -> Result<()> {
        ensure_positive_amount(self.amount)?;
        if self.category.trim().is_empty() {
            return Err(Error::MissingCategory);
        }
        Ok(())
    }
}

/// Creates a recurring expense template.
pub async fn create_recurring_expense<C>(
    db: &C,
    input: RecurringExpenseInput,
) -> Result<recurring_expense::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;

    let template = recurring_expense::ActiveModel {
        amount: Set(input.amount),
        category: Set(input.category.trim().to_string()),
        description: Set(normalize_description(input.description)),
        is_active: Set(input.is_active),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    template.insert(db).await.map_err(Into::into)
}

/// Creates a template and immediately posts it as a dated expense on `date`.
///
/// This is the shared-account flow, where each member sees the recurring
/// charge as a concrete transaction of the month it was set up in. Inactive
/// templates are stored without posting an expense.
pub async fn create_recurring_expense_with_instance<C>(
    db: &C,
    input: RecurringExpenseInput,
    date: DateTime<Utc>,
) -> Result<(recurring_expense::Model, Option<expense_entity::Model>)>
where
    C: ConnectionTrait,
{
    let template = create_recurring_expense(db, input).await?;
    if !template.is_active {
        return Ok((template, None));
    }

    let instance = expense::create_expense(
        db,
        ExpenseInput {
            amount: template.amount,
            category: template.category.clone(),
            description: template.description.clone(),
            date,
        },
    )
    .await?;

    Ok((template, Some(instance)))
}

/// Retrieves every template, oldest first.
pub async fn get_all_recurring_expenses<C>(db: &C) -> Result<Vec<recurring_expense::Model>>
where
    C: ConnectionTrait,
{
    RecurringExpense::find()
        .order_by_asc(recurring_expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the templates that currently count towards totals.
pub async fn get_active_recurring_expenses<C>(db: &C) -> Result<Vec<recurring_expense::Model>>
where
    C: ConnectionTrait,
{
    RecurringExpense::find()
        .filter(recurring_expense::Column::IsActive.eq(true))
        .order_by_asc(recurring_expense::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the editable fields of a template.
pub async fn update_recurring_expense<C>(
    db: &C,
    template_id: i64,
    input: RecurringExpenseInput,
) -> Result<recurring_expense::Model>
where
    C: ConnectionTrait,
{
    input.validate()?;

    let existing = RecurringExpense::find_by_id(template_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "recurring expense",
            id: template_id,
        })?;

    let mut active_model: recurring_expense::ActiveModel = existing.into();
    active_model.amount = Set(input.amount);
    active_model.category = Set(input.category.trim().to_string());
    active_model.description = Set(normalize_description(input.description));
    active_model.is_active = Set(input.is_active);
    active_model.update(db).await.map_err(Into::into)
}

/// Hard-deletes a template. Expenses already posted from it stay.
pub async fn delete_recurring_expense<C>(db: &C, template_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = RecurringExpense::delete_by_id(template_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "recurring expense",
            id: template_id,
        });
    }
    Ok(())
}
