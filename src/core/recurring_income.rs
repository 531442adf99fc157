//! Recurring income templates.
//!
//! Templates are materialized into monthly [`crate::entities::income`] rows by
//! [`crate::core::rollover`]; this module only stores them.

use crate::{
    core::{catalog::IncomeSource, expense::normalize_description},
    entities::{RecurringIncome, recurring_income},
    errors::{Error, Result, ensure_positive_amount},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields supplied when creating or editing a recurring income.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurringIncomeInput {
    /// Amount materialized each month, must be positive
    pub amount: f64,
    /// Where the money comes from
    pub source: IncomeSource,
    /// Optional note, copied onto materialized incomes
    pub description: Option<String>,
    /// Whether refresh materializes the template
    pub is_active: bool,
}

/// Creates a recurring income template.
pub async fn create_recurring_income<C>(
    db: &C,
    input: RecurringIncomeInput,
) -> Result<recurring_income::Model>
where
    C: ConnectionTrait,
{
    ensure_positive_amount(input.amount)?;

    let template = recurring_income::ActiveModel {
        amount: Set(input.amount),
        source: Set(input.source.as_str().to_string()),
        description: Set(normalize_description(input.description)),
        is_active: Set(input.is_active),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    template.insert(db).await.map_err(Into::into)
}

/// Retrieves every template, oldest first.
pub async fn get_all_recurring_incomes<C>(db: &C) -> Result<Vec<recurring_income::Model>>
where
    C: ConnectionTrait,
{
    RecurringIncome::find()
        .order_by_asc(recurring_income::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the editable fields of a template.
///
/// Incomes already materialized for the current month are not touched.
pub async fn update_recurring_income<C>(
    db: &C,
    template_id: i64,
    input: RecurringIncomeInput,
) -> Result<recurring_income::Model>
where
    C: ConnectionTrait,
{
    ensure_positive_amount(input.amount)?;

    let existing = RecurringIncome::find_by_id(template_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "recurring income",
            id: template_id,
        })?;

    let mut active_model: recurring_income::ActiveModel = existing.into();
    active_model.amount = Set(input.amount);
    active_model.source = Set(input.source.as_str().to_string());
    active_model.description = Set(normalize_description(input.description));
    active_model.is_active = Set(input.is_active);
    active_model.update(db).await.map_err(Into::into)
}

/// Hard-deletes a template. Incomes already materialized from it stay.
pub async fn delete_recurring_income<C>(db: &C, template_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = RecurringIncome::delete_by_id(template_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "recurring income",
            id: template_id,
        });
    }
    Ok(())
}
