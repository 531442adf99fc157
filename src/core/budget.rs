//! Monthly budget persistence.
//!
//! One budget row exists per month. It carries the manual spending ceiling and
//! anchors the month's expenses through `expense.budget_id`.

use crate::{
    core::period::MonthKey,
    entities::{Budget, budget},
    errors::{Error, Result, ensure_non_negative_amount},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves the budget for a month, if one was created.
pub async fn get_budget_by_month<C>(db: &C, month: MonthKey) -> Result<Option<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .filter(budget::Column::Month.eq(month.to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every budget, newest month first.
pub async fn get_all_budgets<C>(db: &C) -> Result<Vec<budget::Model>>
where
    C: ConnectionTrait,
{
    Budget::find()
        .order_by_desc(budget::Column::Month)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets the manual ceiling for a month, creating the row if needed.
///
/// The month is the unique key: calling this twice for the same month updates
/// the existing row instead of inserting a second one.
pub async fn set_budget<C>(db: &C, month: MonthKey, amount: f64) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    ensure_non_negative_amount(amount)?;

    if let Some(existing) = get_budget_by_month(db, month).await? {
        let mut active_model: budget::ActiveModel = existing.into();
        active_model.amount = Set(amount);
        return active_model.update(db).await.map_err(Into::into);
    }

    let budget = budget::ActiveModel {
        month: Set(month.to_string()),
        amount: Set(amount),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    budget.insert(db).await.map_err(Into::into)
}

/// Returns the month's budget, creating one with a zero ceiling if it is missing.
///
/// Used when an expense is recorded for a month nobody has budgeted yet.
pub async fn get_or_create_budget<C>(db: &C, month: MonthKey) -> Result<budget::Model>
where
    C: ConnectionTrait,
{
    if let Some(existing) = get_budget_by_month(db, month).await? {
        return Ok(existing);
    }

    tracing::debug!("Creating empty budget for {}", month);
    let budget = budget::ActiveModel {
        month: Set(month.to_string()),
        amount: Set(0.0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    budget.insert(db).await.map_err(Into::into)
}

/// Deletes a budget by id.
///
/// Fails with [`Error::Database`] while expenses still reference the budget.
pub async fn delete_budget<C>(db: &C, budget_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Budget::delete_by_id(budget_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "budget",
            id: budget_id,
        });
    }
    Ok(())
}
