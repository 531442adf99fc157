//! Income persistence.
//!
//! Incomes are scoped to a month key. Hand-entered incomes carry
//! `is_recurring = false`; the rollover engine creates the recurring ones.

use crate::{
    core::{catalog::IncomeSource, expense::normalize_description, period::MonthKey},
    entities::{Income, income},
    errors::{Error, Result, ensure_positive_amount},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields supplied when recording or editing an income.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeInput {
    /// Month the income counts towards
    pub month: MonthKey,
    /// Amount received, must be positive
    pub amount: f64,
    /// Where the money came from
    pub source: IncomeSource,
    /// Optional note
    pub description: Option<String>,
    /// When the money arrived
    pub date: DateTime<Utc>,
}

/// A fully specified income instance, including recurrence bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    /// Fields shared with hand-entered incomes
    pub input: IncomeInput,
    /// Whether the instance was spawned from a template
    pub is_recurring: bool,
    /// Template the instance was spawned from
    pub source_template_id: Option<i64>,
}

impl From<IncomeInput> for NewIncome {
    fn from(input: IncomeInput) -> Self {
        Self {
            input,
            is_recurring: false,
            source_template_id: None,
        }
    }
}

/// Records an income.
pub async fn create_income<C>(db: &C, new_income: NewIncome) -> Result<income::Model>
where
    C: ConnectionTrait,
{
    let NewIncome {
        input,
        is_recurring,
        source_template_id,
    } = new_income;
    ensure_positive_amount(input.amount)?;

    let income = income::ActiveModel {
        month: Set(input.month.to_string()),
        amount: Set(input.amount),
        source: Set(input.source.as_str().to_string()),
        description: Set(normalize_description(input.description)),
        is_recurring: Set(is_recurring),
        source_template_id: Set(source_template_id),
        date: Set(input.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    income.insert(db).await.map_err(Into::into)
}

/// Retrieves the incomes of one month, oldest first.
pub async fn get_incomes_by_month<C>(db: &C, month: MonthKey) -> Result<Vec<income::Model>>
where
    C: ConnectionTrait,
{
    Income::find()
        .filter(income::Column::Month.eq(month.to_string()))
        .order_by_asc(income::Column::Date)
        .order_by_asc(income::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every income, newest month first.
pub async fn get_all_incomes<C>(db: &C) -> Result<Vec<income::Model>>
where
    C: ConnectionTrait,
{
    Income::find()
        .order_by_desc(income::Column::Month)
        .order_by_asc(income::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Replaces the editable fields of an income. Recurrence bookkeeping is kept.
pub async fn update_income<C>(db: &C, income_id: i64, input: IncomeInput) -> Result<income::Model>
where
    C: ConnectionTrait,
{
    ensure_positive_amount(input.amount)?;

    let existing = Income::find_by_id(income_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound {
            kind: "income",
            id: income_id,
        })?;

    let mut active_model: income::ActiveModel = existing.into();
    active_model.month = Set(input.month.to_string());
    active_model.amount = Set(input.amount);
    active_model.source = Set(input.source.as_str().to_string());
    active_model.description = Set(normalize_description(input.description));
    active_model.date = Set(input.date);
    active_model.update(db).await.map_err(Into::into)
}

/// Hard-deletes an income.
///
/// Deleting a materialized recurring income lets the next refresh create it
/// again while its template stays active.
pub async fn delete_income<C>(db: &C, income_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = Income::delete_by_id(income_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "income",
            id: income_id,
        });
    }
    Ok(())
}
