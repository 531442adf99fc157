//! Category budget persistence.
//!
//! A month holds at most one ceiling per category; [`set_category_budget`]
//! upserts on `(month, category)` and the table carries a unique index on the
//! same pair.

use crate::{
    core::period::MonthKey,
    entities::{CategoryBudget, category_budget},
    errors::{Error, Result, ensure_non_negative_amount},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields supplied when setting a category ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBudgetInput {
    /// Month the ceiling applies to
    pub month: MonthKey,
    /// Category catalog id
    pub category: String,
    /// Ceiling, zero allowed
    pub amount: f64,
    /// Whether the ceiling is carried into the next month
    pub is_recurring: bool,
}

/// Sets the ceiling for a category in a month, updating any existing row.
pub async fn set_category_budget<C>(
    db: &C,
    input: CategoryBudgetInput,
) -> Result<category_budget::Model>
where
    C: ConnectionTrait,
{
    ensure_non_negative_amount(input.amount)?;
    let category = input.category.trim().to_string();
    if category.is_empty() {
        return Err(Error::MissingCategory);
    }

    let existing = CategoryBudget::find()
        .filter(category_budget::Column::Month.eq(input.month.to_string()))
        .filter(category_budget::Column::Category.eq(category.as_str()))
        .one(db)
        .await?;

    if let Some(existing) = existing {
        let mut active_model: category_budget::ActiveModel = existing.into();
        active_model.amount = Set(input.amount);
        active_model.is_recurring = Set(input.is_recurring);
        return active_model.update(db).await.map_err(Into::into);
    }

    let model = category_budget::ActiveModel {
        month: Set(input.month.to_string()),
        category: Set(category),
        amount: Set(input.amount),
        is_recurring: Set(input.is_recurring),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves the category budgets of one month in creation order.
pub async fn get_category_budgets_by_month<C>(
    db: &C,
    month: MonthKey,
) -> Result<Vec<category_budget::Model>>
where
    C: ConnectionTrait,
{
    CategoryBudget::find()
        .filter(category_budget::Column::Month.eq(month.to_string()))
        .order_by_asc(category_budget::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Hard-deletes a category budget.
pub async fn delete_category_budget<C>(db: &C, category_budget_id: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = CategoryBudget::delete_by_id(category_budget_id)
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound {
            kind: "category budget",
            id: category_budget_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_set_category_budget_upserts() -> Result<()> {
        let db = setup_test_db().await?;

        let first = set_category_budget(&db, category_budget_input("2024-05", "food", 400.0)).await?;
        let second =
            set_category_budget(&db, category_budget_input("2024-05", " food ", 450.0)).await?;

        assert_eq!(first.id, second.id);
        assert_eq!(second.amount, 450.0);
        assert_eq!(get_category_budgets_by_month(&db, month("2024-05")).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_same_category_in_different_months() -> Result<()> {
        let db = setup_test_db().await?;
        set_category_budget(&db, category_budget_input("2024-05", "food", 400.0)).await?;
        set_category_budget(&db, category_budget_input("2024-06", "food", 420.0)).await?;

        let june = get_category_budgets_by_month(&db, month("2024-06")).await?;
        assert_eq!(june.len(), 1);
        assert_eq!(june[0].amount, 420.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_category_budget(&db, category_budget_input("2024-05", "", 10.0)).await;
        assert!(matches!(result, Err(Error::MissingCategory)));

        let result = set_category_budget(&db, category_budget_input("2024-05", "food", -1.0)).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_category_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let budget = set_category_budget(&db, category_budget_input("2024-05", "food", 400.0)).await?;

        delete_category_budget(&db, budget.id).await?;
        assert!(get_category_budgets_by_month(&db, month("2024-05")).await?.is_empty());

        let result = delete_category_budget(&db, budget.id).await;
        assert!(matches!(result, Err(Error::RecordNotFound { .. })));

        Ok(())
    }
}
