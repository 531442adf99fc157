//! Savings tracker persistence.
//!
//! Each month may carry a savings target. When a month is closed the actual
//! amount saved is recorded and added to the running lifetime total of the
//! most recent earlier tracked month.

use crate::{
    core::period::MonthKey,
    entities::{SavingsTracker, savings_tracker},
    errors::{Error, Result, ensure_non_negative_amount},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves the tracker of a month, if any.
pub async fn get_savings_tracker<C>(
    db: &C,
    month: MonthKey,
) -> Result<Option<savings_tracker::Model>>
where
    C: ConnectionTrait,
{
    SavingsTracker::find()
        .filter(savings_tracker::Column::Month.eq(month.to_string()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the latest tracker strictly before `month`.
async fn get_previous_tracker<C>(
    db: &C,
    month: MonthKey,
) -> Result<Option<savings_tracker::Model>>
where
    C: ConnectionTrait,
{
    // `YYYY-MM` keys sort chronologically as text
    SavingsTracker::find()
        .filter(savings_tracker::Column::Month.lt(month.to_string()))
        .order_by_desc(savings_tracker::Column::Month)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets the savings target of a month, creating the tracker if needed.
///
/// A new tracker starts with nothing saved this month and carries the running
/// total forward from the previous tracked month.
pub async fn set_savings_target<C>(
    db: &C,
    month: MonthKey,
    target_amount: f64,
) -> Result<savings_tracker::Model>
where
    C: ConnectionTrait,
{
    ensure_non_negative_amount(target_amount)?;

    if let Some(existing) = get_savings_tracker(db, month).await? {
        let mut active_model: savings_tracker::ActiveModel = existing.into();
        active_model.target_amount = Set(target_amount);
        active_model.updated_at = Set(Utc::now());
        return active_model.update(db).await.map_err(Into::into);
    }

    let carried = get_previous_tracker(db, month)
        .await?
        .map_or(0.0, |t| t.total_accumulated);

    let tracker = savings_tracker::ActiveModel {
        month: Set(month.to_string()),
        target_amount: Set(target_amount),
        actual_saved: Set(0.0),
        total_accumulated: Set(carried),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    tracker.insert(db).await.map_err(Into::into)
}

/// Records what was actually saved in a month and updates the running total.
///
/// `actual_saved` may be negative when the household dipped into savings.
/// Trackers of later months are not re-accumulated.
pub async fn record_actual_savings<C>(
    db: &C,
    month: MonthKey,
    actual_saved: f64,
) -> Result<savings_tracker::Model>
where
    C: ConnectionTrait,
{
    if !actual_saved.is_finite() {
        return Err(Error::InvalidAmount {
            amount: actual_saved,
        });
    }

    let carried = get_previous_tracker(db, month)
        .await?
        .map_or(0.0, |t| t.total_accumulated);
    let total_accumulated = carried + actual_saved;

    if let Some(existing) = get_savings_tracker(db, month).await? {
        let mut active_model: savings_tracker::ActiveModel = existing.into();
        active_model.actual_saved = Set(actual_saved);
        active_model.total_accumulated = Set(total_accumulated);
        active_model.updated_at = Set(Utc::now());
        return active_model.update(db).await.map_err(Into::into);
    }

    let tracker = savings_tracker::ActiveModel {
        month: Set(month.to_string()),
        target_amount: Set(0.0),
        actual_saved: Set(actual_saved),
        total_accumulated: Set(total_accumulated),
        updated_at: Set(Utc::now()),
        ..Default::default()
    };
    tracker.insert(db).await.map_err(Into::into)
}
