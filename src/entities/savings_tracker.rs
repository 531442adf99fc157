//! Savings tracker entity - Target versus actual savings for one month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Savings tracker database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "savings_trackers")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Month key in `YYYY-MM` form
    #[sea_orm(unique)]
    pub month: String,
    /// Amount the household plans to put aside this month
    pub target_amount: f64,
    /// Amount actually saved, recorded when the month is closed
    pub actual_saved: f64,
    /// Lifetime running total including this month
    pub total_accumulated: f64,
    /// When the tracker was last modified
    pub updated_at: DateTimeUtc,
}

/// `SavingsTracker` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
