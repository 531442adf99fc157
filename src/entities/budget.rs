//! Budget entity - One row per month holding the manual spending ceiling.
//!
//! The manual amount only drives the dashboard when the month has no income
//! records. Expenses hang off the budget row of their month.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Monthly budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    /// Unique identifier for the budget
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Month key in `YYYY-MM` form, at most one budget per month
    #[sea_orm(unique)]
    pub month: String,
    /// Manual monthly ceiling
    pub amount: f64,
    /// When the budget row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Budget and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One budget has many expenses
    #[sea_orm(has_many = "super::expense::Entity")]
    Expenses,
}

impl Related<super::expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
