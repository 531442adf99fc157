//! Expense entity - A single dated spend event.
//!
//! Each expense belongs to the `budget_id` of the month its `date` falls in.
//! The `category` is a catalog id and may reference a category that no longer
//! exists in the catalog.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the budget (period) this expense belongs to
    pub budget_id: i64,
    /// Amount spent, always positive
    pub amount: f64,
    /// Category catalog id (e.g. `"food"`)
    pub category: String,
    /// Optional free-form note
    pub description: Option<String>,
    /// When the money was spent
    pub date: DateTimeUtc,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Expense and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each expense belongs to one budget
    #[sea_orm(
        belongs_to = "super::budget::Entity",
        from = "Column::BudgetId",
        to = "super::budget::Column::Id"
    )]
    Budget,
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
