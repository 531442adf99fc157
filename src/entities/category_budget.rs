//! Category budget entity - A per-category spending ceiling for one month.
//!
//! `(month, category)` is unique; see `config::database::create_tables`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category budget database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category_budgets")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Category catalog id
    pub category: String,
    /// Spending ceiling for the category
    pub amount: f64,
    /// Whether this ceiling is carried into the next month
    pub is_recurring: bool,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// `CategoryBudget` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
