//! Recurring expense entity - A standing monthly obligation (rent, subscriptions).
//!
//! Templates are period-independent. Active templates count towards the
//! monthly recurring total without being dated transactions themselves.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurring expense template database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_expenses")]
pub struct Model {
    /// Unique identifier for the template
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Monthly amount
    pub amount: f64,
    /// Category catalog id
    pub category: String,
    /// Optional free-form note
    pub description: Option<String>,
    /// Inactive templates are kept for history but excluded from totals
    pub is_active: bool,
    /// When the template was created
    pub created_at: DateTimeUtc,
}

/// `RecurringExpense` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
