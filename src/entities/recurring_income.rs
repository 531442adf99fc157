//! Recurring income entity - A revenue template such as a monthly salary.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recurring income template database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_incomes")]
pub struct Model {
    /// Unique identifier for the template
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Amount materialized each month
    pub amount: f64,
    /// Income source id
    pub source: String,
    /// Optional free-form note, copied onto materialized instances
    pub description: Option<String>,
    /// Only active templates are materialized
    pub is_active: bool,
    /// When the template was created
    pub created_at: DateTimeUtc,
}

/// `RecurringIncome` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
