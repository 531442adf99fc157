//! Income entity - A revenue instance scoped to one month.
//!
//! Instances are either entered by hand or materialized from a recurring
//! income template during refresh, in which case `is_recurring` is set and
//! `source_template_id` points back at the template.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Amount received
    pub amount: f64,
    /// Income source id: `"salary"`, `"bonus"`, `"freelance"`, `"gift"` or `"other"`
    pub source: String,
    /// Optional free-form note
    pub description: Option<String>,
    /// Whether this instance was spawned from a recurring template
    pub is_recurring: bool,
    /// Template this instance was materialized from, if any
    pub source_template_id: Option<i64>,
    /// When the income was received
    pub date: DateTimeUtc,
    /// When the record was created
    pub created_at: DateTimeUtc,
}

/// `Income` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
