//! Period rollover and recurring income materialization.
//!
//! On every refresh the active recurring income templates are reconciled
//! against the incomes already stored for the current month. A template
//! without a matching instance gets exactly one new income for the month; a
//! second refresh with unchanged templates creates nothing.
//!
//! Category budgets flagged as recurring are carried into the following month
//! only on request, through [`clone_recurring_category_budgets`].

use crate::{
    core::{
        catalog::IncomeSource,
        category_budget::{self, CategoryBudgetInput},
        income::{self, IncomeInput, NewIncome},
        period::MonthKey,
        recurring_income,
    },
    entities::{
        category_budget as category_budget_entity, income as income_entity,
        recurring_income as recurring_income_entity,
    },
    errors::Result,
};
use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// How refresh decides that a template was already materialized this month.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    /// Match on `(month, source, amount, is_recurring)`.
    ///
    /// Two active templates with the same source and amount are
    /// indistinguishable under this key and only one of them materializes.
    Content,
    /// Match on `(month, source_template_id)`, so every template materializes
    /// independently.
    #[default]
    TemplateId,
}

impl DedupStrategy {
    fn matches(
        self,
        month: MonthKey,
        template: &recurring_income_entity::Model,
        candidate: &Candidate<'_>,
    ) -> bool {
        if candidate.month != month.to_string() {
            return false;
        }
        match self {
            Self::Content => {
                candidate.is_recurring
                    && candidate.source == template.source
                    && candidate.amount == template.amount
            }
            Self::TemplateId => candidate.source_template_id == Some(template.id),
        }
    }
}

/// The fields of an income the dedup predicates look at.
struct Candidate<'a> {
    month: String,
    source: &'a str,
    amount: f64,
    is_recurring: bool,
    source_template_id: Option<i64>,
}

impl<'a> From<&'a income_entity::Model> for Candidate<'a> {
    fn from(income: &'a income_entity::Model) -> Self {
        Self {
            month: income.month.clone(),
            source: &income.source,
            amount: income.amount,
            is_recurring: income.is_recurring,
            source_template_id: income.source_template_id,
        }
    }
}

/// Decides which incomes refresh has to create for `month`.
///
/// Inactive templates are skipped, as are templates whose source is no longer
/// known. Planned instances take part in deduplication too, so under
/// [`DedupStrategy::Content`] identical templates yield a single instance.
#[must_use]
pub fn plan_recurring_incomes(
    month: MonthKey,
    templates: &[recurring_income_entity::Model],
    existing: &[income_entity::Model],
    strategy: DedupStrategy,
    now: DateTime<Utc>,
) -> Vec<NewIncome> {
    let mut planned: Vec<NewIncome> = Vec::new();

    for template in templates.iter().filter(|t| t.is_active) {
        let Ok(source) = template.source.parse::<IncomeSource>() else {
            warn!(
                "Skipping recurring income {} with unknown source '{}'",
                template.id, template.source
            );
            continue;
        };

        let already_existing = existing
            .iter()
            .map(Candidate::from)
            .any(|c| strategy.matches(month, template, &c));
        let already_planned = planned.iter().any(|p| {
            strategy.matches(
                month,
                template,
                &Candidate {
                    month: p.input.month.to_string(),
                    source: p.input.source.as_str(),
                    amount: p.input.amount,
                    is_recurring: p.is_recurring,
                    source_template_id: p.source_template_id,
                },
            )
        });
        if already_existing || already_planned {
            continue;
        }

        planned.push(NewIncome {
            input: IncomeInput {
                month,
                amount: template.amount,
                source,
                description: template.description.clone(),
                date: now,
            },
            is_recurring: true,
            source_template_id: Some(template.id),
        });
    }

    planned
}

/// Outcome of materializing recurring incomes for a month.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterializationResult {
    /// Month that was reconciled
    pub month: MonthKey,
    /// Incomes created by this run
    pub created: Vec<income_entity::Model>,
    /// Every income of the month after the run
    pub incomes: Vec<income_entity::Model>,
}

/// Creates the missing recurring incomes for `month` and reloads the month.
///
/// Reads templates and existing incomes, writes the planned instances one by
/// one, then reads the month again. A failing write aborts the run; instances
/// written before the failure stay and are recognised by the next run.
pub async fn materialize_recurring_incomes<C>(
    db: &C,
    month: MonthKey,
    strategy: DedupStrategy,
    now: DateTime<Utc>,
) -> Result<MaterializationResult>
where
    C: ConnectionTrait,
{
    let templates = recurring_income::get_all_recurring_incomes(db).await?;
    let existing = income::get_incomes_by_month(db, month).await?;

    let planned = plan_recurring_incomes(month, &templates, &existing, strategy, now);
    debug!(
        "Planned {} recurring incomes for {} from {} templates",
        planned.len(),
        month,
        templates.len()
    );

    let mut created = Vec::with_capacity(planned.len());
    for new_income in planned {
        created.push(income::create_income(db, new_income).await?);
    }
    if !created.is_empty() {
        info!("Materialized {} recurring incomes for {}", created.len(), month);
    }

    let incomes = income::get_incomes_by_month(db, month).await?;
    Ok(MaterializationResult {
        month,
        created,
        incomes,
    })
}

/// Copies the recurring category budgets of `from` into `to`.
///
/// Categories that already have a budget in `to` are left alone, so running
/// the copy twice is harmless. Returns the newly created budgets.
pub async fn clone_recurring_category_budgets<C>(
    db: &C,
    from: MonthKey,
    to: MonthKey,
) -> Result<Vec<category_budget_entity::Model>>
where
    C: ConnectionTrait,
{
    let source = category_budget::get_category_budgets_by_month(db, from).await?;
    let target = category_budget::get_category_budgets_by_month(db, to).await?;

    let mut cloned = Vec::new();
    for budget in source.into_iter().filter(|b| b.is_recurring) {
        if target.iter().any(|t| t.category == budget.category) {
            continue;
        }
        cloned.push(
            category_budget::set_category_budget(
                db,
                CategoryBudgetInput {
                    month: to,
                    category: budget.category,
                    amount: budget.amount,
                    is_recurring: true,
                },
            )
            .await?,
        );
    }

    info!(
        "Carried {} recurring category budgets from {} into {}",
        cloned.len(),
        from,
        to
    );
    Ok(cloned)
}
