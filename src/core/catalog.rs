//! Category and income-source catalogs.
//!
//! Static reference data mapping the ids stored on records to display
//! metadata. Lookups return `Option` because historical records may reference
//! categories that were removed from the catalog; presentation falls back to
//! the "Other" label instead of failing.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label key used when a category id is not in the catalog.
pub const FALLBACK_LABEL_KEY: &str = "categories.other";
/// Icon used when a category id is not in the catalog.
pub const FALLBACK_ICON: &str = "📦";

/// Coarse grouping used for summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    /// Housing, food, transport and other needs
    Essentials,
    /// Discretionary spending
    Lifestyle,
    /// Savings-like or miscellaneous spending
    Other,
}

/// Display metadata for an expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Id stored on `Expense`, `RecurringExpense` and `CategoryBudget` rows
    pub id: &'static str,
    /// Emoji icon
    pub icon: &'static str,
    /// Translation key for the label
    pub label_key: &'static str,
    /// Summary group
    pub group: CategoryGroup,
}

const fn category(
    id: &'static str,
    icon: &'static str,
    label_key: &'static str,
    group: CategoryGroup,
) -> CategoryInfo {
    CategoryInfo {
        id,
        icon,
        label_key,
        group,
    }
}

/// Every expense category the application offers, in display order.
pub const EXPENSE_CATEGORIES: &[CategoryInfo] = &[
    category("housing", "🏠", "categories.housing", CategoryGroup::Essentials),
    category("food", "🛒", "categories.food", CategoryGroup::Essentials),
    category("transport", "🚗", "categories.transport", CategoryGroup::Essentials),
    category("utilities", "💡", "categories.utilities", CategoryGroup::Essentials),
    category("health", "💊", "categories.health", CategoryGroup::Essentials),
    category("education", "📚", "categories.education", CategoryGroup::Essentials),
    category("restaurants", "🍽️", "categories.restaurants", CategoryGroup::Lifestyle),
    category("entertainment", "🎬", "categories.entertainment", CategoryGroup::Lifestyle),
    category("shopping", "🛍️", "categories.shopping", CategoryGroup::Lifestyle),
    category("travel", "✈️", "categories.travel", CategoryGroup::Lifestyle),
    category("subscriptions", "📺", "categories.subscriptions", CategoryGroup::Lifestyle),
    category("gifts", "🎁", "categories.gifts", CategoryGroup::Other),
    category("other", FALLBACK_ICON, FALLBACK_LABEL_KEY, CategoryGroup::Other),
];

/// Finds a category by id.
#[must_use]
pub fn find_category(id: &str) -> Option<&'static CategoryInfo> {
    EXPENSE_CATEGORIES.iter().find(|c| c.id == id)
}

/// Label key for a category id, falling back to "Other" for unknown ids.
#[must_use]
pub fn category_label_key(id: &str) -> &'static str {
    find_category(id).map_or(FALLBACK_LABEL_KEY, |c| c.label_key)
}

/// Icon for a category id, falling back to the "Other" icon for unknown ids.
#[must_use]
pub fn category_icon(id: &str) -> &'static str {
    find_category(id).map_or(FALLBACK_ICON, |c| c.icon)
}

/// Where an income came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeSource {
    /// Regular wage
    Salary,
    /// One-off bonus
    Bonus,
    /// Freelance or side work
    Freelance,
    /// Money received as a gift
    Gift,
    /// Anything else
    Other,
}

impl IncomeSource {
    /// All sources in display order.
    pub const ALL: [Self; 5] = [
        Self::Salary,
        Self::Bonus,
        Self::Freelance,
        Self::Gift,
        Self::Other,
    ];

    /// Id stored on `Income` and `RecurringIncome` rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Bonus => "bonus",
            Self::Freelance => "freelance",
            Self::Gift => "gift",
            Self::Other => "other",
        }
    }

    /// Emoji icon for the source.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Salary => "💼",
            Self::Bonus => "🎉",
            Self::Freelance => "💻",
            Self::Gift => "🎁",
            Self::Other => "💰",
        }
    }

    /// Translation key for the source label.
    #[must_use]
    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Salary => "income.salary",
            Self::Bonus => "income.bonus",
            Self::Freelance => "income.freelance",
            Self::Gift => "income.gift",
            Self::Other => "income.other",
        }
    }
}

impl fmt::Display for IncomeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IncomeSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| Error::UnknownIncomeSource {
                name: s.to_string(),
            })
    }
}

/// Looks up a stored income source id, `None` for ids no longer offered.
#[must_use]
pub fn find_income_source(id: &str) -> Option<IncomeSource> {
    id.parse().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_find_known_category() {
        let food = find_category("food").unwrap();
        assert_eq!(food.label_key, "categories.food");
        assert_eq!(food.group, CategoryGroup::Essentials);
    }

    #[test]
    fn test_unknown_category_degrades_to_other() {
        assert!(find_category("crypto").is_none());
        assert_eq!(category_label_key("crypto"), FALLBACK_LABEL_KEY);
        assert_eq!(category_icon("crypto"), FALLBACK_ICON);
    }

    #[test]
    fn test_category_ids_are_unique() {
        for (i, a) in EXPENSE_CATEGORIES.iter().enumerate() {
            for b in &EXPENSE_CATEGORIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_income_source_round_trips_through_str() {
        for source in IncomeSource::ALL {
            assert_eq!(source.as_str().parse::<IncomeSource>().unwrap(), source);
        }
    }

    #[test]
    fn test_unknown_income_source() {
        assert!(matches!(
            "lottery".parse::<IncomeSource>(),
            Err(Error::UnknownIncomeSource { name }) if name == "lottery"
        ));
        assert!(find_income_source("lottery").is_none());
    }
}
