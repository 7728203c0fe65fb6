use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::amount::parse_amount;
use super::locale::Locale;
use crate::plan::MealPlan;

/// One line of the shopping list: an ingredient and its summed quantities,
/// one total per distinct unit, units in the order they were first seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    pub ingredient_name: String,
    pub totals: Vec<(String, f64)>,
}

impl ShoppingListEntry {
    fn new(name: &str) -> Self {
        Self {
            ingredient_name: name.to_string(),
            totals: Vec::new(),
        }
    }

    fn add(&mut self, unit: String, value: f64) {
        match self.totals.iter_mut().find(|(u, _)| *u == unit) {
            Some((_, total)) => *total += value,
            None => self.totals.push((unit, value)),
        }
    }

    pub fn total(&self, unit: &str) -> Option<f64> {
        self.totals.iter().find(|(u, _)| u == unit).map(|(_, v)| *v)
    }
}

/// Builds the shopping list for a meal plan using Russian collation.
pub fn aggregate(plan: &MealPlan) -> Vec<ShoppingListEntry> {
    aggregate_with_locale(plan, &Locale::ru())
}

/// Sums ingredient quantities over every self-prepared plan item.
///
/// Restaurant dishes and items whose ingredient list is not an array are
/// skipped. Quantities are grouped by exact ingredient name, then by exact
/// unit string; nothing is converted between units.
pub fn aggregate_with_locale(plan: &MealPlan, locale: &Locale) -> Vec<ShoppingListEntry> {
    let mut entries: Vec<ShoppingListEntry> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for (slot, item) in plan.items() {
        if !item.is_self_prepared() {
            tracing::trace!(%slot, name = %item.name, "Skipping non-DIY plan item");
            continue;
        }
        let Some(lines) = item.ingredient_lines() else {
            tracing::debug!(%slot, name = %item.name, "Plan item has no usable ingredient list");
            continue;
        };

        for line in lines {
            let parsed = parse_amount(line.amount);
            let idx = *index_by_name.entry(line.name.to_string()).or_insert_with(|| {
                entries.push(ShoppingListEntry::new(line.name));
                entries.len() - 1
            });
            entries[idx].add(parsed.unit, parsed.value);
        }
    }

    entries.sort_by(|a, b| locale.compare(&a.ingredient_name, &b.ingredient_name));
    entries
}
