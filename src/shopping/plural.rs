use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::locale::{Locale, PluralCategory};

/// Grammatical forms of one count-sensitive unit word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitForms {
    pub one: String,
    pub few: String,
    pub many: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

impl UnitForms {
    pub fn new(one: &str, few: &str, many: &str) -> Self {
        Self {
            one: one.to_string(),
            few: few.to_string(),
            many: many.to_string(),
            other: None,
        }
    }

    pub fn select(&self, category: PluralCategory) -> &str {
        match category {
            PluralCategory::One => &self.one,
            PluralCategory::Few => &self.few,
            PluralCategory::Many => &self.many,
            PluralCategory::Other => self.other.as_deref().unwrap_or(&self.many),
        }
    }
}

/// Lookup table from a unit as written in recipes to its plural forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PluralTable {
    units: HashMap<String, UnitForms>,
}

impl Default for PluralTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert("щепотка", UnitForms::new("щепотка", "щепотки", "щепоток"));
        table.insert("штука", UnitForms::new("штука", "штуки", "штук"));
        table.insert("ложка", UnitForms::new("ложка", "ложки", "ложек"));
        table.insert("стакан", UnitForms::new("стакан", "стакана", "стаканов"));
        table.insert("зубчик", UnitForms::new("зубчик", "зубчика", "зубчиков"));
        table.insert("пучок", UnitForms::new("пучок", "пучка", "пучков"));
        table.insert("ломтик", UnitForms::new("ломтик", "ломтика", "ломтиков"));
        table
    }
}

impl PluralTable {
    pub fn empty() -> Self {
        Self { units: HashMap::new() }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, unit: &str, forms: UnitForms) {
        self.units.insert(unit.to_string(), forms);
    }

    pub fn get(&self, unit: &str) -> Option<&UnitForms> {
        self.units.get(unit)
    }

    /// Unit word agreeing with `value`. Unknown units, and locales without
    /// plural rules, get the unit back unchanged.
    pub fn pluralize<'a>(&'a self, locale: &Locale, value: f64, unit: &'a str) -> &'a str {
        let Some(category) = locale.plural_category(value) else {
            return unit;
        };
        match self.units.get(unit) {
            Some(forms) => forms.select(category),
            None => unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinch_forms() {
        let table = PluralTable::default();
        let ru = Locale::ru();
        assert_eq!(table.pluralize(&ru, 1.0, "щепотка"), "щепотка");
        assert_eq!(table.pluralize(&ru, 3.0, "щепотка"), "щепотки");
        assert_eq!(table.pluralize(&ru, 10.0, "щепотка"), "щепоток");
        assert_eq!(table.pluralize(&ru, 21.0, "щепотка"), "щепотка");
        // Fractions fall under "other", which falls back to the "many" form.
        assert_eq!(table.pluralize(&ru, 1.5, "щепотка"), "щепоток");
    }

    #[test]
    fn test_unknown_unit_unchanged() {
        let table = PluralTable::default();
        assert_eq!(table.pluralize(&Locale::ru(), 5.0, "г"), "г");
        assert_eq!(table.pluralize(&Locale::ru(), 5.0, ""), "");
    }

    #[test]
    fn test_locale_without_rules_leaves_unit_unchanged() {
        let table = PluralTable::default();
        assert_eq!(table.pluralize(&Locale::new("xx"), 3.0, "щепотка"), "щепотка");
    }

    #[test]
    fn test_table_from_json_with_other_form() {
        let table = PluralTable::from_json_str(
            r#"{"долька": {"one": "долька", "few": "дольки", "many": "долек", "other": "дольки"}}"#,
        )
        .unwrap();
        let ru = Locale::ru();
        assert_eq!(table.pluralize(&ru, 0.5, "долька"), "дольки");
        assert_eq!(table.pluralize(&ru, 5.0, "долька"), "долек");
        assert_eq!(table.pluralize(&ru, 5.0, "щепотка"), "щепотка");
    }
}
