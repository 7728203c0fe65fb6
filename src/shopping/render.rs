use super::aggregator::ShoppingListEntry;
use super::locale::Locale;
use super::plural::PluralTable;

pub const EMPTY_LIST_MESSAGE: &str = "Добавьте рецепты в план, чтобы увидеть здесь список ингредиентов.";

/// Turns aggregated entries into display strings for one locale.
#[derive(Debug, Clone, Default)]
pub struct ShoppingListFormatter {
    locale: Locale,
    plurals: PluralTable,
}

impl ShoppingListFormatter {
    pub fn new(locale: Locale, plurals: PluralTable) -> Self {
        Self { locale, plurals }
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn format_unit(&self, value: f64, unit: &str) -> String {
        self.plurals.pluralize(&self.locale, value, unit).to_string()
    }

    /// `"1,5 кг, 2 щепотки"`: each unit total as number plus agreeing unit word.
    pub fn format_entry(&self, entry: &ShoppingListEntry) -> String {
        entry
            .totals
            .iter()
            .map(|(unit, value)| {
                let number = self.locale.format_number(*value);
                format!("{} {}", number, self.format_unit(*value, unit))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The whole list as text, one ingredient per line, or the empty-state message.
    pub fn render(&self, entries: &[ShoppingListEntry]) -> String {
        if entries.is_empty() {
            return EMPTY_LIST_MESSAGE.to_string();
        }
        entries
            .iter()
            .map(|entry| format!("{} — {}", entry.ingredient_name, self.format_entry(entry)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Pluralizes `unit` for `value` with Russian rules and the default unit table.
pub fn format_unit(value: f64, unit: &str) -> String {
    ShoppingListFormatter::default().format_unit(value, unit)
}

pub fn format_entry(entry: &ShoppingListEntry) -> String {
    ShoppingListFormatter::default().format_entry(entry)
}

pub fn render_shopping_list(entries: &[ShoppingListEntry]) -> String {
    ShoppingListFormatter::default().render(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, totals: &[(&str, f64)]) -> ShoppingListEntry {
        ShoppingListEntry {
            ingredient_name: name.to_string(),
            totals: totals.iter().map(|(u, v)| (u.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn test_format_unit() {
        assert_eq!(format_unit(1.0, "щепотка"), "щепотка");
        assert_eq!(format_unit(3.0, "щепотка"), "щепотки");
        assert_eq!(format_unit(10.0, "щепотка"), "щепоток");
        assert_eq!(format_unit(5.0, "г"), "г");
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(format_entry(&entry("мука", &[("г", 1500.5)])), "1\u{a0}500,5 г");
        assert_eq!(format_entry(&entry("мука", &[("г", 12000.0)])), "12\u{a0}000 г");
        assert_eq!(
            format_entry(&entry("соль", &[("щепотка", 2.0), ("г", 5.0)])),
            "2 щепотки, 5 г"
        );
    }

    #[test]
    fn test_unitless_total_keeps_trailing_space() {
        // The number and unit are always joined with a space, even for "".
        assert_eq!(format_entry(&entry("яйцо", &[("", 3.0)])), "3 ");
    }

    #[test]
    fn test_render() {
        assert_eq!(render_shopping_list(&[]), EMPTY_LIST_MESSAGE);
        let text = render_shopping_list(&[entry("лук", &[("шт", 2.0)]), entry("мука", &[("г", 0.5)])]);
        assert_eq!(text, "лук — 2 шт\nмука — 0,5 г");
    }

    #[test]
    fn test_fallback_locale() {
        let formatter = ShoppingListFormatter::new(Locale::new("xx"), PluralTable::default());
        assert_eq!(formatter.format_entry(&entry("соль", &[("щепотка", 2.5)])), "2.5 щепотка");
    }
}
