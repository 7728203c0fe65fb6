pub mod aggregator;
pub mod amount;
pub mod locale;
pub mod plural;
pub mod render;

pub use aggregator::{aggregate, aggregate_with_locale, ShoppingListEntry};
pub use amount::{parse_amount, ParsedAmount};
pub use locale::{Locale, PluralCategory};
pub use plural::{PluralTable, UnitForms};
pub use render::{format_entry, format_unit, render_shopping_list, ShoppingListFormatter, EMPTY_LIST_MESSAGE};
