use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 3] = [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Завтрак",
            MealSlot::Lunch => "Обед",
            MealSlot::Dinner => "Ужин",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            other => Err(format!("unknown meal '{}', expected breakfast, lunch or dinner", other)),
        }
    }
}

/// How a plan item gets to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanMode {
    /// Cooked at home from the item's ingredient list.
    Diy,
    /// Ordered at a restaurant; carries no shopping.
    Restaurants,
    #[serde(other)]
    Other,
}

impl PlanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanMode::Diy => "diy",
            PlanMode::Restaurants => "restaurants",
            PlanMode::Other => "other",
        }
    }
}

impl FromStr for PlanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "diy" => Ok(PlanMode::Diy),
            "restaurants" | "restaurant" => Ok(PlanMode::Restaurants),
            other => Err(format!("unknown mode '{}', expected diy or restaurants", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
}

/// Borrowed view of one ingredient record inside a plan item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngredientLine<'a> {
    pub name: &'a str,
    pub amount: Option<&'a str>,
}

/// A recipe or restaurant dish placed into a meal slot.
///
/// Backend payloads are loosely shaped, so `ingredients` stays raw JSON and
/// every field this crate does not interpret is kept in `extra`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PlanItem {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_mode")]
    pub mode: Option<PlanMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PlanItem {
    pub fn new(name: &str, ingredients: Vec<Ingredient>) -> Self {
        let ingredients = ingredients
            .into_iter()
            .map(|ing| serde_json::json!({ "name": ing.name, "amount": ing.amount }))
            .collect();
        Self {
            name: name.to_string(),
            mode: None,
            ingredients: Some(Value::Array(ingredients)),
            extra: Map::new(),
        }
    }

    pub fn with_mode(mut self, mode: PlanMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn is_self_prepared(&self) -> bool {
        self.mode == Some(PlanMode::Diy)
    }

    /// Ingredient records, or `None` when `ingredients` is absent or not an
    /// array. Entries that are not objects with a string `name` are dropped;
    /// a non-string `amount` counts as missing.
    pub fn ingredient_lines(&self) -> Option<Vec<IngredientLine<'_>>> {
        let items = self.ingredients.as_ref()?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| {
                    let name = item.get("name")?.as_str()?;
                    let amount = item.get("amount").and_then(Value::as_str);
                    Some(IngredientLine { name, amount })
                })
                .collect(),
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct MealPlan {
    #[serde(default, deserialize_with = "lenient_slot")]
    pub breakfast: Option<PlanItem>,
    #[serde(default, deserialize_with = "lenient_slot")]
    pub lunch: Option<PlanItem>,
    #[serde(default, deserialize_with = "lenient_slot")]
    pub dinner: Option<PlanItem>,
}

impl MealPlan {
    pub fn get(&self, slot: MealSlot) -> Option<&PlanItem> {
        match slot {
            MealSlot::Breakfast => self.breakfast.as_ref(),
            MealSlot::Lunch => self.lunch.as_ref(),
            MealSlot::Dinner => self.dinner.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: MealSlot) -> &mut Option<PlanItem> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    /// Puts `item` into `slot`, stamping it with `mode`. Returns the replaced item.
    pub fn assign(&mut self, slot: MealSlot, item: PlanItem, mode: PlanMode) -> Option<PlanItem> {
        self.slot_mut(slot).replace(item.with_mode(mode))
    }

    pub fn clear(&mut self, slot: MealSlot) -> Option<PlanItem> {
        self.slot_mut(slot).take()
    }

    pub fn clear_all(&mut self) {
        *self = MealPlan::default();
    }

    /// Occupied slots in breakfast, lunch, dinner order.
    pub fn items(&self) -> impl Iterator<Item = (MealSlot, &PlanItem)> {
        MealSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.get(slot).map(|item| (slot, item)))
    }

    pub fn is_empty(&self) -> bool {
        self.items().next().is_none()
    }
}

// Plan data comes from the backend and from saved state; a bad field or slot
// must never reject the whole document.

fn lenient_name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(name) => name,
        _ => String::new(),
    })
}

fn lenient_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PlanMode>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        value @ Value::String(_) => Some(serde_json::from_value(value).unwrap_or(PlanMode::Other)),
        _ => Some(PlanMode::Other),
    })
}

fn lenient_slot<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<PlanItem>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(item) => Ok(Some(item)),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed plan slot");
            Ok(None)
        }
    }
}

/// Reads a list of plan items, skipping entries that are not items.
/// Anything other than an array yields an empty list.
pub fn deserialize_plan_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<PlanItem>, D::Error> {
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            tracing::warn!(kind = json_kind(&other), "Expected a list of plan items");
            return Ok(Vec::new());
        }
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<PlanItem>(item) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "Skipping malformed plan item");
                None
            }
        })
        .collect())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
