use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::biomarkers::BiomarkerReadings;
use crate::plan::{deserialize_plan_items, Ingredient, PlanItem, PlanMode};

pub const GENERATE_PATH: &str = "/api/generate";
pub const VITAMINS_PATH: &str = "/api/vitamins/recommendations";
pub const REMINDERS_PATH: &str = "/api/reminders/upcoming";
pub const SAVE_LABS_PATH: &str = "/api/labs/save";
pub const PROFILE_PATH: &str = "/api/profile";
pub const REGISTER_PATH: &str = "/auth/register";
pub const TOKEN_PATH: &str = "/auth/token";
pub const CURRENT_USER_PATH: &str = "/auth/users/me";
pub const RECIPES_PATH: &str = "/recipes/";

/// Used for restaurant search when the caller has no position to offer (Moscow centre).
pub const FALLBACK_COORDINATES: Coordinates = Coordinates {
    lat: 55.751244,
    lon: 37.618423,
};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerateMode {
    Diy,
    Restaurants,
}

impl GenerateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerateMode::Diy => "diy",
            GenerateMode::Restaurants => "restaurants",
        }
    }
}

impl From<GenerateMode> for PlanMode {
    fn from(mode: GenerateMode) -> Self {
        match mode {
            GenerateMode::Diy => PlanMode::Diy,
            GenerateMode::Restaurants => PlanMode::Restaurants,
        }
    }
}

/// `/api/generate` answers with either `plan` (diy) or `restaurants`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeneratePlanResponse {
    #[serde(default, deserialize_with = "deserialize_plan_items")]
    pub plan: Vec<PlanItem>,
    #[serde(default, deserialize_with = "deserialize_plan_items")]
    pub restaurants: Vec<PlanItem>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct GeneratedRecipesResponse {
    #[serde(default, deserialize_with = "deserialize_plan_items")]
    pub recipes: Vec<PlanItem>,
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct PhotoAnalysisResponse {
    #[serde(default)]
    pub detected: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct VitaminContext {
    pub labs: BiomarkerReadings,
    pub deficits: Map<String, Value>,
    pub preferences: Preferences,
}

#[derive(Debug, Serialize, Clone)]
pub struct VitaminRequest {
    pub message: String,
    pub context: VitaminContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VitaminReply {
    pub reply: String,
    #[serde(default)]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reminder {
    pub due_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RemindersResponse {
    #[serde(default)]
    pub items: Vec<Reminder>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub goals: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl Recipe {
    /// A plan item carrying this recipe's fields, ready to be put into a slot.
    pub fn to_plan_item(&self) -> PlanItem {
        let mut item = PlanItem::new(&self.name, self.ingredients.clone());
        item.extra.insert("id".to_string(), Value::String(self.id.clone()));
        if let Some(time_min) = self.time_min {
            item.extra.insert("time_min".to_string(), Value::from(time_min));
        }
        if let Some(description) = &self.description {
            item.extra.insert("description".to_string(), Value::String(description.clone()));
        }
        item.extra.insert(
            "instructions".to_string(),
            Value::Array(self.instructions.iter().cloned().map(Value::String).collect()),
        );
        item.extra.insert(
            "tags".to_string(),
            Value::Array(self.tags.iter().cloned().map(Value::String).collect()),
        );
        item
    }
}

/// Body for creating a recipe, or a partial update when fields are left `None`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RecipeDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}
