use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::api_connection::endpoints::{GenerateMode, Preferences, Profile, Recipe, Reminder, User, VitaminReply};
use crate::biomarkers::{BiomarkerDefinition, BiomarkerReadings, BiomarkerStatus, Catalog};
use crate::plan::{MealPlan, MealSlot, PlanItem, PlanMode};
use crate::shopping::{aggregate_with_locale, Locale, ShoppingListEntry};

pub const VITAMIN_ERROR_MESSAGE: &str = "Извините, произошла ошибка при получении рекомендаций.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorState {
    pub mode: Option<GenerateMode>,
    pub is_loading: bool,
    pub results: Vec<PlanItem>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VitaminChat {
    pub history: Vec<ChatMessage>,
    pub thread_id: Option<String>,
    pub is_loading: bool,
}

/// Loading flag and error for a list fetched from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for Remote<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

impl<T> Remote<T> {
    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self, items: Vec<T>) {
        self.is_loading = false;
        self.items = items;
    }

    pub fn fail(&mut self, error: String) {
        self.is_loading = false;
        self.error = Some(error);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub profile: Profile,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub current_user: Option<User>,
    pub status: AuthStatus,
    pub error: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// The part of a session that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default, deserialize_with = "lenient_field")]
    pub biomarkers: BiomarkerReadings,
    #[serde(default, deserialize_with = "lenient_field")]
    pub preferences: Preferences,
    #[serde(default, deserialize_with = "lenient_field")]
    pub plan: MealPlan,
    #[serde(default, deserialize_with = "lenient_field")]
    pub last_detected_products: Vec<String>,
}

// A field that no longer parses falls back to its default so the rest of the
// saved state still loads.
fn lenient_field<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Discarding unreadable saved field");
        T::default()
    }))
}

/// Everything the planner knows about the current user and their day.
#[derive(Debug, Clone, Default)]
pub struct PlannerSession {
    pub readings: BiomarkerReadings,
    pub preferences: Preferences,
    pub plan: MealPlan,
    pub current_meal: Option<MealSlot>,
    pub generator: GeneratorState,
    pub vitamin_chat: VitaminChat,
    pub reminders: Remote<Reminder>,
    pub recipes: Remote<Recipe>,
    pub profile: ProfileState,
    pub last_detected_products: Vec<String>,
    pub auth: AuthState,
    locale: Locale,
}

impl PlannerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            readings: snapshot.biomarkers,
            preferences: snapshot.preferences,
            plan: snapshot.plan,
            last_detected_products: snapshot.last_detected_products,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            biomarkers: self.readings.clone(),
            preferences: self.preferences.clone(),
            plan: self.plan.clone(),
            last_detected_products: self.last_detected_products.clone(),
        }
    }

    // --- Biomarkers ---

    /// Stores what the user typed for `key`, or drops the reading when it is
    /// not a number.
    pub fn set_reading_from_input(&mut self, key: &str, raw: &str) -> Option<f64> {
        self.readings.set_from_input(key, raw)
    }

    pub fn set_reading(&mut self, key: &str, value: f64) {
        self.readings.set(key, value);
    }

    pub fn remove_reading(&mut self, key: &str) -> Option<f64> {
        self.readings.remove(key)
    }

    pub fn set_readings(&mut self, readings: BiomarkerReadings) {
        self.readings = readings;
    }

    pub fn biomarker_statuses<'c>(&self, catalog: &'c Catalog) -> Vec<(&'c BiomarkerDefinition, BiomarkerStatus)> {
        catalog.statuses(&self.readings)
    }

    // --- Preferences ---

    pub fn set_diet(&mut self, diet: &str) {
        self.preferences.diet = Some(diet.to_string());
    }

    pub fn set_allergies(&mut self, allergies: Vec<String>) {
        self.preferences.allergies = Some(allergies);
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.preferences = preferences;
    }

    // --- Meal plan ---

    pub fn set_plan_item(&mut self, meal: MealSlot, item: PlanItem, mode: PlanMode) {
        tracing::debug!(%meal, name = %item.name, mode = mode.as_str(), "Plan item set");
        self.plan.assign(meal, item, mode);
    }

    pub fn clear_plan_item(&mut self, meal: MealSlot) {
        self.plan.clear(meal);
    }

    pub fn clear_plan(&mut self) {
        self.plan.clear_all();
    }

    pub fn shopping_list(&self) -> Vec<ShoppingListEntry> {
        aggregate_with_locale(&self.plan, &self.locale)
    }

    // --- Generator ---

    /// Opens the generator for `meal`, or closes it (resetting its state) on `None`.
    pub fn set_current_meal(&mut self, meal: Option<MealSlot>) {
        self.current_meal = meal;
        if meal.is_none() {
            self.generator = GeneratorState::default();
        }
    }

    pub fn set_generator_mode(&mut self, mode: Option<GenerateMode>) {
        self.generator.mode = mode;
    }

    pub fn begin_generation(&mut self) {
        self.generator.is_loading = true;
        self.generator.error = None;
        self.generator.results.clear();
    }

    pub fn generation_succeeded(&mut self, results: Vec<PlanItem>) {
        self.generator.is_loading = false;
        self.generator.results = results;
    }

    pub fn generation_failed(&mut self, error: String) {
        self.generator.is_loading = false;
        self.generator.error = Some(error);
    }

    /// Puts a generator result into the open meal slot and closes the generator.
    pub fn choose_result(&mut self, index: usize) -> Option<MealSlot> {
        let meal = self.current_meal?;
        let item = self.generator.results.get(index)?.clone();
        let mode = self.generator.mode.map(PlanMode::from).unwrap_or(PlanMode::Diy);
        self.set_plan_item(meal, item, mode);
        self.set_current_meal(None);
        Some(meal)
    }

    pub fn set_last_detected_products(&mut self, products: Vec<String>) {
        self.last_detected_products = products;
    }

    // --- Vitamin chat ---

    pub fn push_user_message(&mut self, message: &str) {
        self.vitamin_chat.history.push(ChatMessage {
            role: ChatRole::User,
            content: message.to_string(),
        });
        self.vitamin_chat.is_loading = true;
    }

    pub fn apply_vitamin_reply(&mut self, reply: VitaminReply) {
        self.vitamin_chat.is_loading = false;
        self.vitamin_chat.thread_id = reply.thread_id;
        self.vitamin_chat.history.push(ChatMessage {
            role: ChatRole::Assistant,
            content: reply.reply,
        });
    }

    pub fn apply_vitamin_failure(&mut self, error: Option<String>) {
        self.vitamin_chat.is_loading = false;
        let content = error
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| VITAMIN_ERROR_MESSAGE.to_string());
        self.vitamin_chat.history.push(ChatMessage {
            role: ChatRole::Assistant,
            content,
        });
    }

    // --- Profile ---

    pub fn apply_profile(&mut self, profile: Profile) {
        self.profile.is_loading = false;
        self.profile.profile = profile;
    }

    // --- Auth ---

    pub fn set_token(&mut self, token: &str) {
        self.auth.token = Some(token.to_string());
        self.auth.error = None;
        self.auth.status = AuthStatus::Succeeded;
    }

    pub fn apply_current_user(&mut self, user: User) {
        self.auth.status = AuthStatus::Succeeded;
        self.auth.current_user = Some(user);
    }

    /// A rejected token signs the user out.
    pub fn current_user_failed(&mut self, error: String) {
        self.auth.status = AuthStatus::Failed;
        self.auth.current_user = None;
        self.auth.token = None;
        self.auth.error = Some(error);
    }

    pub fn logout(&mut self) {
        self.auth.current_user = None;
        self.auth.token = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }
}
