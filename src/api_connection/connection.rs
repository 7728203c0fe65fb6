use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use super::endpoints::{
    Coordinates, GenerateMode, GeneratePlanResponse, GeneratedRecipesResponse, PhotoAnalysisResponse, Preferences,
    Profile, Recipe, RecipeDraft, RegisterRequest, Reminder, RemindersResponse, TokenResponse, User, VitaminReply,
    VitaminRequest, CURRENT_USER_PATH, FALLBACK_COORDINATES, GENERATE_PATH, PROFILE_PATH, RECIPES_PATH,
    REGISTER_PATH, REMINDERS_PATH, SAVE_LABS_PATH, TOKEN_PATH, VITAMINS_PATH,
};
use crate::biomarkers::BiomarkerReadings;
use crate::plan::PlanItem;
use crate::wizard::RecipeGenerationRequest;

#[derive(Debug, thiserror::Error)]
pub enum ApiConnectionError {
    #[error("Backend URL not configured: {0}")]
    MissingBaseUrl(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("API error {status}: {message}")]
    ApiError { status: StatusCode, message: String },
    #[error("Failed to read upload: {0}")]
    UploadError(#[from] std::io::Error),
}

/// Client for the diet-planner backend. Every request carries the bearer
/// token when one is set.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiConnectionError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(ApiConnectionError::MissingBaseUrl("empty base URL".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            token: None,
        })
    }

    /// Builds a client from the base URL stored in `env_var_name` (`.env` is honoured).
    pub fn from_env(env_var_name: &str) -> Result<Self, ApiConnectionError> {
        dotenv::dotenv().ok();
        let base_url = std::env::var(env_var_name)
            .map_err(|_| ApiConnectionError::MissingBaseUrl(env_var_name.to_string()))?;
        Self::new(&base_url)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiConnectionError> {
        let response = self.authorize(builder).send().await?;
        let response = check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiConnectionError> {
        tracing::debug!(endpoint, "GET");
        self.send(self.client.get(self.url(endpoint))).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ApiConnectionError> {
        tracing::debug!(endpoint, "POST json");
        self.send(self.client.post(self.url(endpoint)).json(body)).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<T, ApiConnectionError> {
        tracing::debug!(endpoint, "PUT json");
        self.send(self.client.put(self.url(endpoint)).json(body)).await
    }

    async fn post_form<T: DeserializeOwned>(&self, endpoint: &str, form: Form) -> Result<T, ApiConnectionError> {
        tracing::debug!(endpoint, "POST multipart");
        self.send(self.client.post(self.url(endpoint)).multipart(form)).await
    }

    // --- Generation ---

    /// Asks for dish (`diy`) or restaurant recommendations. Restaurant search
    /// uses `coordinates`, or the fallback position when none are given.
    pub async fn generate_plan(
        &self,
        mode: GenerateMode,
        labs: &BiomarkerReadings,
        preferences: &Preferences,
        coordinates: Option<Coordinates>,
    ) -> Result<Vec<PlanItem>, ApiConnectionError> {
        let mut form = Form::new().text("mode", mode.as_str());
        if mode == GenerateMode::Restaurants {
            let coords = coordinates.unwrap_or(FALLBACK_COORDINATES);
            form = form.text("lat", coords.lat.to_string()).text("lon", coords.lon.to_string());
        }
        let form = form
            .text("labs_json", serde_json::to_string(labs)?)
            .text("preferences_json", serde_json::to_string(preferences)?);

        let response: GeneratePlanResponse = self.post_form(GENERATE_PATH, form).await?;
        Ok(match mode {
            GenerateMode::Diy => response.plan,
            GenerateMode::Restaurants => response.restaurants,
        })
    }

    pub async fn generate_recipe(
        &self,
        request: &RecipeGenerationRequest,
        labs: &BiomarkerReadings,
        preferences: &Preferences,
    ) -> Result<Vec<PlanItem>, ApiConnectionError> {
        let mut preferences_json = serde_json::to_value(preferences)?;
        if let Some(obj) = preferences_json.as_object_mut() {
            obj.insert("available".to_string(), serde_json::to_value(&request.products)?);
        }
        let form = Form::new()
            .text("mode", "ai_recipe")
            .text("difficulty", request.difficulty.as_str())
            .text("labs_json", serde_json::to_string(labs)?)
            .text("preferences_json", preferences_json.to_string());

        let response: GeneratedRecipesResponse = self.post_form(GENERATE_PATH, form).await?;
        Ok(response.recipes)
    }

    /// Uploads a product photo for recognition.
    pub async fn analyze_photo(
        &self,
        photo: &Path,
        labs: &BiomarkerReadings,
        preferences: &Preferences,
    ) -> Result<PhotoAnalysisResponse, ApiConnectionError> {
        let bytes = tokio::fs::read(photo).await?;
        let file_name = photo
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let mime = match photo.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("png") => "image/png",
            _ => "image/jpeg",
        };
        let part = Part::bytes(bytes).file_name(file_name).mime_str(mime)?;

        let form = Form::new()
            .text("mode", "photo")
            .part("photo", part)
            .text("labs_json", serde_json::to_string(labs)?)
            .text("preferences_json", serde_json::to_string(preferences)?);
        self.post_form(GENERATE_PATH, form).await
    }

    pub async fn vitamin_recommendations(&self, request: &VitaminRequest) -> Result<VitaminReply, ApiConnectionError> {
        self.post_json(VITAMINS_PATH, request).await
    }

    // --- Labs, reminders, profile ---

    pub async fn upcoming_reminders(&self) -> Result<Vec<Reminder>, ApiConnectionError> {
        let response: RemindersResponse = self.get_json(REMINDERS_PATH).await?;
        Ok(response.items)
    }

    pub async fn save_labs(&self, weeks: u32, labs: &BiomarkerReadings) -> Result<serde_json::Value, ApiConnectionError> {
        let form = Form::new()
            .text("weeks", weeks.to_string())
            .text("labs_json", serde_json::to_string(labs)?);
        self.post_form(SAVE_LABS_PATH, form).await
    }

    pub async fn fetch_profile(&self) -> Result<Profile, ApiConnectionError> {
        self.get_json(CURRENT_USER_PATH).await
    }

    pub async fn save_profile(&self, name: &str, email: &str, goals: &str) -> Result<Profile, ApiConnectionError> {
        let form = Form::new()
            .text("name", name.to_string())
            .text("email", email.to_string())
            .text("goals", goals.to_string());
        self.post_form(PROFILE_PATH, form).await
    }

    // --- Auth ---

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, ApiConnectionError> {
        self.post_json(REGISTER_PATH, request).await
    }

    /// Exchanges credentials for an access token. The token is returned, not stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiConnectionError> {
        tracing::debug!(endpoint = TOKEN_PATH, "POST form");
        let builder = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&[("username", username), ("password", password)]);
        // No bearer token on the login request itself.
        let response = check_status(builder.send().await?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn fetch_current_user(&self) -> Result<User, ApiConnectionError> {
        self.get_json(CURRENT_USER_PATH).await
    }

    // --- Recipe book ---

    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiConnectionError> {
        self.get_json(RECIPES_PATH).await
    }

    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Recipe, ApiConnectionError> {
        self.get_json(&format!("{}{}", RECIPES_PATH, recipe_id)).await
    }

    pub async fn create_recipe(&self, draft: &RecipeDraft) -> Result<Recipe, ApiConnectionError> {
        self.post_json(RECIPES_PATH, draft).await
    }

    pub async fn update_recipe(&self, recipe_id: &str, draft: &RecipeDraft) -> Result<Recipe, ApiConnectionError> {
        self.put_json(&format!("{}{}", RECIPES_PATH, recipe_id), draft).await
    }

    /// Deletes a recipe. The backend may answer with an empty body.
    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<(), ApiConnectionError> {
        let endpoint = format!("{}{}", RECIPES_PATH, recipe_id);
        tracing::debug!(endpoint = %endpoint, "DELETE");
        let builder = self.authorize(self.client.delete(self.url(&endpoint)));
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, ApiConnectionError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    tracing::warn!(%status, %message, "Backend request failed");
    Err(ApiConnectionError::ApiError { status, message })
}

/// Human-readable failure text: the body's `detail` when the backend sent one.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |name: &str| parsed.as_ref().and_then(|value| value.get(name)).cloned();
    match field("detail") {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        Some(serde_json::Value::Array(items)) if !items.is_empty() => serde_json::Value::Array(items).to_string(),
        Some(serde_json::Value::Object(map)) => serde_json::Value::Object(map).to_string(),
        // Some endpoints answer with `{"error": "..."}` instead of `detail`.
        _ => match field("error") {
            Some(serde_json::Value::String(text)) if !text.is_empty() => text,
            _ => format!("Request failed with status {}", status.as_u16()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Username already registered"}"#),
            "Username already registered"
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"), "Request failed with status 502");
        assert_eq!(error_message(StatusCode::NOT_FOUND, r#"{"error": ""}"#), "Request failed with status 404");
        assert_eq!(error_message(StatusCode::NOT_FOUND, r#"{"error": 3}"#), "Request failed with status 404");
        assert_eq!(error_message(StatusCode::NOT_FOUND, r#"{"detail": ""}"#), "Request failed with status 404");
    }

    #[test]
    fn test_error_message_uses_error_field() {
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error": "invalid labs_json"}"#),
            "invalid labs_json"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail": "Bad mode", "error": "ignored"}"#),
            "Bad mode"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"detail": "", "error": "invalid labs_json"}"#),
            "invalid labs_json"
        );
    }

    #[test]
    fn test_error_message_structured_detail() {
        let body = r#"{"detail": [{"loc": ["body", "mode"], "msg": "field required"}]}"#;
        let message = error_message(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert!(message.contains("field required"));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.url(RECIPES_PATH), "http://localhost:8000/recipes/");
    }

    #[test]
    fn test_new_rejects_empty_url() {
        assert!(matches!(ApiClient::new("  "), Err(ApiConnectionError::MissingBaseUrl(_))));
    }
}
