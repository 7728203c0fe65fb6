//! Backend round-trips that read from and write back into a [`PlannerSession`].
//!
//! Each action marks the relevant part of the session as loading, performs the
//! request, and records either the result or the failure message. The error is
//! also returned so a caller can report it.

use std::path::Path;

use crate::api_connection::connection::{ApiClient, ApiConnectionError};
use crate::api_connection::endpoints::{Coordinates, GenerateMode, Preferences, RecipeDraft, VitaminContext, VitaminRequest};
use crate::session::{AuthStatus, PlannerSession};
use crate::storage::{remove_token, save_token, KeyValueStore};
use crate::wizard::RecipeWizard;

/// Text shown to the user for a failed request.
pub fn failure_message(err: &ApiConnectionError) -> String {
    match err {
        ApiConnectionError::ApiError { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

pub async fn fetch_recommendations(
    client: &ApiClient,
    session: &mut PlannerSession,
    mode: GenerateMode,
    coordinates: Option<Coordinates>,
) -> Result<(), ApiConnectionError> {
    session.set_generator_mode(Some(mode));
    session.begin_generation();
    match client
        .generate_plan(mode, &session.readings, &session.preferences, coordinates)
        .await
    {
        Ok(items) => {
            tracing::info!(mode = mode.as_str(), count = items.len(), "Recommendations received");
            session.generation_succeeded(items);
            Ok(())
        }
        Err(e) => {
            session.generation_failed(failure_message(&e));
            Err(e)
        }
    }
}

/// Sends the photo for recognition and moves the wizard to product selection.
pub async fn analyze_photo(
    client: &ApiClient,
    session: &PlannerSession,
    wizard: &mut RecipeWizard,
    photo: &Path,
) -> Result<(), ApiConnectionError> {
    let response = client.analyze_photo(photo, &session.readings, &session.preferences).await?;
    tracing::debug!(detected = response.detected.len(), "Photo analysed");
    if let Err(e) = wizard.apply_detection(response.detected) {
        tracing::warn!(error = %e, "Detection arrived outside the preview step");
    }
    Ok(())
}

/// Generates recipes for the wizard's confirmed products and the open meal slot.
pub async fn generate_recipe(
    client: &ApiClient,
    session: &PlannerSession,
    wizard: &mut RecipeWizard,
) -> anyhow::Result<()> {
    let request = wizard.begin_generation(session.current_meal)?;
    match client
        .generate_recipe(&request, &session.readings, &session.preferences)
        .await
    {
        Ok(recipes) => {
            wizard.generation_succeeded(recipes)?;
            Ok(())
        }
        Err(e) => {
            wizard.generation_failed()?;
            Err(e.into())
        }
    }
}

pub async fn ask_vitamins(client: &ApiClient, session: &mut PlannerSession, message: &str) -> Result<(), ApiConnectionError> {
    session.push_user_message(message);
    let request = VitaminRequest {
        message: message.to_string(),
        context: VitaminContext {
            labs: session.readings.clone(),
            deficits: serde_json::Map::new(),
            preferences: Preferences {
                diet: session.preferences.diet.clone(),
                allergies: session.preferences.allergies.clone(),
            },
        },
        thread_id: session.vitamin_chat.thread_id.clone(),
    };
    match client.vitamin_recommendations(&request).await {
        Ok(reply) => {
            session.apply_vitamin_reply(reply);
            Ok(())
        }
        Err(e) => {
            session.apply_vitamin_failure(Some(failure_message(&e)));
            Err(e)
        }
    }
}

pub async fn fetch_reminders(client: &ApiClient, session: &mut PlannerSession) -> Result<(), ApiConnectionError> {
    session.reminders.begin();
    match client.upcoming_reminders().await {
        Ok(items) => {
            session.reminders.succeed(items);
            Ok(())
        }
        Err(e) => {
            session.reminders.fail(failure_message(&e));
            Err(e)
        }
    }
}

pub async fn save_labs(client: &ApiClient, session: &PlannerSession, weeks: u32) -> Result<(), ApiConnectionError> {
    client.save_labs(weeks, &session.readings).await?;
    tracing::info!(weeks, "Labs saved");
    Ok(())
}

pub async fn fetch_profile(client: &ApiClient, session: &mut PlannerSession) -> Result<(), ApiConnectionError> {
    session.profile.is_loading = true;
    session.profile.error = None;
    match client.fetch_profile().await {
        Ok(profile) => {
            session.apply_profile(profile);
            Ok(())
        }
        Err(e) => {
            session.profile.is_loading = false;
            session.profile.error = Some(failure_message(&e));
            Err(e)
        }
    }
}

pub async fn save_profile(
    client: &ApiClient,
    session: &mut PlannerSession,
    name: &str,
    email: &str,
    goals: &str,
) -> Result<(), ApiConnectionError> {
    session.profile.is_loading = true;
    match client.save_profile(name, email, goals).await {
        Ok(profile) => {
            session.apply_profile(profile);
            Ok(())
        }
        Err(e) => {
            session.profile.is_loading = false;
            session.profile.error = Some(failure_message(&e));
            Err(e)
        }
    }
}

/// Logs in, keeps the token in the session and the store, and attaches it to the client.
pub async fn login(
    client: &mut ApiClient,
    session: &mut PlannerSession,
    store: &mut impl KeyValueStore,
    username: &str,
    password: &str,
) -> anyhow::Result<()> {
    session.auth.status = AuthStatus::Loading;
    let token = match client.login(username, password).await {
        Ok(token) => token.access_token,
        Err(e) => {
            session.auth.status = AuthStatus::Failed;
            session.auth.error = Some(failure_message(&e));
            return Err(e.into());
        }
    };
    save_token(store, &token)?;
    session.set_token(&token);
    client.set_token(Some(token));
    fetch_current_user(client, session, store).await?;
    Ok(())
}

/// Loads the signed-in user. A rejected token is forgotten everywhere.
pub async fn fetch_current_user(
    client: &ApiClient,
    session: &mut PlannerSession,
    store: &mut impl KeyValueStore,
) -> Result<(), ApiConnectionError> {
    session.auth.status = AuthStatus::Loading;
    match client.fetch_current_user().await {
        Ok(user) => {
            session.apply_current_user(user);
            Ok(())
        }
        Err(e) => {
            session.current_user_failed(failure_message(&e));
            if let Err(store_err) = remove_token(store) {
                tracing::warn!(error = %store_err, "Could not remove auth token");
            }
            Err(e)
        }
    }
}

pub fn logout(client: &mut ApiClient, session: &mut PlannerSession, store: &mut impl KeyValueStore) {
    session.logout();
    client.set_token(None);
    if let Err(e) = remove_token(store) {
        tracing::warn!(error = %e, "Could not remove auth token");
    }
}

pub async fn fetch_recipes(client: &ApiClient, session: &mut PlannerSession) -> Result<(), ApiConnectionError> {
    session.recipes.begin();
    match client.list_recipes().await {
        Ok(items) => {
            session.recipes.succeed(items);
            Ok(())
        }
        Err(e) => {
            session.recipes.fail(failure_message(&e));
            Err(e)
        }
    }
}

// Mutations refresh the whole recipe book afterwards instead of patching it locally.

pub async fn create_recipe(client: &ApiClient, session: &mut PlannerSession, draft: &RecipeDraft) -> Result<(), ApiConnectionError> {
    session.recipes.is_loading = true;
    if let Err(e) = client.create_recipe(draft).await {
        session.recipes.fail(failure_message(&e));
        return Err(e);
    }
    fetch_recipes(client, session).await
}

pub async fn update_recipe(
    client: &ApiClient,
    session: &mut PlannerSession,
    recipe_id: &str,
    draft: &RecipeDraft,
) -> Result<(), ApiConnectionError> {
    if let Err(e) = client.update_recipe(recipe_id, draft).await {
        session.recipes.error = Some(failure_message(&e));
        return Err(e);
    }
    fetch_recipes(client, session).await
}

pub async fn delete_recipe(client: &ApiClient, session: &mut PlannerSession, recipe_id: &str) -> Result<(), ApiConnectionError> {
    if let Err(e) = client.delete_recipe(recipe_id).await {
        session.recipes.error = Some(failure_message(&e));
        return Err(e);
    }
    fetch_recipes(client, session).await
}
