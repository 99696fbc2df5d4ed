//! REST endpoints for the onboarding wizard.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::catalog::DietaryRestriction;
use crate::server::{ApiError, ApiJson};

use super::manager::{OnboardingManager, WizardTransition};
use super::update::{NumericField, ProfileUpdate};

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub manager: Arc<OnboardingManager>,
}

/// Body of `POST /api/onboarding/profile`.
///
/// Either a typed update or raw text for a numeric field, which is parsed
/// and validated server-side.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfileInput {
    Typed(ProfileUpdate),
    Text { field: NumericField, raw: String },
}

#[derive(Debug, Deserialize)]
struct AllergenBody {
    name: String,
}

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.manager.status().await)
}

/// GET /api/onboarding/profile
///
/// Returns the finished profile, or 404 until onboarding has completed.
async fn get_profile(State(state): State<OnboardingRouteState>) -> Result<Response, ApiError> {
    match state.manager.finalized_profile().await? {
        Some(profile) => Ok(Json(profile).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No profile exists yet"})),
        )
            .into_response()),
    }
}

/// POST /api/onboarding/next
async fn post_next(State(state): State<OnboardingRouteState>) -> Result<Response, ApiError> {
    let body = match state.manager.next().await? {
        WizardTransition::Moved(step) => serde_json::json!({
            "step": step,
            "finished": false,
        }),
        WizardTransition::Finished(profile) => serde_json::json!({
            "step": state.manager.current_step().await,
            "finished": true,
            "profile": profile,
        }),
    };
    Ok(Json(body).into_response())
}

/// POST /api/onboarding/back
async fn post_back(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    state.manager.back().await;
    Json(state.manager.status().await)
}

/// POST /api/onboarding/profile
async fn post_profile(
    State(state): State<OnboardingRouteState>,
    ApiJson(input): ApiJson<ProfileInput>,
) -> Result<Response, ApiError> {
    let update = match input {
        ProfileInput::Typed(update) => update,
        ProfileInput::Text { field, raw } => field.parse(&raw)?,
    };
    state.manager.apply(update).await?;
    Ok(Json(state.manager.status().await).into_response())
}

/// POST /api/onboarding/dietary/{tag}
async fn toggle_dietary(
    State(state): State<OnboardingRouteState>,
    Path(tag): Path<String>,
) -> Result<Response, ApiError> {
    let tag: DietaryRestriction = match tag.parse() {
        Ok(tag) => tag,
        Err(e) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": e})),
            )
                .into_response());
        }
    };
    let selected = state.manager.toggle_dietary_restriction(tag).await?;
    Ok(Json(serde_json::json!({"tag": tag, "selected": selected})).into_response())
}

/// POST /api/onboarding/allergens
async fn add_allergen(
    State(state): State<OnboardingRouteState>,
    ApiJson(body): ApiJson<AllergenBody>,
) -> Result<Response, ApiError> {
    let added = state.manager.add_allergen(&body.name).await?;
    let allergens = state.manager.profile().await.allergens;
    Ok(Json(serde_json::json!({"added": added, "allergens": allergens})).into_response())
}

/// DELETE /api/onboarding/allergens/{name}
async fn remove_allergen(
    State(state): State<OnboardingRouteState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let removed = state.manager.remove_allergen(&name).await?;
    let allergens = state.manager.profile().await.allergens;
    Ok(Json(serde_json::json!({"removed": removed, "allergens": allergens})).into_response())
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/profile", get(get_profile).post(post_profile))
        .route("/api/onboarding/next", post(post_next))
        .route("/api/onboarding/back", post(post_back))
        .route("/api/onboarding/dietary/{tag}", post(toggle_dietary))
        .route("/api/onboarding/allergens", post(add_allergen))
        .route("/api/onboarding/allergens/{name}", delete(remove_allergen))
        .with_state(state)
}
