//! HTTP assembly: error mapping, health check and the combined router.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::{Catalog, StaticCatalog};
use crate::config::AppConfig;
use crate::error::{CatalogError, Error, GroceryError, OrderError, Result};
use crate::grocery::{
    Checklist, GroceryRouteState, OrderPlacer, OrderTracker, RandomPriceEstimator,
    SelectionManager, SimulatedDelivery, grocery_routes,
};
use crate::onboarding::{OnboardingManager, OnboardingRouteState, onboarding_routes};
use crate::store::Database;

/// Error wrapper that renders as `{"error": "..."}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Catalog(CatalogError::RecipeNotFound { .. })
            | Error::Catalog(CatalogError::StoreNotFound { .. })
            | Error::Grocery(GroceryError::ItemNotFound { .. }) => StatusCode::NOT_FOUND,
            Error::Order(OrderError::NoStoreSelected | OrderError::EmptyGroceryList) => {
                StatusCode::BAD_REQUEST
            }
            Error::Order(OrderError::AlreadyInProgress) => StatusCode::CONFLICT,
            Error::Order(OrderError::DeliveryFailed { .. }) => StatusCode::BAD_GATEWAY,
            Error::Catalog(CatalogError::Unavailable(_))
            | Error::Database(_)
            | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "Request rejected");
        }
        (status, Json(serde_json::json!({"error": self.0.to_string()}))).into_response()
    }
}

/// JSON body extractor whose rejections use the same `{"error": ...}`
/// shape as `ApiError`, keeping axum's status (400, 415 or 422).
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                let status = rejection.status();
                let message = rejection.body_text();
                tracing::debug!(%status, error = %message, "Request body rejected");
                Err((status, Json(serde_json::json!({"error": message}))).into_response())
            }
        }
    }
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Merge the feature routers under one CORS-enabled router.
pub fn api_router(onboarding: Router, grocery: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(onboarding)
        .merge(grocery)
        .layer(cors)
}

/// Wire the managers over `db` and build the full router.
///
/// Restores any saved profile and recipe selection before returning.
pub async fn build_app(db: Arc<dyn Database>, config: &AppConfig) -> Result<Router> {
    let onboarding = Arc::new(OnboardingManager::resume(Arc::clone(&db)).await?);

    let selection = Arc::new(SelectionManager::new(Arc::clone(&db)));
    selection.load().await?;

    let catalog: Arc<dyn Catalog> = Arc::new(StaticCatalog::builtin());
    let estimator = Arc::new(RandomPriceEstimator::new(config.price_min, config.price_max));
    let placer = Arc::new(OrderPlacer::new(
        Arc::new(SimulatedDelivery::new(config.order_delay)),
        estimator.clone(),
    ));

    let grocery = GroceryRouteState {
        catalog,
        selection,
        checklist: Arc::new(RwLock::new(Checklist::new())),
        estimator,
        placer,
        orders: Arc::new(OrderTracker::new()),
    };

    Ok(api_router(
        onboarding_routes(OnboardingRouteState {
            manager: onboarding,
        }),
        grocery_routes(grocery),
    ))
}
