//! REST endpoints for recipe selection, the grocery list and ordering.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::{Catalog, GroceryStore, RecipeFilter};
use crate::error::GroceryError;
use crate::server::{ApiError, ApiJson};

use super::aggregate::{GroceryListEntry, group_by_initial};
use super::checklist::Checklist;
use super::order::{OrderPlacer, OrderTracker};
use super::pricing::{PriceEstimator, estimate_total_cost, order_total};
use super::selection::SelectionManager;

/// Shared state for grocery routes.
#[derive(Clone)]
pub struct GroceryRouteState {
    pub catalog: Arc<dyn Catalog>,
    pub selection: Arc<SelectionManager>,
    pub checklist: Arc<RwLock<Checklist>>,
    pub estimator: Arc<dyn PriceEstimator>,
    pub placer: Arc<OrderPlacer>,
    pub orders: Arc<OrderTracker>,
}

#[derive(Debug, Deserialize)]
struct StoreQuery {
    store: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckAllBody {
    checked: bool,
}

#[derive(Debug, Deserialize)]
struct OrderBody {
    #[serde(default)]
    store: Option<String>,
}

#[derive(Serialize)]
struct GroceryItemView<'a> {
    #[serde(flatten)]
    entry: &'a GroceryListEntry,
    checked: bool,
}

#[derive(Serialize)]
struct GroceryListView<'a> {
    items: Vec<GroceryItemView<'a>>,
    groups: BTreeMap<String, Vec<Uuid>>,
    checked_count: usize,
    all_checked: bool,
    some_checked: bool,
}

#[derive(Serialize)]
struct CostView {
    subtotal: Decimal,
    delivery_fee: Decimal,
    total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    store: Option<GroceryStore>,
}

impl GroceryRouteState {
    async fn resolve_store(&self, id: Option<&str>) -> Result<Option<GroceryStore>, ApiError> {
        match id.filter(|s| !s.is_empty()) {
            Some(id) => Ok(Some(self.catalog.store(id).await?)),
            None => Ok(None),
        }
    }

    async fn prune_checklist(&self) {
        let entries = self.selection.grocery_list().await;
        self.checklist.write().await.retain(&entries);
    }
}

/// GET /api/recipes?search=&diet=
async fn list_recipes(
    State(state): State<GroceryRouteState>,
    Query(filter): Query<RecipeFilter>,
) -> Result<Response, ApiError> {
    let recipes = state.catalog.recipes().await?;
    let selected = state.selection.selected().await;
    let matching = filter.apply(&recipes);
    Ok(Json(serde_json::json!({
        "recipes": matching,
        "selected": selected.ids(),
        "can_continue": !selected.is_empty(),
    }))
    .into_response())
}

/// GET /api/stores
async fn list_stores(State(state): State<GroceryRouteState>) -> Result<Response, ApiError> {
    let stores = state.catalog.stores().await?;
    Ok(Json(stores).into_response())
}

/// POST /api/recipes/{id}/toggle
async fn toggle_recipe(
    State(state): State<GroceryRouteState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let recipe = state.catalog.recipe(&id).await?;
    let selected = state.selection.toggle_recipe(recipe).await?;
    state.prune_checklist().await;
    Ok(Json(serde_json::json!({
        "id": id,
        "selected": selected,
        "selected_ids": state.selection.selected().await.ids(),
        "grocery_list": state.selection.grocery_list().await,
    }))
    .into_response())
}

/// DELETE /api/selection/{id}
async fn remove_recipe(
    State(state): State<GroceryRouteState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let removed = state.selection.remove_recipe(&id).await?;
    state.prune_checklist().await;
    Ok(Json(serde_json::json!({"id": id, "removed": removed})).into_response())
}

/// GET /api/grocery-list
async fn get_grocery_list(State(state): State<GroceryRouteState>) -> impl IntoResponse {
    let entries = state.selection.grocery_list().await;
    let checklist = state.checklist.read().await;

    let groups = group_by_initial(&entries)
        .into_iter()
        .map(|(initial, group)| (initial, group.iter().map(|e| e.id).collect()))
        .collect();
    let view = GroceryListView {
        items: entries
            .iter()
            .map(|entry| GroceryItemView {
                entry,
                checked: checklist.is_checked(&entry.id),
            })
            .collect(),
        groups,
        checked_count: checklist.checked_count(&entries),
        all_checked: checklist.all_checked(&entries),
        some_checked: checklist.some_checked(&entries),
    };
    Json(serde_json::to_value(view).unwrap_or_default())
}

/// POST /api/grocery-list/items/{id}/toggle
async fn toggle_item(
    State(state): State<GroceryRouteState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let entries = state.selection.grocery_list().await;
    if !entries.iter().any(|e| e.id == id) {
        return Err(GroceryError::ItemNotFound { id: id.to_string() }.into());
    }
    let checked = state.checklist.write().await.toggle_item(id);
    Ok(Json(serde_json::json!({"id": id, "checked": checked})).into_response())
}

/// POST /api/grocery-list/check-all
async fn check_all(
    State(state): State<GroceryRouteState>,
    ApiJson(body): ApiJson<CheckAllBody>,
) -> impl IntoResponse {
    let entries = state.selection.grocery_list().await;
    let mut checklist = state.checklist.write().await;
    checklist.toggle_all(&entries, body.checked);
    Json(serde_json::json!({
        "checked": body.checked,
        "checked_count": checklist.checked_count(&entries),
    }))
}

/// GET /api/grocery-list/total?store=
async fn get_total(
    State(state): State<GroceryRouteState>,
    Query(query): Query<StoreQuery>,
) -> Result<Response, ApiError> {
    let store = state.resolve_store(query.store.as_deref()).await?;
    let entries = state.selection.grocery_list().await;
    let subtotal = estimate_total_cost(&entries, state.estimator.as_ref());
    let view = CostView {
        subtotal,
        delivery_fee: store.as_ref().map_or(Decimal::ZERO, |s| s.delivery_fee),
        total: order_total(subtotal, store.as_ref()),
        store,
    };
    Ok(Json(view).into_response())
}

/// POST /api/orders
async fn place_order(
    State(state): State<GroceryRouteState>,
    ApiJson(body): ApiJson<OrderBody>,
) -> Result<Response, ApiError> {
    let store = state.resolve_store(body.store.as_deref()).await?;
    let entries = state.selection.grocery_list().await;
    let status = state.orders.submit(&state.placer, store, entries).await?;
    Ok((StatusCode::ACCEPTED, Json(status)).into_response())
}

/// GET /api/orders/current
async fn current_order(State(state): State<GroceryRouteState>) -> impl IntoResponse {
    Json(state.orders.status().await)
}

/// POST /api/orders/cancel
async fn cancel_order(State(state): State<GroceryRouteState>) -> impl IntoResponse {
    let cancelled = state.orders.cancel().await;
    Json(serde_json::json!({
        "cancelled": cancelled,
        "status": state.orders.status().await,
    }))
}

/// Build the grocery REST routes.
pub fn grocery_routes(state: GroceryRouteState) -> Router {
    Router::new()
        .route("/api/recipes", get(list_recipes))
        .route("/api/recipes/{id}/toggle", post(toggle_recipe))
        .route("/api/selection/{id}", delete(remove_recipe))
        .route("/api/stores", get(list_stores))
        .route("/api/grocery-list", get(get_grocery_list))
        .route("/api/grocery-list/items/{id}/toggle", post(toggle_item))
        .route("/api/grocery-list/check-all", post(check_all))
        .route("/api/grocery-list/total", get(get_total))
        .route("/api/orders", post(place_order))
        .route("/api/orders/current", get(current_order))
        .route("/api/orders/cancel", post(cancel_order))
        .with_state(state)
}
