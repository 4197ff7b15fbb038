//! Cart route handlers: creation wizard, items table and item edits.

use super::app_state::AppState;
use super::error::ApiError;
use crate::models::{Cart, CartUpdateAction};
use crate::services::items_table::{ItemsTable, build_items_table};
use crate::services::{CurrencyStepOutcome, CurrencyStepValues, UpdateOutcome};
use crate::storage::MutationError;
use crate::storage::error::check_version;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ChangeCountryRequest {
    pub version: i64,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLineItemRequest {
    pub version: i64,
    #[serde(default)]
    pub sku: String,
    #[serde(default = "default_quantity")]
    pub quantity: u64,
}

fn default_quantity() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct ChangeQuantityRequest {
    pub version: i64,
    pub quantity: u64,
}

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    pub version: i64,
}

#[derive(Debug, Deserialize)]
pub struct ItemsTableQuery {
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CartUpdateResponse {
    pub status: &'static str,
    pub actions: Vec<CartUpdateAction>,
    pub cart: Cart,
}

impl CartUpdateResponse {
    fn from_outcome(original: Cart, outcome: UpdateOutcome<Cart, CartUpdateAction>) -> Self {
        match outcome {
            UpdateOutcome::Unchanged => Self {
                status: "unchanged",
                actions: Vec::new(),
                cart: original,
            },
            UpdateOutcome::Updated { entity, actions } => Self {
                status: "updated",
                actions,
                cart: entity,
            },
        }
    }
}

/// Create the carts router
pub fn carts_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart))
        .route("/{cart_id}", get(get_cart))
        .route("/{cart_id}/country", put(change_country))
        .route("/{cart_id}/items-table", get(get_items_table))
        .route("/{cart_id}/line-items", post(add_line_item))
        .route("/{cart_id}/items/{item_id}/quantity", put(change_quantity))
        .route("/{cart_id}/items/{item_id}", delete(remove_item))
}

/// Fetch a cart and make sure the client edited the current version.
async fn fetch_current(
    state: &AppState,
    cart_id: &str,
    version: i64,
) -> Result<Cart, MutationError> {
    let cart = state.carts.fetch(cart_id).await?;
    check_version("cart", cart_id, version, cart.version)?;
    Ok(cart)
}

/// POST /carts - first wizard step without a cart
async fn create_cart(
    State(state): State<AppState>,
    Json(values): Json<CurrencyStepValues>,
) -> Result<(StatusCode, Json<Cart>), ApiError> {
    match state.carts.submit_currency_step(None, &values).await? {
        CurrencyStepOutcome::Created(cart) => Ok((StatusCode::CREATED, Json(cart))),
        other => Ok((StatusCode::OK, Json(other.cart().clone()))),
    }
}

/// GET /carts/{cart_id}
async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
) -> Result<Json<Cart>, ApiError> {
    Ok(Json(state.carts.fetch(&cart_id).await?))
}

/// PUT /carts/{cart_id}/country - first wizard step on an existing cart
async fn change_country(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<ChangeCountryRequest>,
) -> Result<Json<CurrencyStepOutcome>, ApiError> {
    let cart = fetch_current(&state, &cart_id, request.version).await?;
    let values = CurrencyStepValues {
        currency: None,
        country: request.country,
    };
    Ok(Json(
        state
            .carts
            .submit_currency_step(Some(&cart), &values)
            .await?,
    ))
}

/// GET /carts/{cart_id}/items-table?editable=&locale=
async fn get_items_table(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Query(query): Query<ItemsTableQuery>,
) -> Result<Json<ItemsTable>, ApiError> {
    let cart = state.carts.fetch(&cart_id).await?;
    let locale = query
        .locale
        .as_deref()
        .unwrap_or(state.default_locale.as_str());
    Ok(Json(build_items_table(&cart, query.editable, locale)))
}

/// POST /carts/{cart_id}/line-items
async fn add_line_item(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Json(request): Json<AddLineItemRequest>,
) -> Result<Json<CartUpdateResponse>, ApiError> {
    let cart = fetch_current(&state, &cart_id, request.version).await?;
    let outcome = state
        .carts
        .add_line_item(&cart, &request.sku, request.quantity)
        .await?;
    Ok(Json(CartUpdateResponse::from_outcome(cart, outcome)))
}

/// PUT /carts/{cart_id}/items/{item_id}/quantity
async fn change_quantity(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, String)>,
    Json(request): Json<ChangeQuantityRequest>,
) -> Result<Json<CartUpdateResponse>, ApiError> {
    let cart = fetch_current(&state, &cart_id, request.version).await?;
    let outcome = state
        .carts
        .change_item_quantity(&cart, &item_id, request.quantity)
        .await?;
    Ok(Json(CartUpdateResponse::from_outcome(cart, outcome)))
}

/// DELETE /carts/{cart_id}/items/{item_id}?version=
async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, String)>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<CartUpdateResponse>, ApiError> {
    let cart = fetch_current(&state, &cart_id, query.version).await?;
    let outcome = state.carts.remove_item(&cart, &item_id).await?;
    Ok(Json(CartUpdateResponse::from_outcome(cart, outcome)))
}
