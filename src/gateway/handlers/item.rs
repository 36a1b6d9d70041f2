//! Order item handlers (`/orders/{order_id}/items`)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};

use crate::orders::OrderItem;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiPath, ApiResult, CreatedResult, ItemRequest, JsonBody, created, no_content, ok,
};

/// Add item endpoint
///
/// POST /orders/{order_id}/items
#[utoipa::path(
    post,
    path = "/orders/{order_id}/items",
    params(("order_id" = i64, Path, description = "Order id")),
    request_body(content = ItemRequest, content_type = "application/json"),
    responses(
        (status = 201, description = "Item created", body = OrderItem, content_type = "application/json"),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Order not found"),
        (status = 415, description = "Body is not JSON")
    ),
    security(("api_key" = [])),
    tag = "Order Items"
)]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
    JsonBody(req): JsonBody<ItemRequest>,
) -> CreatedResult<OrderItem> {
    tracing::info!("Request to add item to Order {}: {:?}", order_id, req);
    let item = state.orders.add_item(order_id, req.into_new_item()?).await?;
    created(format!("/orders/{}/items/{}", order_id, item.id), item)
}

/// List items endpoint
///
/// GET /orders/{order_id}/items
#[utoipa::path(
    get,
    path = "/orders/{order_id}/items",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Items of the order", body = Vec<OrderItem>, content_type = "application/json"),
        (status = 404, description = "Order not found")
    ),
    security(("api_key" = [])),
    tag = "Order Items"
)]
pub async fn list_items(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
) -> ApiResult<Vec<OrderItem>> {
    ok(state.orders.list_items(order_id).await?)
}

/// Get item endpoint
///
/// GET /orders/{order_id}/items/{item_id}
#[utoipa::path(
    get,
    path = "/orders/{order_id}/items/{item_id}",
    params(
        ("order_id" = i64, Path, description = "Order id"),
        ("item_id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 200, description = "Item found", body = OrderItem, content_type = "application/json"),
        (status = 404, description = "Order or item not found")
    ),
    security(("api_key" = [])),
    tag = "Order Items"
)]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    ApiPath((order_id, item_id)): ApiPath<(i64, i64)>,
) -> ApiResult<OrderItem> {
    ok(state.orders.get_item(order_id, item_id).await?)
}

/// Update item endpoint
///
/// PUT /orders/{order_id}/items/{item_id}. Absent fields are kept.
#[utoipa::path(
    put,
    path = "/orders/{order_id}/items/{item_id}",
    params(
        ("order_id" = i64, Path, description = "Order id"),
        ("item_id" = i64, Path, description = "Item id")
    ),
    request_body(content = ItemRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Item updated", body = OrderItem, content_type = "application/json"),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Order or item not found"),
        (status = 415, description = "Body is not JSON")
    ),
    security(("api_key" = [])),
    tag = "Order Items"
)]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    ApiPath((order_id, item_id)): ApiPath<(i64, i64)>,
    JsonBody(req): JsonBody<ItemRequest>,
) -> ApiResult<OrderItem> {
    let item = state
        .orders
        .update_item(order_id, item_id, req.into_patch())
        .await?;
    ok(item)
}

/// Delete item endpoint
///
/// DELETE /orders/{order_id}/items/{item_id}
#[utoipa::path(
    delete,
    path = "/orders/{order_id}/items/{item_id}",
    params(
        ("order_id" = i64, Path, description = "Order id"),
        ("item_id" = i64, Path, description = "Item id")
    ),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Order not found, or item belongs to another order")
    ),
    security(("api_key" = [])),
    tag = "Order Items"
)]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    ApiPath((order_id, item_id)): ApiPath<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete_item(order_id, item_id).await?;
    no_content()
}
