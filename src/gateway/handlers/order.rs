//! Order handlers (create, read, update, delete, list, cancel, return)

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use futures::TryStreamExt;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiPath, ApiQuery, ApiResult, CreateOrderRequest, CreatedResult, GetOrderQuery,
    JsonBody, ListOrdersQuery, OrderView, ReturnResponseData, UpdateOrderRequest, accepted,
    created, no_content, ok, ok_with_msg,
};

/// Create order endpoint
///
/// POST /orders
#[utoipa::path(
    post,
    path = "/orders",
    request_body(content = CreateOrderRequest, content_type = "application/json"),
    responses(
        (status = 201, description = "Order created", body = OrderView, content_type = "application/json"),
        (status = 400, description = "Invalid parameters"),
        (status = 401, description = "API key missing"),
        (status = 403, description = "API key rejected"),
        (status = 415, description = "Body is not JSON")
    ),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateOrderRequest>,
) -> CreatedResult<OrderView> {
    tracing::info!("Request to create an Order: {:?}", req);
    let new_order = req.into_new_order()?;
    let order = state.orders.create(new_order).await?;
    created(format!("/orders/{}", order.id), OrderView::from(order))
}

/// Get order endpoint
///
/// GET /orders/{order_id}
#[utoipa::path(
    get,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Order id"), GetOrderQuery),
    responses(
        (status = 200, description = "Order found", body = OrderView, content_type = "application/json"),
        (status = 404, description = "Order not found")
    ),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
    ApiQuery(query): ApiQuery<GetOrderQuery>,
) -> ApiResult<OrderView> {
    let order = state.orders.retrieve(order_id).await?;
    ok(OrderView::new(order, !query.orders_only()))
}

/// Update order endpoint
///
/// PUT /orders/{order_id}. Absent fields are kept.
#[utoipa::path(
    put,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Order id")),
    request_body(content = UpdateOrderRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Order updated", body = OrderView, content_type = "application/json"),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Order not found"),
        (status = 415, description = "Body is not JSON")
    ),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
    JsonBody(req): JsonBody<UpdateOrderRequest>,
) -> ApiResult<OrderView> {
    tracing::info!("Request to update Order {}: {:?}", order_id, req);
    let patch = req.into_patch()?;
    let order = state.orders.update(order_id, patch).await?;
    ok(order.into())
}

/// Delete order endpoint
///
/// DELETE /orders/{order_id}. Deleting an absent order still returns 204.
#[utoipa::path(
    delete,
    path = "/orders/{order_id}",
    params(("order_id" = i64, Path, description = "Order id")),
    responses((status = 204, description = "Order deleted")),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete(order_id).await?;
    no_content()
}

/// Delete all orders endpoint
///
/// DELETE /orders
#[utoipa::path(
    delete,
    path = "/orders",
    responses((status = 204, description = "All orders deleted")),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn delete_all_orders(
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    state.orders.delete_all().await?;
    no_content()
}

/// List orders endpoint
///
/// GET /orders?customer_id=&status=&o=
///
/// Filters combine with AND. `msg` describes the filters applied.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Matching orders", body = Vec<OrderView>, content_type = "application/json"),
        (status = 400, description = "Invalid filter value")
    ),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ListOrdersQuery>,
) -> ApiResult<Vec<OrderView>> {
    let filter = query.filter()?;
    let with_items = !query.orders_only();

    let orders: Vec<OrderView> = state
        .orders
        .list(filter)
        .map_ok(|order| OrderView::new(order, with_items))
        .try_collect()
        .await?;

    let msg = filter.describe(orders.len());
    tracing::info!("{}", msg);
    ok_with_msg(orders, msg)
}

/// Cancel order endpoint
///
/// PUT /orders/{order_id}/cancel. Only placed orders can be canceled.
#[utoipa::path(
    put,
    path = "/orders/{order_id}/cancel",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order canceled", body = OrderView, content_type = "application/json"),
        (status = 400, description = "Order is not placed"),
        (status = 404, description = "Order not found")
    ),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
) -> ApiResult<OrderView> {
    let order = state.orders.cancel(order_id).await?;
    ok(order.into())
}

/// Return order endpoint
///
/// PUT /orders/{order_id}/return. Only shipped orders can be returned.
#[utoipa::path(
    put,
    path = "/orders/{order_id}/return",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status = 202, description = "Return accepted", body = ReturnResponseData, content_type = "application/json"),
        (status = 400, description = "Order is not shipped"),
        (status = 404, description = "Order not found")
    ),
    security(("api_key" = [])),
    tag = "Orders"
)]
pub async fn return_order(
    State(state): State<Arc<AppState>>,
    ApiPath(order_id): ApiPath<i64>,
) -> ApiResult<ReturnResponseData> {
    let order = state.orders.return_order(order_id).await?;
    accepted(ReturnResponseData {
        order_id: order.id,
        status: order.status,
    })
}
