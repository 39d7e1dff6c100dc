//! Order Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};

use shared::client::{OrderDetail, PlaceOrderRequest, StatusUpdateRequest};
use shared::models::{Order, OrderStatus};

use crate::auth::{CurrentCustomer, CurrentMerchant, CurrentPrincipal};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Optional client-supplied placement idempotency token
const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// GET /api/orders - the caller's side of the order book
pub async fn list(
    State(state): State<ServerState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list_orders(&principal).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - one order with items, owners only
pub async fn get_by_id(
    State(state): State<ServerState>,
    CurrentPrincipal(principal): CurrentPrincipal,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.orders.get_order(id, &principal).await?;
    Ok(Json(detail))
}

/// POST /api/orders - place an order as the session customer
pub async fn create(
    State(state): State<ServerState>,
    CurrentCustomer(customer): CurrentCustomer,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let idempotency_key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let order = state
        .orders
        .place_order(customer.id, req, idempotency_key)
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /api/orders/:id/status - transition an order, owning merchant only
pub async fn update_status(
    State(state): State<ServerState>,
    CurrentMerchant(merchant): CurrentMerchant,
    Path(id): Path<i64>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    let next = OrderStatus::parse(&req.status)
        .ok_or_else(|| AppError::Validation(format!("Unknown status: {}", req.status)))?;

    let order = state.orders.update_status(id, next, merchant.id).await?;
    Ok(Json(order))
}
