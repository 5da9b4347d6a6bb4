//! Order API Handlers
//!
//! Order placement is all-or-nothing: stock for every line is reserved
//! inside one database transaction, so a failing line leaves every
//! product's stock untouched.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::db::repository::order::OrderLine;
use crate::db::repository::{OrderRepository, parse_record_id};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrdersRequest {
    pub order_ids: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOrdersResponse {
    pub deleted_count: usize,
}

/// GET /api/orders - list the caller's orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.db().clone());
    let orders = repo.find_all(&user.id).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id - fetch one order
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db().clone());
    let order = repo
        .find_by_id(&user.id, &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    Ok(Json(order))
}

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(data): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    validate_required_text(&data.name_order, "nameOrder", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_DESCRIPTION_LEN)?;
    if data.items.is_empty() {
        return Err(AppError::validation("items must not be empty"));
    }

    let mut lines = Vec::with_capacity(data.items.len());
    for item in &data.items {
        if item.quantity < 1 {
            return Err(AppError::validation("quantity must be at least 1"));
        }
        let product = parse_record_id(&item.product_id, "product").map_err(AppError::from)?;
        lines.push(OrderLine {
            product,
            quantity: item.quantity,
        });
    }

    let repo = OrderRepository::new(state.db().clone());
    let order = repo
        .create(&user.id, data.name_order, data.description, lines)
        .await?;

    tracing::info!(
        user_id = %user.id,
        order_id = ?order.id,
        total = order.total_amount,
        "Order placed"
    );
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/:id/status - update order status
///
/// Cancelling an order does not restock its items.
pub async fn set_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<Order>> {
    let status = OrderStatus::parse(&req.status)
        .ok_or_else(|| AppError::validation(format!("Unknown status '{}'", req.status)))?;

    let repo = OrderRepository::new(state.db().clone());
    let order = repo.set_status(&user.id, &id, status).await?;
    Ok(Json(order))
}

/// DELETE /api/orders - bulk delete by id
///
/// Only the caller's own orders are removed; the response reports how
/// many actually went away.
pub async fn delete_many(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(req): Json<DeleteOrdersRequest>,
) -> AppResult<Json<DeleteOrdersResponse>> {
    if req.order_ids.is_empty() {
        return Err(AppError::validation("orderIds must not be empty"));
    }

    let repo = OrderRepository::new(state.db().clone());
    let deleted_count = repo.delete_many(&user.id, &req.order_ids).await?;

    tracing::info!(user_id = %user.id, deleted_count, "Orders deleted");
    Ok(Json(DeleteOrdersResponse { deleted_count }))
}
