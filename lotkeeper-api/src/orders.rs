use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use lotkeeper_order::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::OrderState;

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub product_code: String,
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderPlacement {
    pub order_id: String,
    pub product_code: String,
    pub quantity: i32,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub message: Option<String>,
    pub success: bool,
    pub remaining_stock: Option<i32>,
}

impl OrderPlacement {
    fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.order_id.clone(),
            product_code: order.product_code.clone(),
            quantity: order.quantity,
            status: order.status,
            order_date: order.order_date,
            message: order.message.clone(),
            success: order.status == OrderStatus::Confirmed,
            remaining_stock: order.remaining_stock,
        }
    }
}

/// POST /order
/// Places an order and updates inventory accordingly
pub async fn place_order(
    State(state): State<OrderState>,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderPlacement>), ApiError> {
    let order = state
        .orchestrator
        .place_order(&request.product_code, request.quantity)
        .await?;

    let placement = OrderPlacement::from_order(&order);
    let status = if placement.success {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(placement)))
}

/// GET /order/{order_id}
/// Audit read of a placement attempt
pub async fn get_order(
    State(state): State<OrderState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderPlacement>, ApiError> {
    let order = state
        .orchestrator
        .get_order(&order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {order_id}")))?;

    Ok(Json(OrderPlacement::from_order(&order)))
}
