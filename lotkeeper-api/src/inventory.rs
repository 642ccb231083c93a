use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use lotkeeper_inventory::{Availability, DeductionOutcome, InventoryBatch};
use lotkeeper_shared::models::{BatchView, DeductRequest, DeductResponse, InventoryResponse};

use crate::error::ApiError;
use crate::state::InventoryState;

/// GET /inventory/{product_code}
/// Availability snapshot with batches in the product policy's consumption order
pub async fn get_inventory(
    State(state): State<InventoryState>,
    Path(product_code): Path<String>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let availability = state.allocator.get_availability(&product_code).await?;
    let today = state.allocator.clock().today();
    Ok(Json(availability_to_response(availability, today)))
}

/// POST /inventory/update
/// Deducts stock for an order, batch by batch
pub async fn update_inventory(
    State(state): State<InventoryState>,
    Json(request): Json<DeductRequest>,
) -> Result<Json<DeductResponse>, ApiError> {
    let outcome = state
        .allocator
        .deduct(
            &request.product_code,
            request.quantity_to_deduct,
            &request.order_id,
        )
        .await?;

    let now = state.allocator.clock().now();
    Ok(Json(outcome_to_response(&request, outcome, now)))
}

pub fn availability_to_response(availability: Availability, today: NaiveDate) -> InventoryResponse {
    let Availability {
        product,
        total_quantity,
        available_quantity,
        batches,
        low_stock_warning,
    } = availability;

    let message = if low_stock_warning {
        "Low stock warning!"
    } else {
        "Stock available"
    };

    InventoryResponse {
        product_id: product.id,
        product_code: product.product_code,
        product_name: product.name,
        category: product.category,
        total_quantity,
        available_quantity,
        policy: product.policy,
        batches: batches.iter().map(|b| batch_view(b, today)).collect(),
        minimum_stock: product.minimum_stock,
        low_stock_warning,
        message: message.to_string(),
    }
}

pub fn outcome_to_response(
    request: &DeductRequest,
    outcome: DeductionOutcome,
    timestamp: DateTime<Utc>,
) -> DeductResponse {
    DeductResponse {
        success: true,
        message: "Inventory updated successfully".to_string(),
        product_code: request.product_code.clone(),
        order_id: request.order_id.clone(),
        quantity_deducted: outcome.quantity_deducted,
        remaining_quantity: outcome.remaining_quantity,
        batch_deductions: outcome.deductions,
        timestamp,
    }
}

fn batch_view(batch: &InventoryBatch, today: NaiveDate) -> BatchView {
    let days_until_expiry = batch
        .expiry_date
        .map(|expiry| (expiry - today).num_days());

    BatchView {
        batch_id: batch.id,
        batch_number: batch.batch_number.clone(),
        quantity: batch.quantity,
        expiry_date: batch.expiry_date,
        manufacturing_date: batch.manufacturing_date,
        status: batch.status,
        supplier_name: batch.supplier_name.clone(),
        days_until_expiry,
        is_expired: batch.is_expired(today),
    }
}
