use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lotkeeper_inventory::InventoryError;
use lotkeeper_order::{InventoryApiError, OrderError};
use lotkeeper_shared::models::ErrorBody;

#[derive(Debug)]
pub enum ApiError {
    Inventory(InventoryError),
    Order(OrderError),
    NotFound(String),
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self::Inventory(err)
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        Self::Order(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Inventory(err) => inventory_response(err),
            ApiError::Order(err) => order_response(err),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody::new(msg)),
        };

        (status, Json(body)).into_response()
    }
}

fn inventory_response(err: InventoryError) -> (StatusCode, ErrorBody) {
    match &err {
        InventoryError::ProductNotFound(_) => {
            (StatusCode::NOT_FOUND, ErrorBody::new(err.to_string()))
        }
        InventoryError::InvalidQuantity(_) => {
            (StatusCode::BAD_REQUEST, ErrorBody::new(err.to_string()))
        }
        InventoryError::InsufficientStock { requested, available } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::insufficient_stock(err.to_string(), *requested, *available),
        ),
        InventoryError::UnknownPolicy { .. } => {
            // Configuration defect; operators need the detail, clients do not
            tracing::error!("Allocation policy misconfiguration: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal Server Error"),
            )
        }
        InventoryError::PartialDeduction { committed, .. } => {
            tracing::error!(committed = committed.len(), "Deduction partially applied: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(err.to_string()))
        }
        InventoryError::Store(_) => {
            tracing::error!("Inventory storage failure: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal Server Error"),
            )
        }
    }
}

fn order_response(err: OrderError) -> (StatusCode, ErrorBody) {
    match &err {
        OrderError::InvalidQuantity(_) => {
            (StatusCode::BAD_REQUEST, ErrorBody::new(err.to_string()))
        }
        OrderError::InsufficientStock { requested, available, .. } => (
            StatusCode::BAD_REQUEST,
            ErrorBody::insufficient_stock(err.to_string(), *requested, *available),
        ),
        OrderError::Inventory(InventoryApiError::ProductNotFound(_)) => {
            (StatusCode::NOT_FOUND, ErrorBody::new(err.to_string()))
        }
        OrderError::Inventory(_) => {
            tracing::error!("Inventory boundary failure: {}", err);
            (StatusCode::BAD_GATEWAY, ErrorBody::new(err.to_string()))
        }
        OrderError::InvalidTransition { .. } | OrderError::Store(_) => {
            tracing::error!("Order processing failure: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new("Internal Server Error"),
            )
        }
    }
}
