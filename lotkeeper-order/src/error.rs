use crate::client::InventoryApiError;

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Insufficient stock for product {product_code}: requested {requested}, available {available}")]
    InsufficientStock {
        product_code: String,
        requested: i32,
        available: i32,
    },

    #[error(transparent)]
    Inventory(#[from] InventoryApiError),

    #[error("Invalid order state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Order storage error: {0}")]
    Store(String),
}
