use async_trait::async_trait;
use lotkeeper_shared::models::{DeductRequest, DeductResponse, InventoryResponse};

/// The two remote operations the inventory boundary exposes. The production
/// implementation speaks HTTP; tests substitute an in-process stub.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn get_inventory(&self, product_code: &str)
        -> Result<InventoryResponse, InventoryApiError>;

    async fn deduct(&self, request: &DeductRequest) -> Result<DeductResponse, InventoryApiError>;
}

/// Failures surfaced by the inventory boundary
#[derive(Debug, thiserror::Error)]
pub enum InventoryApiError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    #[error("Inventory service rejected the request: {0}")]
    Rejected(String),

    /// Network error or timeout; the remote outcome is unknown
    #[error("Inventory service unreachable: {0}")]
    Transport(String),

    #[error("Unexpected inventory service response: {0}")]
    Decode(String),
}
