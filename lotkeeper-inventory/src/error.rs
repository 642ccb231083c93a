use lotkeeper_shared::models::BatchDeduction;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Unknown allocation policy '{policy}', registered: {known:?}")]
    UnknownPolicy { policy: String, known: Vec<String> },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: i32, available: i32 },

    /// Some batch writes committed before a later one failed; the committed
    /// slices are carried so the caller can reconcile instead of assuming
    /// atomicity.
    #[error("Deduction partially applied ({} batches committed): {reason}", .committed.len())]
    PartialDeduction {
        committed: Vec<BatchDeduction>,
        reason: String,
    },

    #[error("Storage error: {0}")]
    Store(String),
}
