use async_trait::async_trait;
use lotkeeper_shared::models::BatchStatus;
use uuid::Uuid;

use crate::batch::{InventoryBatch, Product};

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Read access to the product catalog
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_code(&self, product_code: &str) -> StoreResult<Option<Product>>;
}

/// Durable batch storage. The allocator is the only writer, and only
/// through `deduct_from_batch`.
#[async_trait]
pub trait BatchStore: Send + Sync {
    async fn find_by_product(&self, product_id: Uuid) -> StoreResult<Vec<InventoryBatch>>;

    /// Atomically decrement a batch's quantity, flipping its status to
    /// INACTIVE when it reaches zero. The write is conditional: if the batch
    /// no longer holds `amount` (a concurrent deduction won the race),
    /// nothing is written and `None` is returned. Each successful call is an
    /// independently durable write; there is no cross-batch transaction.
    ///
    /// Returns the batch's remaining quantity and status after the write.
    async fn deduct_from_batch(
        &self,
        batch_id: Uuid,
        amount: i32,
    ) -> StoreResult<Option<(i32, BatchStatus)>>;
}
