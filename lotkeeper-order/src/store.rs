use async_trait::async_trait;

use crate::models::Order;

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Durable order rows, owned exclusively by the orchestrator
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert or update the row for `order.order_id`
    async fn save(&self, order: &Order) -> StoreResult<()>;

    async fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Order>>;
}
