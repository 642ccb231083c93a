use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use lotkeeper_inventory::batch::{InventoryBatch, Product};
use lotkeeper_inventory::store::{BatchStore, ProductStore, StoreResult};
use lotkeeper_order::models::Order;
use lotkeeper_order::store::{OrderStore, StoreResult as OrderStoreResult};
use lotkeeper_shared::models::BatchStatus;

/// In-memory product and batch storage with the same conditional-decrement
/// contract as the Postgres store. Backs tests and local wiring.
#[derive(Default)]
pub struct MemoryInventory {
    products: Mutex<HashMap<String, Product>>,
    batches: Mutex<Vec<InventoryBatch>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&self, product: Product) {
        self.products
            .lock()
            .unwrap()
            .insert(product.product_code.clone(), product);
    }

    pub fn add_batch(&self, batch: InventoryBatch) {
        self.batches.lock().unwrap().push(batch);
    }

    pub fn batches_snapshot(&self) -> Vec<InventoryBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProductStore for MemoryInventory {
    async fn find_by_code(&self, product_code: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.lock().unwrap().get(product_code).cloned())
    }
}

#[async_trait]
impl BatchStore for MemoryInventory {
    async fn find_by_product(&self, product_id: Uuid) -> StoreResult<Vec<InventoryBatch>> {
        Ok(self
            .batches
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn deduct_from_batch(
        &self,
        batch_id: Uuid,
        amount: i32,
    ) -> StoreResult<Option<(i32, BatchStatus)>> {
        let mut batches = self.batches.lock().unwrap();
        let batch = batches
            .iter_mut()
            .find(|b| b.id == batch_id)
            .ok_or_else(|| format!("batch not found: {batch_id}"))?;

        if batch.quantity < amount {
            return Ok(None);
        }

        batch.quantity -= amount;
        if batch.quantity == 0 {
            batch.status = BatchStatus::Inactive;
        }
        batch.updated_at = chrono::Utc::now();
        Ok(Some((batch.quantity, batch.status)))
    }
}

/// In-memory order rows keyed by the public order identifier
#[derive(Default)]
pub struct MemoryOrderStore {
    rows: Mutex<HashMap<String, Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders_snapshot(&self) -> Vec<Order> {
        self.rows.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn save(&self, order: &Order) -> OrderStoreResult<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(order.order_id.clone(), order.clone());
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> OrderStoreResult<Option<Order>> {
        Ok(self.rows.lock().unwrap().get(order_id).cloned())
    }
}
