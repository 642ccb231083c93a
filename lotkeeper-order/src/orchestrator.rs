use std::sync::Arc;

use lotkeeper_shared::models::DeductRequest;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::client::{InventoryApi, InventoryApiError};
use crate::error::OrderError;
use crate::models::{Order, OrderStatus};
use crate::store::OrderStore;

/// Drives a placement through the two-phase remote interaction: read
/// availability, record a pending order, ask inventory to deduct, then
/// finalize the record. Nothing is retried and nothing is compensated:
/// the deduct call is the only mutation against inventory, and when it
/// fails it failed atomically from this side's point of view.
pub struct OrderOrchestrator {
    orders: Arc<dyn OrderStore>,
    inventory: Arc<dyn InventoryApi>,
}

impl OrderOrchestrator {
    pub fn new(orders: Arc<dyn OrderStore>, inventory: Arc<dyn InventoryApi>) -> Self {
        Self { orders, inventory }
    }

    pub async fn place_order(&self, product_code: &str, quantity: i32) -> Result<Order, OrderError> {
        if quantity < 1 {
            return Err(OrderError::InvalidQuantity(quantity));
        }

        let order_id = generate_order_id();
        info!(%order_id, product_code, quantity, "processing order");

        // Advisory pre-check only: it short-circuits a partial shortfall but
        // a zero-availability read falls through, leaving the deduct call as
        // the authoritative sufficiency check.
        let availability = self.inventory.get_inventory(product_code).await?;
        let available = availability.available_quantity;

        if available > 0 && available < quantity {
            warn!(%order_id, product_code, available, "insufficient stock at pre-check");
            let order = Order::new(
                &order_id,
                product_code,
                quantity,
                OrderStatus::Failed,
                "Insufficient stock available",
            );
            self.save(&order).await?;
            return Err(OrderError::InsufficientStock {
                product_code: product_code.to_string(),
                requested: quantity,
                available,
            });
        }

        let mut order = Order::new(
            &order_id,
            product_code,
            quantity,
            OrderStatus::Pending,
            "Order placed, awaiting inventory update",
        );
        self.save(&order).await?;
        info!(%order_id, "order created");

        let request = DeductRequest {
            product_code: product_code.to_string(),
            quantity_to_deduct: quantity,
            order_id: order_id.clone(),
        };

        match self.inventory.deduct(&request).await {
            Ok(response) if response.success => {
                order.confirm(response.remaining_quantity)?;
                self.save(&order).await?;
                info!(%order_id, remaining = response.remaining_quantity, "order confirmed");
                Ok(order)
            }
            Ok(response) => {
                order.fail(format!("Failed to update inventory: {}", response.message))?;
                self.save(&order).await?;
                error!(%order_id, message = %response.message, "inventory update rejected");
                Ok(order)
            }
            Err(e) => {
                error!(%order_id, error = %e, "error processing order");
                order.fail(format!("Error: {e}"))?;
                self.save(&order).await?;
                Err(map_deduct_error(product_code, e))
            }
        }
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>, OrderError> {
        self.orders
            .find_by_order_id(order_id)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))
    }

    async fn save(&self, order: &Order) -> Result<(), OrderError> {
        self.orders
            .save(order)
            .await
            .map_err(|e| OrderError::Store(e.to_string()))
    }
}

fn map_deduct_error(product_code: &str, error: InventoryApiError) -> OrderError {
    match error {
        InventoryApiError::InsufficientStock { requested, available } => {
            OrderError::InsufficientStock {
                product_code: product_code.to_string(),
                requested,
                available,
            }
        }
        other => OrderError::Inventory(other),
    }
}

fn generate_order_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", uuid[..8].to_uppercase())
}
