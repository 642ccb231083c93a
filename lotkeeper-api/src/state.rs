use std::sync::Arc;

use lotkeeper_inventory::InventoryAllocator;
use lotkeeper_order::OrderOrchestrator;

#[derive(Clone)]
pub struct InventoryState {
    pub allocator: Arc<InventoryAllocator>,
}

#[derive(Clone)]
pub struct OrderState {
    pub orchestrator: Arc<OrderOrchestrator>,
}
