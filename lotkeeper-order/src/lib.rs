pub mod client;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod store;

pub use client::{InventoryApi, InventoryApiError};
pub use error::OrderError;
pub use models::{Order, OrderStatus};
pub use orchestrator::OrderOrchestrator;
pub use store::OrderStore;
