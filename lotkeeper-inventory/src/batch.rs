use chrono::{DateTime, NaiveDate, Utc};
use lotkeeper_shared::models::{BatchStatus, ProductCategory};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stocked product; each product owns any number of batches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub product_code: String,
    pub name: String,
    pub description: Option<String>,
    pub category: ProductCategory,
    pub minimum_stock: Option<i32>,
    /// Allocation policy identifier, resolved through the registry
    pub policy: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(product_code: impl Into<String>, name: impl Into<String>, category: ProductCategory) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product_code: product_code.into(),
            name: name.into(),
            description: None,
            category,
            minimum_stock: None,
            policy: crate::policy::STANDARD.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A discrete lot of stock for one product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryBatch {
    pub id: Uuid,
    pub product_id: Uuid,
    pub batch_number: String,
    pub quantity: i32,
    pub expiry_date: Option<NaiveDate>,
    pub manufacturing_date: Option<NaiveDate>,
    pub supplier_name: Option<String>,
    pub cost_per_unit: Option<f64>,
    pub status: BatchStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryBatch {
    pub fn new(product_id: Uuid, batch_number: impl Into<String>, quantity: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product_id,
            batch_number: batch_number.into(),
            quantity,
            expiry_date: None,
            manufacturing_date: None,
            supplier_name: None,
            cost_per_unit: None,
            status: BatchStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Logically expired regardless of the stored status
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        matches!(self.expiry_date, Some(expiry) if expiry < today)
    }

    /// Active, stocked and not past its expiry date
    pub fn is_available(&self, today: NaiveDate) -> bool {
        self.status == BatchStatus::Active && self.quantity > 0 && !self.is_expired(today)
    }
}
