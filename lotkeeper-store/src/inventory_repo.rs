use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lotkeeper_inventory::batch::{InventoryBatch, Product};
use lotkeeper_inventory::store::{BatchStore, ProductStore, StoreResult};
use lotkeeper_shared::models::{BatchStatus, ProductCategory};

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    product_code: String,
    name: String,
    description: Option<String>,
    category: String,
    minimum_stock: Option<i32>,
    policy: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProductRow {
    fn into_product(self) -> StoreResult<Product> {
        let category = ProductCategory::parse(&self.category)
            .ok_or_else(|| format!("unknown product category: {}", self.category))?;
        Ok(Product {
            id: self.id,
            product_code: self.product_code,
            name: self.name,
            description: self.description,
            category,
            minimum_stock: self.minimum_stock,
            policy: self.policy,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BatchRow {
    id: Uuid,
    product_id: Uuid,
    batch_number: String,
    quantity: i32,
    expiry_date: Option<chrono::NaiveDate>,
    manufacturing_date: Option<chrono::NaiveDate>,
    supplier_name: Option<String>,
    cost_per_unit: Option<f64>,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BatchRow {
    fn into_batch(self) -> StoreResult<InventoryBatch> {
        let status = BatchStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown batch status: {}", self.status))?;
        Ok(InventoryBatch {
            id: self.id,
            product_id: self.product_id,
            batch_number: self.batch_number,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            manufacturing_date: self.manufacturing_date,
            supplier_name: self.supplier_name,
            cost_per_unit: self.cost_per_unit,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn find_by_code(&self, product_code: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, product_code, name, description, category, minimum_stock, policy, created_at, updated_at \
             FROM products WHERE product_code = $1",
        )
        .bind(product_code)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }
}

pub struct PgBatchStore {
    pool: PgPool,
}

impl PgBatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchStore for PgBatchStore {
    async fn find_by_product(&self, product_id: Uuid) -> StoreResult<Vec<InventoryBatch>> {
        let rows = sqlx::query_as::<_, BatchRow>(
            "SELECT id, product_id, batch_number, quantity, expiry_date, manufacturing_date, \
                    supplier_name, cost_per_unit, status, created_at, updated_at \
             FROM inventory_batches WHERE product_id = $1 ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BatchRow::into_batch).collect()
    }

    async fn deduct_from_batch(
        &self,
        batch_id: Uuid,
        amount: i32,
    ) -> StoreResult<Option<(i32, BatchStatus)>> {
        // Conditional decrement: the WHERE clause refuses a write that would
        // go negative, so two racing deductions cannot both drain the batch.
        let row = sqlx::query_as::<_, (i32, String)>(
            "UPDATE inventory_batches \
             SET quantity = quantity - $2, \
                 status = CASE WHEN quantity - $2 = 0 THEN 'INACTIVE' ELSE status END, \
                 updated_at = NOW() \
             WHERE id = $1 AND quantity >= $2 \
             RETURNING quantity, status",
        )
        .bind(batch_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((quantity, status)) => {
                let status = BatchStatus::parse(&status)
                    .ok_or_else(|| format!("unknown batch status: {status}"))?;
                Ok(Some((quantity, status)))
            }
            None => Ok(None),
        }
    }
}
