use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use lotkeeper_order::models::{Order, OrderStatus};
use lotkeeper_order::store::{OrderStore, StoreResult};

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    order_id: String,
    product_code: String,
    quantity: i32,
    status: String,
    order_date: chrono::DateTime<chrono::Utc>,
    message: Option<String>,
    remaining_stock: Option<i32>,
}

impl OrderRow {
    fn into_order(self) -> StoreResult<Order> {
        let status = OrderStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown order status: {}", self.status))?;
        Ok(Order {
            id: self.id,
            order_id: self.order_id,
            product_code: self.product_code,
            quantity: self.quantity,
            status,
            order_date: self.order_date,
            message: self.message,
            remaining_stock: self.remaining_stock,
        })
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn save(&self, order: &Order) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO orders (id, order_id, product_code, quantity, status, order_date, message, remaining_stock) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (order_id) DO UPDATE \
             SET status = EXCLUDED.status, \
                 message = EXCLUDED.message, \
                 remaining_stock = EXCLUDED.remaining_stock",
        )
        .bind(order.id)
        .bind(&order.order_id)
        .bind(&order.product_code)
        .bind(order.quantity)
        .bind(order.status.as_str())
        .bind(order.order_date)
        .bind(&order.message)
        .bind(order.remaining_stock)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, order_id, product_code, quantity, status, order_date, message, remaining_stock \
             FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(OrderRow::into_order).transpose()
    }
}
