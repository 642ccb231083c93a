use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::OrderError;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(OrderStatus::Pending),
            "CONFIRMED" => Some(OrderStatus::Confirmed),
            "FAILED" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

/// One placement attempt, kept as an append-only audit row. Created before
/// the remote deduction so a crash still leaves a traceable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub order_id: String,
    pub product_code: String,
    pub quantity: i32,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub message: Option<String>,
    pub remaining_stock: Option<i32>,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        product_code: impl Into<String>,
        quantity: i32,
        status: OrderStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order_id.into(),
            product_code: product_code.into(),
            quantity,
            status,
            order_date: Utc::now(),
            message: Some(message.into()),
            remaining_stock: None,
        }
    }

    /// Transition: Pending → Confirmed. Terminal states never change again.
    pub fn confirm(&mut self, remaining_stock: i32) -> Result<(), OrderError> {
        self.guard_pending("CONFIRMED")?;
        self.status = OrderStatus::Confirmed;
        self.remaining_stock = Some(remaining_stock);
        self.message = Some(format!("Order confirmed. Remaining stock: {remaining_stock}"));
        Ok(())
    }

    /// Transition: Pending → Failed
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), OrderError> {
        self.guard_pending("FAILED")?;
        self.status = OrderStatus::Failed;
        self.message = Some(message.into());
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.status != OrderStatus::Pending
    }

    fn guard_pending(&self, to: &str) -> Result<(), OrderError> {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }
}
