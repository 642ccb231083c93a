use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of an inventory batch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Active,
    Inactive,
    Expired,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Active => "ACTIVE",
            BatchStatus::Inactive => "INACTIVE",
            BatchStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(BatchStatus::Active),
            "INACTIVE" => Some(BatchStatus::Inactive),
            "EXPIRED" => Some(BatchStatus::Expired),
            _ => None,
        }
    }
}

/// Product categories in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    FoodAndBeverage,
    HomeAndGarden,
    HealthAndBeauty,
    BooksAndMedia,
    SportsAndOutdoors,
    Automotive,
    Industrial,
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "ELECTRONICS",
            ProductCategory::Clothing => "CLOTHING",
            ProductCategory::FoodAndBeverage => "FOOD_AND_BEVERAGE",
            ProductCategory::HomeAndGarden => "HOME_AND_GARDEN",
            ProductCategory::HealthAndBeauty => "HEALTH_AND_BEAUTY",
            ProductCategory::BooksAndMedia => "BOOKS_AND_MEDIA",
            ProductCategory::SportsAndOutdoors => "SPORTS_AND_OUTDOORS",
            ProductCategory::Automotive => "AUTOMOTIVE",
            ProductCategory::Industrial => "INDUSTRIAL",
            ProductCategory::Other => "OTHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ELECTRONICS" => Some(ProductCategory::Electronics),
            "CLOTHING" => Some(ProductCategory::Clothing),
            "FOOD_AND_BEVERAGE" => Some(ProductCategory::FoodAndBeverage),
            "HOME_AND_GARDEN" => Some(ProductCategory::HomeAndGarden),
            "HEALTH_AND_BEAUTY" => Some(ProductCategory::HealthAndBeauty),
            "BOOKS_AND_MEDIA" => Some(ProductCategory::BooksAndMedia),
            "SPORTS_AND_OUTDOORS" => Some(ProductCategory::SportsAndOutdoors),
            "AUTOMOTIVE" => Some(ProductCategory::Automotive),
            "INDUSTRIAL" => Some(ProductCategory::Industrial),
            "OTHER" => Some(ProductCategory::Other),
            _ => None,
        }
    }
}

/// One batch as rendered in availability responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchView {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub quantity: i32,
    pub expiry_date: Option<NaiveDate>,
    pub manufacturing_date: Option<NaiveDate>,
    pub status: BatchStatus,
    pub supplier_name: Option<String>,
    pub days_until_expiry: Option<i64>,
    pub is_expired: bool,
}

/// Response body for `GET /inventory/{product_code}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryResponse {
    pub product_id: Uuid,
    pub product_code: String,
    pub product_name: String,
    pub category: ProductCategory,
    pub total_quantity: i32,
    pub available_quantity: i32,
    pub policy: String,
    pub batches: Vec<BatchView>,
    pub minimum_stock: Option<i32>,
    pub low_stock_warning: bool,
    pub message: String,
}

/// Request body for `POST /inventory/update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductRequest {
    pub product_code: String,
    pub quantity_to_deduct: i32,
    pub order_id: String,
}

/// How much was taken from a single batch during a deduction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchDeduction {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub quantity_deducted: i32,
    pub remaining_quantity: i32,
    pub new_status: BatchStatus,
}

/// Response body for `POST /inventory/update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductResponse {
    pub success: bool,
    pub message: String,
    pub product_code: String,
    pub order_id: String,
    pub quantity_deducted: i32,
    pub remaining_quantity: i32,
    pub batch_deductions: Vec<BatchDeduction>,
    pub timestamp: DateTime<Utc>,
}

/// Structured error body returned by both services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i32>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            requested: None,
            available: None,
        }
    }

    pub fn insufficient_stock(error: impl Into<String>, requested: i32, available: i32) -> Self {
        Self {
            error: error.into(),
            requested: Some(requested),
            available: Some(available),
        }
    }
}
