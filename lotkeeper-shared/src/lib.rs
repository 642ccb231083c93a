pub mod models;

pub use models::{
    BatchDeduction, BatchStatus, BatchView, DeductRequest, DeductResponse, ErrorBody,
    InventoryResponse, ProductCategory,
};
