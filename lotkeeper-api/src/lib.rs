use axum::{http::Method, routing::get, routing::post, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod client;
pub mod error;
pub mod inventory;
pub mod orders;
pub mod state;

pub use state::{InventoryState, OrderState};

/// Router for the inventory service
pub fn inventory_app(state: InventoryState) -> Router {
    Router::new()
        .route("/inventory/{product_code}", get(inventory::get_inventory))
        .route("/inventory/update", post(inventory::update_inventory))
        .route("/health", get(health))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the order service
pub fn order_app(state: OrderState) -> Router {
    Router::new()
        .route("/order", post(orders::place_order))
        .route("/order/{order_id}", get(orders::get_order))
        .route("/health", get(health))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ])
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
