use std::net::SocketAddr;
use std::sync::Arc;

use lotkeeper_api::{inventory_app, InventoryState};
use lotkeeper_inventory::{InventoryAllocator, PolicyRegistry, SystemClock};
use lotkeeper_store::{Config, DbClient, PgBatchStore, PgProductStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lotkeeper=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting inventory service on port {}", config.server.inventory_port);

    let db = DbClient::new(&config.database)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let allocator = InventoryAllocator::new(
        Arc::new(PgProductStore::new(db.pool.clone())),
        Arc::new(PgBatchStore::new(db.pool.clone())),
        Arc::new(PolicyRegistry::with_builtins()),
        Arc::new(SystemClock),
    );

    let app = inventory_app(InventoryState {
        allocator: Arc::new(allocator),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.inventory_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
