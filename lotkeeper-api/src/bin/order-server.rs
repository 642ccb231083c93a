use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use lotkeeper_api::client::HttpInventoryClient;
use lotkeeper_api::{order_app, OrderState};
use lotkeeper_order::OrderOrchestrator;
use lotkeeper_store::{Config, DbClient, PgOrderStore};
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
    tracing::info!("Starting order service on port {}", config.server.order_port);

    let db = DbClient::new(&config.database)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let inventory = HttpInventoryClient::new(
        &config.inventory_client.base_url,
        Duration::from_secs(config.inventory_client.timeout_seconds),
    )
    .expect("Failed to build inventory client");

    let orchestrator = OrderOrchestrator::new(
        Arc::new(PgOrderStore::new(db.pool.clone())),
        Arc::new(inventory),
    );

    let app = order_app(OrderState {
        orchestrator: Arc::new(orchestrator),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.order_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
