use std::time::Duration;

use async_trait::async_trait;
use lotkeeper_order::client::{InventoryApi, InventoryApiError};
use lotkeeper_shared::models::{DeductRequest, DeductResponse, ErrorBody, InventoryResponse};
use reqwest::{Client, Response, StatusCode};
use tracing::info;

/// HTTP client for the inventory service
pub struct HttpInventoryClient {
    client: Client,
    base_url: String,
}

impl HttpInventoryClient {
    /// `base_url` like "http://inventory-service:8081"; `timeout` bounds
    /// every request so a hung inventory service surfaces as a transport
    /// failure instead of blocking the order flow indefinitely.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryClient {
    async fn get_inventory(
        &self,
        product_code: &str,
    ) -> Result<InventoryResponse, InventoryApiError> {
        let url = format!("{}/inventory/{}", self.base_url, product_code);
        info!(%url, "fetching inventory details");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            return response
                .json::<InventoryResponse>()
                .await
                .map_err(|e| InventoryApiError::Decode(e.to_string()));
        }

        Err(error_from_response(product_code, response).await)
    }

    async fn deduct(&self, request: &DeductRequest) -> Result<DeductResponse, InventoryApiError> {
        let url = format!("{}/inventory/update", self.base_url);
        info!(%url, order_id = %request.order_id, "updating inventory");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status().is_success() {
            return response
                .json::<DeductResponse>()
                .await
                .map_err(|e| InventoryApiError::Decode(e.to_string()));
        }

        Err(error_from_response(&request.product_code, response).await)
    }
}

fn transport_error(err: reqwest::Error) -> InventoryApiError {
    InventoryApiError::Transport(err.to_string())
}

/// Decode a non-2xx reply into the client error taxonomy
async fn error_from_response(product_code: &str, response: Response) -> InventoryApiError {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.ok();

    if status == StatusCode::NOT_FOUND {
        return InventoryApiError::ProductNotFound(product_code.to_string());
    }

    match body {
        Some(ErrorBody {
            requested: Some(requested),
            available: Some(available),
            ..
        }) => InventoryApiError::InsufficientStock { requested, available },
        Some(body) => InventoryApiError::Rejected(body.error),
        None => InventoryApiError::Rejected(format!("inventory service returned {status}")),
    }
}
