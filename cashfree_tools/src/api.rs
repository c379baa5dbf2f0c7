use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::CashfreeConfig,
    data_objects::{CreateOrderRequest, CreateOrderResponse, GatewayOrder, PaymentDetail},
    CashfreeApiError,
};

#[derive(Clone)]
pub struct CashfreeApi {
    config: CashfreeConfig,
    client: Arc<Client>,
}

impl CashfreeApi {
    pub fn new(config: CashfreeConfig) -> Result<Self, CashfreeApiError> {
        let mut headers = HeaderMap::with_capacity(4);
        let app_id = HeaderValue::from_str(&config.app_id)
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        let secret = HeaderValue::from_str(config.api_secret.reveal().as_str())
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        let version = HeaderValue::from_str(&config.api_version)
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        headers.insert("x-client-id", app_id);
        headers.insert("x-client-secret", secret);
        headers.insert("x-api-version", version);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, CashfreeApiError> {
        let url = self.url(path);
        trace!("Sending gateway query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| CashfreeApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("Gateway query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| CashfreeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| CashfreeApiError::RestResponseError(e.to_string()))?;
            Err(CashfreeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url())
    }

    /// Creates a hosted payment session for the given order on the gateway.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<CreateOrderResponse, CashfreeApiError> {
        debug!("Creating gateway payment session for order {}", request.order_id);
        let result = self.rest_query::<CreateOrderResponse, _>(Method::POST, "/orders", Some(request)).await?;
        info!("Created gateway payment session for order {}", result.order_id);
        Ok(result)
    }

    /// Fetches the gateway's current status for the given order id.
    pub async fn fetch_order(&self, gateway_order_id: &str) -> Result<GatewayOrder, CashfreeApiError> {
        let path = format!("/orders/{gateway_order_id}");
        debug!("Fetching gateway order {gateway_order_id}");
        self.rest_query::<GatewayOrder, ()>(Method::GET, &path, None).await
    }

    /// Lists the payment attempts the gateway has recorded against an order. Used for diagnostics.
    pub async fn payments_for_order(&self, gateway_order_id: &str) -> Result<Vec<PaymentDetail>, CashfreeApiError> {
        let path = format!("/orders/{gateway_order_id}/payments");
        debug!("Fetching gateway payments for order {gateway_order_id}");
        self.rest_query::<Vec<PaymentDetail>, ()>(Method::GET, &path, None).await
    }
}
