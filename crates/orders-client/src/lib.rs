//! Typed HTTP client for the orders service.

use std::time::Duration;

use anyhow::Context;
use orders_types::domain::order::{LineRequest, Order, OrderItem};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Failure reported by the orders service, with its `{"error": ...}` message.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("orders service returned {status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

#[derive(Clone)]
pub struct OrdersClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct OrdersClient {
    base: Url,
    client: reqwest::Client,
}

impl OrdersClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<OrdersClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(OrdersClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> anyhow::Result<T> {
        let status = res.status();
        if status.is_success() {
            return res.json().await.context("failed to decode response");
        }
        let message = match res.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
        };
        Err(ApiError {
            status: status.as_u16(),
            message,
        }
        .into())
    }

    pub async fn health(&self) -> anyhow::Result<()> {
        let res = self.client.get(self.url("health")?).send().await?;
        Self::decode::<serde_json::Value>(res).await.map(|_| ())
    }

    pub async fn create_order(
        &self,
        req: CreateOrderRequest,
    ) -> anyhow::Result<CreateOrderResponse> {
        let res = self
            .client
            .post(self.url("orders")?)
            .json(&req)
            .send()
            .await?;
        Self::decode(res).await
    }

    pub async fn get_order(&self, id: Uuid) -> anyhow::Result<Order> {
        let res = self
            .client
            .get(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        Self::decode(res).await
    }

    pub async fn get_items(&self, id: Uuid) -> anyhow::Result<Vec<OrderItem>> {
        let res = self
            .client
            .get(self.url(&format!("orders/{id}/items"))?)
            .send()
            .await?;
        Ok(Self::decode::<ItemsResponse>(res).await?.items)
    }

    /// Orders placed by `user_id`, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> anyhow::Result<Vec<Order>> {
        let mut url = self.url("orders/user/")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot carry a path"))?
            .pop_if_empty()
            .push(user_id);
        let res = self.client.get(url).send().await?;
        Ok(Self::decode::<OrdersResponse>(res).await?.orders)
    }

    pub async fn update_status(&self, id: Uuid, status: &str) -> anyhow::Result<Order> {
        let res = self
            .client
            .put(self.url(&format!("orders/{id}/status"))?)
            .json(&UpdateStatusRequest {
                status: status.to_string(),
            })
            .send()
            .await?;
        Self::decode(res).await
    }
}

impl OrdersClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<OrdersClient> {
        if let Some(client) = self.client {
            return Ok(OrdersClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(OrdersClient {
            base: self.base,
            client,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<LineRequest>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderResponse {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct UpdateStatusRequest {
    status: String,
}

#[derive(Deserialize)]
struct ItemsResponse {
    items: Vec<OrderItem>,
}

#[derive(Deserialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}
