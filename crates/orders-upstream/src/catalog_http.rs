use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use orders_types::domain::product::ProductSnapshot;
use orders_types::ports::{Catalog, UpstreamError};
use reqwest::{StatusCode, Url};
use serde::Serialize;

#[derive(Clone)]
pub struct HttpCatalogBuilder {
    base: Url,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

/// Catalog capability over the product service's HTTP API.
#[derive(Clone)]
pub struct HttpCatalog {
    base: Url,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct StockDelta {
    delta: i64,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<HttpCatalogBuilder> {
        let base = Url::parse(base_url).context("invalid catalog base url")?;
        Ok(HttpCatalogBuilder {
            base,
            timeout: None,
            client: None,
        })
    }

    /// `products/{id}[/{suffix}]` with the id pushed as one escaped path segment,
    /// so `?`, `#`, `/` or `..` inside an id cannot address another resource.
    fn product_url(&self, product_id: &str, suffix: Option<&str>) -> Result<Url, UpstreamError> {
        // `push` drops dot segments, which would leave the bare collection path.
        if matches!(product_id, "" | "." | "..") {
            return Err(UpstreamError::NotFound(format!("product {product_id}")));
        }
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| UpstreamError::Transport("catalog base url cannot carry a path".into()))?;
            segments.pop_if_empty().push("products").push(product_id);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    async fn decode(
        product_id: &str,
        res: reqwest::Response,
    ) -> Result<ProductSnapshot, UpstreamError> {
        match res.status() {
            StatusCode::OK => res
                .json()
                .await
                .map_err(|e| UpstreamError::Decode(e.to_string())),
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound(format!("product {product_id}"))),
            other => Err(UpstreamError::Status(other.as_u16())),
        }
    }
}

fn transport(e: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport(e.to_string())
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn read(&self, product_id: &str) -> Result<ProductSnapshot, UpstreamError> {
        let res = self
            .client
            .get(self.product_url(product_id, None)?)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(product_id, res).await
    }

    async fn adjust_stock(
        &self,
        product_id: &str,
        delta: i64,
    ) -> Result<ProductSnapshot, UpstreamError> {
        let res = self
            .client
            .put(self.product_url(product_id, Some("stock"))?)
            .json(&StockDelta { delta })
            .send()
            .await
            .map_err(transport)?;
        Self::decode(product_id, res).await
    }
}

impl HttpCatalogBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<HttpCatalog> {
        if let Some(client) = self.client {
            return Ok(HttpCatalog {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(HttpCatalog {
            base: self.base,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    #[tokio::test]
    async fn reads_snapshot() {
        let server = MockServer::start();
        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/products/p1");
            then.status(200).json_body(json!({
                "id": "p1",
                "name": "Widget",
                "description": "",
                "price": 100,
                "stock": 10
            }));
        });

        let catalog = HttpCatalog::new(&server.base_url()).unwrap();
        let snap = catalog.read("p1").await.unwrap();
        assert_eq!(snap.price, Decimal::from(100));
        assert_eq!(snap.stock, 10);
        get_mock.assert();
    }

    #[tokio::test]
    async fn adjusts_stock_with_signed_delta() {
        let server = MockServer::start();
        let put_mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/products/p1/stock")
                .json_body(json!({ "delta": -3 }));
            then.status(200)
                .json_body(json!({ "id": "p1", "price": 100, "stock": 7 }));
        });

        let catalog = HttpCatalog::builder(&server.base_url())
            .unwrap()
            .with_timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let snap = catalog.adjust_stock("p1", -3).await.unwrap();
        assert_eq!(snap.stock, 7);
        put_mock.assert();
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/products/missing");
            then.status(404).json_body(json!({ "error": "not found" }));
        });
        server.mock(|when, then| {
            when.method(PUT).path("/products/p1/stock");
            then.status(500).json_body(json!({ "error": "boom" }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/garbled");
            then.status(200).body("not json");
        });

        let catalog = HttpCatalog::new(&server.base_url()).unwrap();
        assert!(matches!(
            catalog.read("missing").await,
            Err(UpstreamError::NotFound(_))
        ));
        assert_eq!(
            catalog.adjust_stock("p1", -1).await,
            Err(UpstreamError::Status(500))
        );
        assert!(matches!(
            catalog.read("garbled").await,
            Err(UpstreamError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn product_ids_stay_inside_one_path_segment() {
        let server = MockServer::start();
        let wrong_product = server.mock(|when, then| {
            when.method(GET).path("/products/p1");
            then.status(200)
                .json_body(json!({ "id": "p1", "price": 1, "stock": 1 }));
        });
        let escaped_query = server.mock(|when, then| {
            when.method(GET).path("/products/p1%3Fx");
            then.status(200)
                .json_body(json!({ "id": "p1?x", "price": 7, "stock": 2 }));
        });
        let escaped_slash = server.mock(|when, then| {
            when.method(PUT).path("/products/a%2Fb/stock");
            then.status(200)
                .json_body(json!({ "id": "a/b", "price": 3, "stock": 0 }));
        });
        let admin = server.mock(|when, then| {
            when.method(GET).path("/admin");
            then.status(200)
                .json_body(json!({ "id": "admin", "price": 0, "stock": 99 }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/products/..%2Fadmin");
            then.status(404);
        });

        let catalog = HttpCatalog::new(&server.base_url()).unwrap();
        let snap = catalog.read("p1?x").await.unwrap();
        assert_eq!(snap.price, Decimal::from(7));
        let snap = catalog.adjust_stock("a/b", -1).await.unwrap();
        assert_eq!(snap.id, "a/b");
        assert!(matches!(
            catalog.read("../admin").await,
            Err(UpstreamError::NotFound(_))
        ));

        let listing = server.mock(|when, then| {
            when.method(GET).path("/products");
            then.status(200).json_body(json!([]));
        });
        assert!(matches!(
            catalog.read("..").await,
            Err(UpstreamError::NotFound(_))
        ));
        listing.assert_hits(0);

        escaped_query.assert();
        escaped_slash.assert();
        wrong_product.assert_hits(0);
        admin.assert_hits(0);
    }

    #[tokio::test]
    async fn base_url_with_path_prefix() {
        let server = MockServer::start();
        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/catalog/products/p1");
            then.status(200)
                .json_body(json!({ "id": "p1", "price": 5, "stock": 1 }));
        });

        let catalog = HttpCatalog::new(&server.url("/catalog")).unwrap();
        assert_eq!(catalog.read("p1").await.unwrap().stock, 1);
        get_mock.assert();
    }

    #[tokio::test]
    async fn unreachable_catalog_is_transport_error() {
        let catalog = HttpCatalog::builder("http://127.0.0.1:9")
            .unwrap()
            .with_timeout(Duration::from_millis(500))
            .build()
            .unwrap();
        assert!(matches!(
            catalog.read("p1").await,
            Err(UpstreamError::Transport(_))
        ));
    }
}
