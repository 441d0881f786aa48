//! In-process stand-ins for the identity and catalog services, for local runs
//! and tests that should not touch the network.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use orders_types::domain::product::ProductSnapshot;
use orders_types::ports::{Catalog, IdentityValidator, UpstreamError};
use rust_decimal::Decimal;

#[derive(Clone, Default)]
pub struct StaticIdentity {
    users: Arc<DashSet<String>>,
}

impl StaticIdentity {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identity = Self::default();
        for user in users {
            identity.users.insert(user.into());
        }
        identity
    }

    pub fn allow(&self, user_id: impl Into<String>) {
        self.users.insert(user_id.into());
    }

    pub fn revoke(&self, user_id: &str) {
        self.users.remove(user_id);
    }
}

#[async_trait]
impl IdentityValidator for StaticIdentity {
    async fn validate(&self, user_id: &str) -> Result<bool, UpstreamError> {
        Ok(self.users.contains(user_id))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    products: Arc<DashMap<String, ProductSnapshot>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, id: impl Into<String>, price: Decimal, stock: i64) {
        let id = id.into();
        self.products.insert(
            id.clone(),
            ProductSnapshot {
                id,
                name: String::new(),
                price,
                stock,
            },
        );
    }

    pub fn stock_of(&self, id: &str) -> Option<i64> {
        self.products.get(id).map(|p| p.stock)
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn read(&self, product_id: &str) -> Result<ProductSnapshot, UpstreamError> {
        self.products
            .get(product_id)
            .map(|p| p.clone())
            .ok_or_else(|| UpstreamError::NotFound(format!("product {product_id}")))
    }

    async fn adjust_stock(
        &self,
        product_id: &str,
        delta: i64,
    ) -> Result<ProductSnapshot, UpstreamError> {
        let mut product = self
            .products
            .get_mut(product_id)
            .ok_or_else(|| UpstreamError::NotFound(format!("product {product_id}")))?;
        product.stock = product.stock.saturating_add(delta).max(0);
        Ok(product.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identity_allow_list() {
        let identity = StaticIdentity::new(["u1"]);
        assert!(identity.validate("u1").await.unwrap());
        assert!(!identity.validate("u2").await.unwrap());
        identity.allow("u2");
        identity.revoke("u1");
        assert!(identity.validate("u2").await.unwrap());
        assert!(!identity.validate("u1").await.unwrap());
    }

    #[tokio::test]
    async fn stock_is_clamped_at_zero() {
        let catalog = InMemoryCatalog::new();
        catalog.upsert("p1", Decimal::from(100), 2);

        let snap = catalog.adjust_stock("p1", -5).await.unwrap();
        assert_eq!(snap.stock, 0);
        let snap = catalog.adjust_stock("p1", 4).await.unwrap();
        assert_eq!(snap.stock, 4);
        assert_eq!(catalog.stock_of("p1"), Some(4));
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let catalog = InMemoryCatalog::new();
        assert!(matches!(
            catalog.read("nope").await,
            Err(UpstreamError::NotFound(_))
        ));
        assert!(matches!(
            catalog.adjust_stock("nope", -1).await,
            Err(UpstreamError::NotFound(_))
        ));
    }
}
