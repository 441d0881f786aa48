use async_trait::async_trait;

use super::UpstreamError;
use crate::domain::product::ProductSnapshot;

#[async_trait]
pub trait Catalog: Send + Sync + 'static {
    async fn read(&self, product_id: &str) -> Result<ProductSnapshot, UpstreamError>;

    /// Applies a signed stock delta. The catalog clamps the result at zero.
    async fn adjust_stock(
        &self,
        product_id: &str,
        delta: i64,
    ) -> Result<ProductSnapshot, UpstreamError>;
}
