use async_trait::async_trait;

use super::UpstreamError;

#[async_trait]
pub trait IdentityValidator: Send + Sync + 'static {
    /// `Ok(true)` when `user_id` names an existing, usable account.
    async fn validate(&self, user_id: &str) -> Result<bool, UpstreamError>;
}
