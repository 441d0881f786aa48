use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem, OrderStatus};

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),
    #[error("store operation timed out after {0}ms")]
    Timeout(u128),
}

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Inserts the order and all of its items as one unit. Item `order_id`s are
    /// rewritten to the order's id.
    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), RepoError>;
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError>;
    async fn get_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepoError>;
    /// Newest first.
    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Order>, RepoError>;
    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError>;
}
