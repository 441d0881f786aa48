use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use orders_types::domain::order::{Order, OrderItem, OrderStatus};
use orders_types::ports::order_repository::{OrderRepository, RepoError};
use std::sync::Arc;
use uuid::Uuid;

/// An order together with its items; stored as one map entry so a create is
/// visible all at once or not at all.
#[derive(Clone, Debug)]
struct StoredOrder {
    order: Order,
    items: Vec<OrderItem>,
}

#[derive(Clone, Default)]
pub struct InMemoryRepo {
    map: Arc<DashMap<Uuid, StoredOrder>>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn check_items(items: &[OrderItem]) -> Result<(), RepoError> {
    for item in items {
        if item.quantity <= 0 {
            return Err(RepoError::DbError(format!(
                "order item {} violates quantity > 0",
                item.id
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create_order(
        &self,
        order: Order,
        mut items: Vec<OrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), RepoError> {
        check_items(&items)?;
        for item in items.iter_mut() {
            item.order_id = order.id;
        }
        match self.map.entry(order.id) {
            Entry::Occupied(_) => Err(RepoError::DbError(format!(
                "order {} already exists",
                order.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(StoredOrder {
                    order: order.clone(),
                    items: items.clone(),
                });
                Ok((order, items))
            }
        }
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        Ok(self.map.get(&id).map(|r| r.order.clone()))
    }

    async fn get_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepoError> {
        Ok(self
            .map
            .get(&order_id)
            .map(|r| r.items.clone())
            .unwrap_or_default())
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Order>, RepoError> {
        let mut orders: Vec<Order> = self
            .map
            .iter()
            .filter(|kv| kv.value().order.user_id == user_id)
            .map(|kv| kv.value().order.clone())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        if let Some(mut v) = self.map.get_mut(&id) {
            v.order.update_status(status);
            return Ok(Some(v.order.clone()));
        }
        Ok(None)
    }
}
