use crate::errors::AppError;
use orders_types::domain::order::{
    line_total, validate_order_request, LineRequest, Order, OrderItem, OrderStatus,
};
use orders_types::ports::{Catalog, IdentityValidator, OrderRepository, UpstreamError};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Coordinates order creation across the identity service, the catalog and the
/// order store, and serves the read side of the order ledger.
pub struct OrderService<R, U, C>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    repo: R,
    identity: U,
    catalog: C,
}

impl<R, U, C> OrderService<R, U, C>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    pub fn new(repo: R, identity: U, catalog: C) -> Self {
        Self {
            repo,
            identity,
            catalog,
        }
    }

    /// Validates the user, prices every line against the catalog, persists the
    /// order with its items in one transaction, then debits stock.
    ///
    /// Nothing is written anywhere until every line has been priced and found in
    /// stock. Once the order is committed the call succeeds even if a stock debit
    /// fails; the failed debit is logged and the remaining debits are skipped.
    #[tracing::instrument(skip(self, lines), fields(lines = lines.len()))]
    pub async fn create_order(
        &self,
        user_id: String,
        lines: Vec<LineRequest>,
    ) -> Result<(Order, Vec<OrderItem>), AppError> {
        validate_order_request(&user_id, &lines)
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        // Fail closed: an unreachable identity service is as good as "no".
        match self.identity.validate(&user_id).await {
            Ok(true) => {}
            Ok(false) => {
                info!("user rejected by identity service");
                return Err(AppError::InvalidUser);
            }
            Err(e) => {
                warn!(error = %e, "identity check failed");
                return Err(AppError::InvalidUser);
            }
        }

        let mut priced = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;
        for line in &lines {
            let snapshot = self
                .catalog
                .read(&line.product_id)
                .await
                .map_err(|e| match e {
                    UpstreamError::NotFound(_) => AppError::ProductNotFound(line.product_id.clone()),
                    other => AppError::Upstream(other.to_string()),
                })?;
            if snapshot.price < Decimal::ZERO {
                warn!(product_id = %line.product_id, price = %snapshot.price, "negative catalog price");
                return Err(AppError::Upstream(format!(
                    "negative price for product {}",
                    line.product_id
                )));
            }
            if !snapshot.covers(line.quantity) {
                info!(
                    product_id = %line.product_id,
                    requested = line.quantity,
                    available = snapshot.stock,
                    "insufficient stock"
                );
                return Err(AppError::InsufficientStock(line.product_id.clone()));
            }
            total = line_total(snapshot.price, line.quantity)
                .and_then(|t| total.checked_add(t))
                .ok_or_else(|| AppError::BadRequest("order total overflow".into()))?;
            debug!(product_id = %line.product_id, price = %snapshot.price, quantity = line.quantity, "line priced");
            priced.push((line, snapshot.price));
        }

        let order = Order::pending(user_id, total);
        let items = priced
            .into_iter()
            .map(|(line, price)| {
                OrderItem::new(order.id, line.product_id.clone(), line.quantity, price)
            })
            .collect();
        let (order, items) = self.repo.create_order(order, items).await?;
        info!(order_id = %order.id, total = %order.total, "order created");

        self.debit_stock(order.id, &lines).await;
        Ok((order, items))
    }

    // Best effort: no retry and no compensation once the order is committed.
    async fn debit_stock(&self, order_id: Uuid, lines: &[LineRequest]) {
        for (idx, line) in lines.iter().enumerate() {
            if let Err(e) = self
                .catalog
                .adjust_stock(&line.product_id, -line.quantity)
                .await
            {
                warn!(
                    %order_id,
                    product_id = %line.product_id,
                    error = %e,
                    skipped = lines.len() - idx - 1,
                    "stock debit failed after commit"
                );
                return;
            }
        }
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Order, AppError> {
        match self.repo.get_order(id).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }

    pub async fn get_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, AppError> {
        self.get_order(order_id).await?;
        Ok(self.repo.get_items(order_id).await?)
    }

    pub async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_by_owner(user_id).await?)
    }

    pub async fn update_status(&self, id: Uuid, status: String) -> Result<Order, AppError> {
        let status = OrderStatus::parse(status).map_err(|e| AppError::BadRequest(e.to_string()))?;
        match self.repo.update_status(id, status).await? {
            Some(o) => Ok(o),
            None => Err(AppError::NotFound(format!("order {}", id))),
        }
    }
}
