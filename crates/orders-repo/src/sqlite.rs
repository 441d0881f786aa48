use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use orders_types::domain::order::{Order, OrderItem, OrderStatus};
use orders_types::ports::order_repository::{OrderRepository, RepoError};
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteRepo {
    pool: SqlitePool,
    timeout: Duration,
}

#[derive(FromRow)]
struct DbOrder {
    id: String,
    user_id: String,
    status: String,
    total: String,
    created_at: String,
    updated_at: String,
}

#[derive(FromRow)]
struct DbOrderItem {
    id: String,
    order_id: String,
    product_id: String,
    quantity: i64,
    price: String,
}

fn db_err(e: impl std::fmt::Display) -> RepoError {
    RepoError::DbError(e.to_string())
}

// Fixed-width timestamps so lexical order in SQLite matches time order.
fn timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(db_err)?
        .with_timezone(&Utc))
}

impl DbOrder {
    fn into_order(self) -> Result<Order, RepoError> {
        Ok(Order {
            id: Uuid::parse_str(&self.id).map_err(db_err)?,
            user_id: self.user_id,
            status: OrderStatus::parse(self.status).map_err(db_err)?,
            total: Decimal::from_str(&self.total).map_err(db_err)?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

impl DbOrderItem {
    fn into_item(self) -> Result<OrderItem, RepoError> {
        Ok(OrderItem {
            id: Uuid::parse_str(&self.id).map_err(db_err)?,
            order_id: Uuid::parse_str(&self.order_id).map_err(db_err)?,
            product_id: self.product_id,
            quantity: self.quantity,
            price: Decimal::from_str(&self.price).map_err(db_err)?,
        })
    }
}

const ORDER_COLUMNS: &str = "id, user_id, status, total, created_at, updated_at";

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePool::connect_with(options).await?;

        let ddl = include_str!("../migrations/0001_create_orders.sql");
        for stmt in ddl.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            sqlx::query(stmt).execute(&pool).await?;
        }
        tracing::debug!(database_url, "order store ready");

        Ok(Self {
            pool,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        tokio::time::timeout(self.timeout, op)
            .await
            .map_err(|_| RepoError::Timeout(self.timeout.as_millis()))?
    }

    async fn fetch_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        let row: Option<DbOrder> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;
        row.map(|r| r.into_order()).transpose()
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_order(
        &self,
        order: Order,
        mut items: Vec<OrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), RepoError> {
        for item in items.iter_mut() {
            item.order_id = order.id;
        }
        self.bounded(async {
            // Dropping `tx` without commit rolls everything back.
            let mut tx = self.pool.begin().await.map_err(db_err)?;
            sqlx::query(&format!(
                "INSERT INTO orders ({ORDER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?)"
            ))
            .bind(order.id.to_string())
            .bind(&order.user_id)
            .bind(order.status.as_str())
            .bind(order.total.to_string())
            .bind(timestamp(&order.created_at))
            .bind(timestamp(&order.updated_at))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

            for item in &items {
                sqlx::query(
                    "INSERT INTO order_items (id, order_id, product_id, quantity, price)
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(item.id.to_string())
                .bind(item.order_id.to_string())
                .bind(&item.product_id)
                .bind(item.quantity)
                .bind(item.price.to_string())
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
            }

            tx.commit().await.map_err(db_err)
        })
        .await?;
        Ok((order, items))
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        self.bounded(self.fetch_order(id)).await
    }

    async fn get_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepoError> {
        self.bounded(async {
            let rows: Vec<DbOrderItem> = sqlx::query_as(
                "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE order_id = ?",
            )
            .bind(order_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.into_iter()
                .map(|r| r.into_item())
                .collect::<Result<Vec<_>, _>>()
        })
        .await
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Order>, RepoError> {
        self.bounded(async {
            let rows: Vec<DbOrder> = sqlx::query_as(&format!(
                "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? ORDER BY created_at DESC"
            ))
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
            rows.into_iter()
                .map(|r| r.into_order())
                .collect::<Result<Vec<_>, _>>()
        })
        .await
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        self.bounded(async {
            let updated = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(timestamp(&Utc::now()))
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
            if updated.rows_affected() == 0 {
                return Ok(None);
            }
            self.fetch_order(id).await
        })
        .await
    }
}
