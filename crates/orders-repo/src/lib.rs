#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use orders_types::domain::order::*;
use orders_types::ports::order_repository::OrderRepository;
use orders_types::ports::order_repository::RepoError;
use std::time::Duration;
use uuid::Uuid;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

/// The order store selected at build time (and, with both features, at runtime).
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url, None).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>, _: Option<Duration>) -> anyhow::Result<Self> {
        Ok(Self::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(
        database_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or("sqlite://orders.db");
        Ok(Self::Sqlite(Self::open_sqlite(url, timeout).await?))
    }

    // Both enabled: a database URL selects SQLite, otherwise keep orders in memory.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(
        database_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        match database_url {
            Some(url) => Ok(Self::Sqlite(Self::open_sqlite(url, timeout).await?)),
            None => Ok(Self::Memory(memory::InMemoryRepo::new())),
        }
    }

    #[cfg(feature = "sqlite")]
    async fn open_sqlite(url: &str, timeout: Option<Duration>) -> anyhow::Result<sqlite::SqliteRepo> {
        let repo = sqlite::SqliteRepo::new(url).await?;
        Ok(match timeout {
            Some(t) => repo.with_timeout(t),
            None => repo,
        })
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_order(
        &self,
        order: Order,
        items: Vec<OrderItem>,
    ) -> Result<(Order, Vec<OrderItem>), RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(r) => r.create_order(order, items).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.create_order(order, items).await,
        }
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(r) => r.get_order(id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.get_order(id).await,
        }
    }

    async fn get_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(r) => r.get_items(order_id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.get_items(order_id).await,
        }
    }

    async fn list_by_owner(&self, user_id: &str) -> Result<Vec<Order>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(r) => r.list_by_owner(user_id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.list_by_owner(user_id).await,
        }
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepoError> {
        match self {
            #[cfg(feature = "memory")]
            Self::Memory(r) => r.update_status(id, status).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(r) => r.update_status(id, status).await,
        }
    }
}
