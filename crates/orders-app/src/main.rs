use orders_hex::application::order_service::OrderService;
use orders_hex::config::Config;
use orders_hex::inbound::http::{HttpServer, HttpServerConfig};
use orders_repo::Repo;
use orders_upstream::{GrpcIdentity, HttpCatalog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / upstream addresses when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let repo = Repo::build_repo(config.database_url.as_deref(), Some(config.store_timeout())).await?;

    // The channel connects on first use, so a missing user service fails requests, not startup.
    let identity = GrpcIdentity::connect_lazy(&config.user_grpc_addr, config.upstream_timeout())?;
    let catalog = HttpCatalog::builder(&config.product_base_url)?
        .with_timeout(config.upstream_timeout())
        .build()?;
    tracing::info!(
        user_service = %config.user_grpc_addr,
        product_service = %config.product_base_url,
        "upstreams configured"
    );

    let service = OrderService::new(repo, identity, catalog);
    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}
