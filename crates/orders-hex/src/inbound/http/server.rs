use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    serve, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::errors::AppError;
use orders_types::domain::order::{LineRequest, Order, OrderItem};
use orders_types::ports::{Catalog, IdentityValidator, OrderRepository};

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct HttpServer<R, U, C>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    pub service: Arc<OrderService<R, U, C>>,
    pub config: HttpServerConfig,
}

type Shared<R, U, C> = State<Arc<OrderService<R, U, C>>>;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<LineRequest>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Serialize)]
struct CreateOrderResponse {
    order: Order,
    items: Vec<OrderItem>,
}

#[derive(Serialize)]
struct ItemsResponse {
    items: Vec<OrderItem>,
}

#[derive(Serialize)]
struct OrdersResponse {
    orders: Vec<Order>,
}

impl<R, U, C> HttpServer<R, U, C>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    pub async fn new(
        service: OrderService<R, U, C>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub fn router(&self) -> Router {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        Router::new()
            .route("/health", get(health))
            .route("/orders", post(create_order::<R, U, C>))
            .route("/orders/user/{user_id}", get(list_by_owner::<R, U, C>))
            .route("/orders/{id}", get(get_order::<R, U, C>))
            .route("/orders/{id}/items", get(get_items::<R, U, C>))
            .route("/orders/{id}/status", put(update_status::<R, U, C>))
            .layer(trace_layer)
            .with_state(self.service.clone())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = self.router();
        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

// Unparseable ids cannot name an order.
fn order_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("order {}", raw)))
}

async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn create_order<R, U, C>(
    State(service): Shared<R, U, C>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(format!("invalid payload: {e}")))?;
    // Every workflow failure is the caller's 400, store failures included.
    let (order, items) = service
        .create_order(payload.user_id, payload.items)
        .await
        .map_err(|e| match e {
            AppError::Persistence(_) | AppError::Internal(_) => AppError::BadRequest(e.to_string()),
            other => other,
        })?;
    Ok((StatusCode::CREATED, Json(CreateOrderResponse { order, items })))
}

async fn get_order<R, U, C>(
    State(service): Shared<R, U, C>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    let order = service.get_order(order_id(&id)?).await?;
    Ok(Json(order))
}

async fn get_items<R, U, C>(
    State(service): Shared<R, U, C>,
    Path(id): Path<String>,
) -> Result<Json<ItemsResponse>, AppError>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    let items = service.get_items(order_id(&id)?).await?;
    Ok(Json(ItemsResponse { items }))
}

async fn list_by_owner<R, U, C>(
    State(service): Shared<R, U, C>,
    Path(user_id): Path<String>,
) -> Result<Json<OrdersResponse>, AppError>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    let orders = service.list_by_owner(&user_id).await?;
    Ok(Json(OrdersResponse { orders }))
}

async fn update_status<R, U, C>(
    State(service): Shared<R, U, C>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Order>, AppError>
where
    R: OrderRepository,
    U: IdentityValidator,
    C: Catalog,
{
    let Json(payload) = payload.map_err(|e| AppError::BadRequest(format!("invalid body: {e}")))?;
    let updated = service.update_status(order_id(&id)?, payload.status).await?;
    Ok(Json(updated))
}
