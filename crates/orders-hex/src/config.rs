use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub database_url: Option<String>,
    pub user_grpc_addr: String,
    pub product_base_url: String,
    pub upstream_timeout_ms: u64,
    pub store_timeout_ms: u64,
}

fn millis(key: &str, default: u64) -> anyhow::Result<u64> {
    match env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number of milliseconds, got {v:?}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        let database_url = env::var("DATABASE_URL").ok();
        let user_grpc_addr =
            env::var("USER_GRPC_ADDR").unwrap_or_else(|_| "http://user-service:50051".into());
        let product_base_url =
            env::var("PRODUCT_BASE_URL").unwrap_or_else(|_| "http://product-service:8081".into());
        Ok(Self {
            server_port,
            database_url,
            user_grpc_addr,
            product_base_url,
            upstream_timeout_ms: millis("UPSTREAM_TIMEOUT_MS", 5000)?,
            store_timeout_ms: millis("STORE_TIMEOUT_MS", 5000)?,
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
