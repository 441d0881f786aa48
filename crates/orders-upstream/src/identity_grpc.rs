use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use orders_types::ports::{IdentityValidator, UpstreamError};
use tonic::transport::{Channel, Endpoint};

use crate::proto::user_service_client::UserServiceClient;
use crate::proto::ValidateUserRequest;

/// Identity validator backed by the user service's `ValidateUser` RPC.
#[derive(Clone)]
pub struct GrpcIdentity {
    client: UserServiceClient<Channel>,
}

impl GrpcIdentity {
    /// Builds a lazily connecting channel; nothing is dialled until the first call.
    /// `addr` may omit the scheme (`user-service:50051`).
    pub fn connect_lazy(addr: &str, timeout: Duration) -> anyhow::Result<Self> {
        let uri = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        let channel = Endpoint::from_shared(uri)
            .context("invalid user service address")?
            .connect_timeout(timeout)
            .timeout(timeout)
            .connect_lazy();
        Ok(Self {
            client: UserServiceClient::new(channel),
        })
    }
}

fn from_status(status: tonic::Status) -> UpstreamError {
    UpstreamError::Transport(format!("{:?}: {}", status.code(), status.message()))
}

#[async_trait]
impl IdentityValidator for GrpcIdentity {
    async fn validate(&self, user_id: &str) -> Result<bool, UpstreamError> {
        let mut client = self.client.clone();
        let res = client
            .validate_user(ValidateUserRequest {
                user_id: user_id.to_string(),
            })
            .await
            .map_err(from_status)?
            .into_inner();
        tracing::debug!(user_id, valid = res.valid, "identity check");
        Ok(res.valid)
    }
}
