pub mod catalog;
pub mod identity;
pub mod order_repository;

pub use catalog::Catalog;
pub use identity::IdentityValidator;
pub use order_repository::{OrderRepository, RepoError};

/// Failure talking to a service this one does not own.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream unreachable: {0}")]
    Transport(String),
    #[error("upstream response malformed: {0}")]
    Decode(String),
}
