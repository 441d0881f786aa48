//! orders-upstream: adapters for the identity and catalog services the order
//! service depends on but does not own.

pub mod catalog_http;
pub mod identity_grpc;
pub mod memory;
pub mod proto;

pub use catalog_http::{HttpCatalog, HttpCatalogBuilder};
pub use identity_grpc::GrpcIdentity;
pub use memory::{InMemoryCatalog, StaticIdentity};
