//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness logic and external systems.
//! Each port is a trait implemented by an adapter in the infrastructure crate.

mod http_client;
mod object_store;

pub use http_client::{HttpClient, HttpClientError};
pub use object_store::{ObjectHandle, ObjectStore, StoreError};
