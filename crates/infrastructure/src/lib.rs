//! Restcheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer, plus configuration and logging setup.

pub mod adapters;
pub mod config;
pub mod logging;
pub mod persistence;
pub mod serialization;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use self::config::{ConfigLoadError, HarnessConfig};
pub use logging::init_tracing;
pub use persistence::FileObjectStore;
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
pub use testing::TestRunner;
