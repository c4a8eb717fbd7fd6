//! Restcheck Suite - API tests against public demo services
//!
//! [`Harness`] wires the reqwest adapter, the assertion runner and the
//! configuration together; [`Endpoints`] builds a fresh request for every
//! remote call. The tests live under `tests/`: the offline ones run against
//! a mock server, the live ones are ignored by default.

pub mod endpoints;
pub mod fixtures;
pub mod harness;

pub use endpoints::Endpoints;
pub use harness::Harness;
