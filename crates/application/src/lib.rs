//! Restcheck Application - Ports and use cases
//!
//! This crate holds the harness logic that sits between the pure domain
//! types and the adapters: request execution, registration cross-checks and
//! data-driven runs. I/O is reached only through the traits in [`ports`].

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{HarnessError, HarnessResult};
pub use ports::{HttpClient, HttpClientError, ObjectHandle, ObjectStore, StoreError};
pub use use_cases::{
    CaseOutcome, DataDrivenReport, DataDrivenRunner, ExecuteRequest, cross_check_registration,
    cross_check_registration_failure,
};
