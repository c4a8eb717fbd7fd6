//! Use cases
//!
//! Each use case is one harness operation built on top of the ports.

mod data_driven;
mod execute_request;
mod registration;

pub use data_driven::{CaseOutcome, DataDrivenReport, DataDrivenRunner};
pub use execute_request::ExecuteRequest;
pub use registration::{cross_check_registration, cross_check_registration_failure};
