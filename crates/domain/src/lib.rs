//! Restcheck Domain - Core harness types
//!
//! This crate defines the request, response and assertion model of the
//! restcheck API test harness. All types here are pure Rust with no I/O.

pub mod error;
pub mod json_path;
pub mod model;
pub mod records;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use json_path::JsonPath;
pub use model::{
    Rectangle, RegistrationFailureResponse, RegistrationOutcome, RegistrationRequest,
    RegistrationSuccessResponse, SchemaMismatch,
};
pub use records::{CaseRecord, TestCaseRecord};
pub use request::{BasicCredentials, HttpMethod, RequestSpec};
pub use response::ResponseSpec;
pub use testing::{
    Assertion, AssertionFailure, AssertionResult, Matcher, Mismatch, ResponseExpectation,
    StatusExpectation, TestResults,
};
