//! Request types: method, parameters, credentials and the full spec.

mod auth;
mod method;
mod params;
mod spec;

pub use auth::BasicCredentials;
pub use method::HttpMethod;
pub use params::{Param, Params};
pub use spec::{APPLICATION_JSON, RequestSpec};
