//! Customer registration request and response shapes.

use serde::{Deserialize, Serialize};

use super::shape::{SchemaMismatch, parse};

/// Body posted to the registration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegistrationRequest {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Unique user name
    pub user_name: String,
    /// Password
    pub password: String,
    /// Unique email address
    pub email: String,
}

/// Body returned when a customer was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationSuccessResponse {
    /// Machine-readable code, e.g. `OPERATION_SUCCESS`.
    #[serde(rename = "SuccessCode")]
    pub success_code: String,
    /// Human-readable message.
    #[serde(rename = "Message")]
    pub message: String,
}

/// Body returned when registration was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationFailureResponse {
    /// Machine-readable fault id, e.g. `User already exists`.
    #[serde(rename = "FaultId")]
    pub fault_id: String,
    /// Fault category.
    pub fault: String,
}

/// Which shape a registration response carries.
///
/// The service signals success with `201 Created` and reports faults with a
/// plain `200 OK`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// `201`: the customer was created.
    Success(RegistrationSuccessResponse),
    /// `200`: the request was refused.
    Failure(RegistrationFailureResponse),
}

impl RegistrationOutcome {
    /// Status code carrying [`RegistrationSuccessResponse`].
    pub const SUCCESS_STATUS: u16 = 201;
    /// Status code carrying [`RegistrationFailureResponse`].
    pub const FAILURE_STATUS: u16 = 200;

    /// Picks the shape from the status code and parses `body` as that shape.
    ///
    /// Returns `Ok(None)` for any other status.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatch`] if the body does not fit the selected shape.
    pub fn from_response(status: u16, body: &str) -> Result<Option<Self>, SchemaMismatch> {
        match status {
            Self::SUCCESS_STATUS => parse(body).map(|s| Some(Self::Success(s))),
            Self::FAILURE_STATUS => Self::failure(body).map(Some),
            _ => Ok(None),
        }
    }

    /// Parses `body` as the failure shape, whatever the status.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaMismatch`] if the body is not a failure body.
    pub fn failure(body: &str) -> Result<Self, SchemaMismatch> {
        parse(body).map(Self::Failure)
    }

    /// Returns true for the success shape.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// JSON keys with the typed value read for each.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 2] {
        match self {
            Self::Success(s) => [
                ("SuccessCode", s.success_code.as_str()),
                ("Message", s.message.as_str()),
            ],
            Self::Failure(f) => [("FaultId", f.fault_id.as_str()), ("fault", f.fault.as_str())],
        }
    }
}
