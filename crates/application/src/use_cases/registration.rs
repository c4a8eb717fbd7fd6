//! Registration cross-check
//!
//! Reads the registration response twice, once through JSON paths and once
//! through the typed model, and requires both readings to agree.

use restcheck_domain::{
    AssertionFailure, JsonPath, Mismatch, RegistrationOutcome, SchemaMismatch,
    response::ResponseSpec,
};
use serde_json::Value;

use crate::error::HarnessResult;

/// Selects the response shape from the status code and cross-checks it.
///
/// `201` selects the success shape, `200` the failure shape.
///
/// # Errors
///
/// - `HarnessError::Assertion` for any other status, or when a JSON path
///   reading disagrees with the typed reading.
/// - `HarnessError::SchemaMismatch` when the body does not fit the shape.
pub fn cross_check_registration(response: &ResponseSpec) -> HarnessResult<RegistrationOutcome> {
    let outcome = RegistrationOutcome::from_response(response.status(), response.body())?
        .ok_or_else(|| {
            AssertionFailure::single(
                "registration",
                Mismatch::new(
                    "status",
                    format!(
                        "{} or {}",
                        RegistrationOutcome::SUCCESS_STATUS,
                        RegistrationOutcome::FAILURE_STATUS
                    ),
                    response.status().to_string(),
                ),
            )
        })?;

    compare_fields(response, &outcome)?;
    Ok(outcome)
}

/// Reads the body as the failure shape, whatever the status, and cross-checks it.
///
/// # Errors
///
/// Same as [`cross_check_registration`], minus the status check.
pub fn cross_check_registration_failure(
    response: &ResponseSpec,
) -> HarnessResult<RegistrationOutcome> {
    let outcome = RegistrationOutcome::failure(response.body())?;
    compare_fields(response, &outcome)?;
    Ok(outcome)
}

fn compare_fields(response: &ResponseSpec, outcome: &RegistrationOutcome) -> HarnessResult<()> {
    let json = response.json().map_err(|e| SchemaMismatch {
        shape: "JSON".to_string(),
        message: e.to_string(),
    })?;

    let mismatches: Vec<_> = outcome
        .fields()
        .into_iter()
        .filter_map(|(key, typed)| match JsonPath::field(key).select(json) {
            Some(Value::String(ref raw)) if raw == typed => None,
            other => Some(Mismatch::new(
                format!("json '{key}'"),
                format!("\"{typed}\" (typed model)"),
                other.map_or_else(|| "<missing>".to_string(), |v| v.to_string()),
            )),
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(AssertionFailure {
            context: "registration cross-check".to_string(),
            mismatches,
        }
        .into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::error::HarnessError;

    const SUCCESS: &str =
        r#"{"SuccessCode": "OPERATION_SUCCESS", "Message": "Operation completed successfully"}"#;

    fn response(status: u16, body: &str) -> ResponseSpec {
        ResponseSpec::new(status, HashMap::new(), body.as_bytes().to_vec(), Duration::ZERO)
    }

    #[test]
    fn test_created_cross_checks_success_fields() {
        let outcome = cross_check_registration(&response(201, SUCCESS)).unwrap();
        assert!(outcome.is_success());
    }

    #[test]
    fn test_ok_cross_checks_failure_fields() {
        let outcome = cross_check_registration(&response(
            200,
            r#"{"FaultId": "User already exists", "fault": "FAULT_USER_ALREADY_EXISTS"}"#,
        ))
        .unwrap();
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_unexpected_status_is_assertion_failure() {
        let err = cross_check_registration(&response(500, "{}")).unwrap_err();
        let HarnessError::Assertion(failure) = err else {
            panic!("expected assertion failure, got {err:?}");
        };
        assert_eq!(failure.mismatches[0].field, "status");
        assert_eq!(failure.mismatches[0].actual, "500");
    }

    #[test]
    fn test_wrong_shape_is_schema_mismatch() {
        let err = cross_check_registration(&response(201, r#"{"FaultId": "x", "fault": "y"}"#))
            .unwrap_err();
        assert_eq!(err.kind(), "schema");
    }

    #[test]
    fn test_failure_shape_regardless_of_status() {
        let outcome = cross_check_registration_failure(&response(
            405,
            r#"{"FaultId": "FAULT_INVALID_METHOD", "fault": "Method not allowed"}"#,
        ))
        .unwrap();
        assert!(!outcome.is_success());
    }
}
