//! Strongly-typed deserialization of response bodies.

use serde::de::DeserializeOwned;
use thiserror::Error;

/// The body could not be read as the expected shape.
///
/// Kept apart from value mismatches: this means "wrong shape", not "wrong value".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("body does not match shape {shape}: {message}")]
pub struct SchemaMismatch {
    /// Short type name of the expected shape.
    pub shape: String,
    /// Deserializer message, naming the missing or mistyped field.
    pub message: String,
}

/// Deserializes `body` into `T`.
///
/// # Errors
///
/// Returns [`SchemaMismatch`] if a required field is missing or has the
/// wrong type, or the body is not JSON at all.
pub fn parse<T: DeserializeOwned>(body: &str) -> Result<T, SchemaMismatch> {
    serde_json::from_str(body).map_err(|e| SchemaMismatch {
        shape: short_type_name::<T>().to_string(),
        message: e.to_string(),
    })
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RegistrationSuccessResponse;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_success() {
        let body = r#"{"SuccessCode": "OPERATION_SUCCESS", "Message": "Operation completed"}"#;
        let parsed: RegistrationSuccessResponse = parse(body).unwrap();
        assert_eq!(parsed.success_code, "OPERATION_SUCCESS");
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let err = parse::<RegistrationSuccessResponse>(r#"{"SuccessCode": "OPERATION_SUCCESS"}"#)
            .unwrap_err();
        assert_eq!(err.shape, "RegistrationSuccessResponse");
        assert!(err.message.contains("Message"));
    }

    #[test]
    fn test_wrong_type_is_schema_mismatch() {
        let err = parse::<RegistrationSuccessResponse>(r#"{"SuccessCode": 1, "Message": "x"}"#)
            .unwrap_err();
        assert!(err.message.contains("invalid type"));
    }
}
