//! Test runner implementation.
//!
//! Executes assertions against HTTP responses and produces test results.

use std::time::Instant;

use mime::Mime;
use regex::Regex;
use restcheck_domain::response::ResponseSpec;
use restcheck_domain::testing::{
    Assertion, AssertionFailure, AssertionResult, Matcher, ResponseExpectation, StatusExpectation,
    TestResults,
};
use restcheck_domain::JsonPath;
use serde_json::Value;
use tracing::debug;

/// Longest body excerpt quoted in a failure.
const PREVIEW_LEN: usize = 100;

/// Test runner that executes assertions against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestRunner {
    /// Whether to stop on first failure.
    stop_on_failure: bool,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop_on_failure: false,
        }
    }

    /// Set whether to stop on first failure.
    #[must_use]
    pub const fn with_stop_on_failure(mut self, stop: bool) -> Self {
        self.stop_on_failure = stop;
        self
    }

    /// Run every assertion of an expectation against a response.
    #[must_use]
    pub fn run(&self, expectation: &ResponseExpectation, response: &ResponseSpec) -> TestResults {
        let start = Instant::now();
        let mut results = Vec::with_capacity(expectation.assertions.len());

        for assertion in &expectation.assertions {
            let result = self.run_assertion(assertion, response);
            let failed = !result.passed;
            results.push(result);

            if failed && (self.stop_on_failure || expectation.stop_on_failure) {
                break;
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let results = TestResults::new(&expectation.name, results, duration_ms);
        debug!(
            expectation = %expectation.name,
            passed = results.passed,
            failed = results.failed,
            "expectation checked"
        );
        results
    }

    /// Runs an expectation and turns any failed assertion into an error.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] listing field, expected and actual
    /// value for every failed assertion.
    pub fn verify(
        &self,
        expectation: &ResponseExpectation,
        response: &ResponseSpec,
    ) -> Result<TestResults, AssertionFailure> {
        self.run(expectation, response).into_result()
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => check_status_code(assertion, response, expected),
            Assertion::ContentType { expected } => {
                check_content_type(assertion, response, expected)
            }
            Assertion::HeaderExists { name, value } => {
                check_header(assertion, response, name, value.as_deref())
            }
            Assertion::BodyContains { text, ignore_case } => {
                check_body_contains(assertion, response, text, *ignore_case)
            }
            Assertion::JsonPath { path, matcher } => {
                check_json_path(assertion, response, path, matcher)
            }
        }
    }
}

fn check_status_code(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &StatusExpectation,
) -> AssertionResult {
    let actual = response.status();
    if expected.matches(actual) {
        AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual.to_string(),
            format!("Expected status {}, got {actual}", expected.description()),
        )
    }
}

fn check_content_type(
    assertion: &Assertion,
    response: &ResponseSpec,
    expected: &str,
) -> AssertionResult {
    let Some(actual) = response.header("content-type") else {
        return AssertionResult::fail(assertion.clone(), "Content-Type header not found");
    };

    let expected_mime = match expected.parse::<Mime>() {
        Ok(mime) => mime,
        Err(e) => {
            return AssertionResult::fail(
                assertion.clone(),
                format!("Invalid expected media type '{expected}': {e}"),
            );
        }
    };

    // Parameters such as charset are ignored on both sides.
    let matches = actual
        .parse::<Mime>()
        .is_ok_and(|mime| mime.essence_str() == expected_mime.essence_str());

    if matches {
        AssertionResult::pass_with_value(assertion.clone(), actual)
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            actual,
            format!("Content-Type '{actual}' is not '{expected}'"),
        )
    }
}

fn check_header(
    assertion: &Assertion,
    response: &ResponseSpec,
    name: &str,
    expected_value: Option<&str>,
) -> AssertionResult {
    match (response.header(name), expected_value) {
        (None, _) => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
        (Some(actual), Some(expected)) if actual != expected => AssertionResult::fail_with_value(
            assertion.clone(),
            actual,
            format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
        ),
        (Some(actual), _) => AssertionResult::pass_with_value(assertion.clone(), actual),
    }
}

fn check_body_contains(
    assertion: &Assertion,
    response: &ResponseSpec,
    text: &str,
    ignore_case: bool,
) -> AssertionResult {
    let body = response.body();
    let contains = if ignore_case {
        body.to_lowercase().contains(&text.to_lowercase())
    } else {
        body.contains(text)
    };

    if contains {
        AssertionResult::pass_with_value(assertion.clone(), format!("contains '{text}'"))
    } else {
        AssertionResult::fail_with_value(
            assertion.clone(),
            preview(body),
            format!("Body does not contain '{text}'"),
        )
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > PREVIEW_LEN {
        format!("{}...", body.chars().take(PREVIEW_LEN).collect::<String>())
    } else {
        body.to_string()
    }
}

fn check_json_path(
    assertion: &Assertion,
    response: &ResponseSpec,
    path: &str,
    matcher: &Matcher,
) -> AssertionResult {
    let json_path = match JsonPath::parse(path) {
        Ok(json_path) => json_path,
        Err(e) => return AssertionResult::fail(assertion.clone(), e.to_string()),
    };

    let value = match response.select(&json_path) {
        Ok(Some(value)) => value,
        Ok(None) => {
            let message = format!("JSON path '{path}' not found");
            return AssertionResult::fail(assertion.clone(), message);
        }
        Err(e) => {
            return AssertionResult::fail(
                assertion.clone(),
                format!("Failed to parse body as JSON: {e}"),
            );
        }
    };

    match matches(matcher, &value) {
        Ok(true) => AssertionResult::pass_with_value(assertion.clone(), value.to_string()),
        Ok(false) => AssertionResult::fail_with_value(
            assertion.clone(),
            actual_for(matcher, &value),
            format!("JSON path '{path}': {value} does not satisfy '{}'", matcher.description()),
        ),
        Err(e) => AssertionResult::fail_with_value(assertion.clone(), value.to_string(), e),
    }
}

/// For size checks the actual count is more telling than the collection.
fn actual_for(matcher: &Matcher, value: &Value) -> String {
    match (matcher, value) {
        (Matcher::HasSize(_), Value::Array(items)) => items.len().to_string(),
        (Matcher::HasSize(_), Value::Object(map)) => map.len().to_string(),
        _ => value.to_string(),
    }
}

fn matches(matcher: &Matcher, value: &Value) -> Result<bool, String> {
    match matcher {
        Matcher::Exists => Ok(true),
        Matcher::Equals(expected) => Ok(value == expected),
        Matcher::Contains(text) => as_text(value).map(|s| s.contains(text.as_str())),
        Matcher::EndsWith(suffix) => as_text(value).map(|s| s.ends_with(suffix.as_str())),
        Matcher::HasSize(size) => match value {
            Value::Array(items) => Ok(items.len() == *size),
            Value::Object(map) => Ok(map.len() == *size),
            other => Err(format!("{other} has no size")),
        },
        Matcher::Matches(pattern) => {
            let regex = Regex::new(pattern)
                .map_err(|e| format!("Invalid regex pattern '{pattern}': {e}"))?;
            as_text(value).map(|s| regex.is_match(s))
        }
    }
}

fn as_text(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("{value} is not a string"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::time::Duration;

    fn create_response(status: u16, body: &str, headers: HashMap<String, String>) -> ResponseSpec {
        ResponseSpec::new(status, headers, body.as_bytes().to_vec(), Duration::from_millis(50))
    }

    fn json_response(status: u16, body: &str) -> ResponseSpec {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        create_response(status, body, headers)
    }

    const WEATHER: &str = r#"{
        "City": "Hyderabad",
        "Temperature": "28.2 Degree celsius",
        "Humidity": "64 Percent",
        "WeatherDescription": "haze"
    }"#;

    const CIRCUITS: &str = r#"{"MRData": {"CircuitTable": {"season": "2017", "Circuits": [
        {"circuitId": "albert_park", "Location": {"country": "Australia"}},
        {"circuitId": "bahrain", "Location": {"country": "Bahrain"}}
    ]}}}"#;

    #[test]
    fn test_status_code_exact() {
        let runner = TestRunner::new();
        let response = create_response(200, "", HashMap::new());

        assert!(runner.run_assertion(&Assertion::status(200), &response).passed);

        let result = runner.run_assertion(&Assertion::status(201), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("200"));
    }

    #[test]
    fn test_status_code_one_of() {
        let runner = TestRunner::new();
        let assertion = Assertion::StatusCode {
            expected: StatusExpectation::OneOf(vec![200, 405]),
        };

        let allowed = create_response(405, "", HashMap::new());
        let failed = create_response(500, "", HashMap::new());
        assert!(runner.run_assertion(&assertion, &allowed).passed);
        assert!(!runner.run_assertion(&assertion, &failed).passed);
    }

    #[test]
    fn test_content_type_ignores_parameters() {
        let runner = TestRunner::new();
        let response = json_response(200, "{}");

        let json = Assertion::content_type("application/json");
        assert!(runner.run_assertion(&json, &response).passed);
        assert!(!runner.run_assertion(&Assertion::content_type("text/html"), &response).passed);
    }

    #[test]
    fn test_missing_content_type() {
        let runner = TestRunner::new();
        let result = runner.run_assertion(
            &Assertion::content_type("application/json"),
            &create_response(200, "{}", HashMap::new()),
        );
        assert!(!result.passed);
    }

    #[test]
    fn test_header_value() {
        let runner = TestRunner::new();
        let mut headers = HashMap::new();
        headers.insert("Content-Length".to_string(), "4551".to_string());
        let response = create_response(200, "", headers);

        let length = Assertion::header("content-length", "4551");
        assert!(runner.run_assertion(&length, &response).passed);

        let result = runner.run_assertion(&Assertion::header("Content-Length", "100"), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("4551"));

        let missing = Assertion::HeaderExists {
            name: "X-Missing".to_string(),
            value: None,
        };
        assert!(!runner.run_assertion(&missing, &response).passed);
    }

    #[test]
    fn test_body_contains() {
        let runner = TestRunner::new();
        let response = json_response(200, WEATHER);

        assert!(runner.run_assertion(&Assertion::body_contains("Hyderabad"), &response).passed);
        assert!(!runner.run_assertion(&Assertion::body_contains("hyderabad"), &response).passed);

        let ignore_case = Assertion::BodyContains {
            text: "hyderabad".to_string(),
            ignore_case: true,
        };
        assert!(runner.run_assertion(&ignore_case, &response).passed);
    }

    #[test]
    fn test_json_equals_and_ends_with() {
        let runner = TestRunner::new();
        let response = json_response(200, WEATHER);

        let city = Assertion::json_equals("City", "Hyderabad");
        assert!(runner.run_assertion(&city, &response).passed);
        assert!(
            runner
                .run_assertion(
                    &Assertion::json_path("Humidity", Matcher::EndsWith("Percent".to_string())),
                    &response
                )
                .passed
        );
    }

    fn json_contains(path: &str, text: &str) -> Assertion {
        Assertion::json_path(path, Matcher::Contains(text.to_string()))
    }

    #[test]
    fn test_json_contains() {
        let runner = TestRunner::new();
        let response = json_response(200, WEATHER);

        assert!(runner.run_assertion(&json_contains("Temperature", "Degree"), &response).passed);

        let result = runner.run_assertion(&json_contains("Temperature", "Kelvin"), &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("\"28.2 Degree celsius\""));
    }

    #[test]
    fn test_json_contains_on_non_string_fails() {
        let runner = TestRunner::new();
        let response = json_response(200, CIRCUITS);

        let result = runner.run_assertion(
            &json_contains("MRData.CircuitTable.Circuits", "x"),
            &response,
        );
        assert!(!result.passed);
        assert!(result.error.as_deref().unwrap().contains("is not a string"));
    }

    #[test]
    fn test_json_has_size_reports_count() {
        let runner = TestRunner::new();
        let response = json_response(200, CIRCUITS);

        let ok = Assertion::json_has_size("MRData.CircuitTable.Circuits.circuitId", 2);
        assert!(runner.run_assertion(&ok, &response).passed);

        let wrong = Assertion::json_has_size("MRData.CircuitTable.Circuits.circuitId", 20);
        let result = runner.run_assertion(&wrong, &response);
        assert!(!result.passed);
        assert_eq!(result.actual.as_deref(), Some("2"));
    }

    #[test]
    fn test_json_path_not_found() {
        let runner = TestRunner::new();
        let result = runner.run_assertion(
            &Assertion::json_path("MRData.Missing", Matcher::Exists),
            &json_response(200, CIRCUITS),
        );
        assert!(!result.passed);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[test]
    fn test_json_path_on_non_json_body() {
        let runner = TestRunner::new();
        let result = runner.run_assertion(
            &Assertion::json_equals("City", "Hyderabad"),
            &create_response(200, "<html/>", HashMap::new()),
        );
        assert!(!result.passed);
    }

    #[test]
    fn test_matches_regex() {
        let runner = TestRunner::new();
        let response = json_response(200, r#"{"md5": "098f6bcd4621d373cade4e832627b4f6"}"#);

        let hex = Assertion::json_path("md5", Matcher::Matches("^[0-9a-f]{32}$".to_string()));
        assert!(runner.run_assertion(&hex, &response).passed);

        let invalid = Assertion::json_path("md5", Matcher::Matches("(".to_string()));
        assert!(!runner.run_assertion(&invalid, &response).passed);
    }

    #[test]
    fn test_verify_lists_every_mismatch() {
        let runner = TestRunner::new();
        let expectation = ResponseExpectation::ok_json()
            .with(Assertion::json_equals("City", "Hyderabad"))
            .with(Assertion::json_equals("WeatherDescription", "sunny"));

        let failure = runner
            .verify(&expectation, &json_response(404, WEATHER))
            .unwrap_err();

        assert_eq!(failure.context, "status 200 + JSON");
        assert_eq!(failure.mismatches.len(), 2);
        assert_eq!(failure.mismatches[0].field, "status");
        assert_eq!(failure.mismatches[0].actual, "404");
        assert_eq!(failure.mismatches[1].field, "json 'WeatherDescription'");
        assert_eq!(failure.mismatches[1].actual, "\"haze\"");
    }

    #[test]
    fn test_verify_passes() {
        let runner = TestRunner::new();
        let results = runner
            .verify(&ResponseExpectation::ok_json(), &json_response(200, WEATHER))
            .unwrap();
        assert_eq!(results.total, 2);
        assert!(results.all_passed());
    }

    #[test]
    fn test_stop_on_failure() {
        let runner = TestRunner::new().with_stop_on_failure(true);
        let expectation = ResponseExpectation::new("stops")
            .with(Assertion::status(500))
            .with(Assertion::status(200));

        let results = runner.run(&expectation, &json_response(200, "{}"));
        assert_eq!(results.total, 1);
        assert_eq!(results.failed, 1);
    }
}
