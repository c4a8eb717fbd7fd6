//! Response expectations and assertion results.
//!
//! An [`Assertion`] is one check against a response. A
//! [`ResponseExpectation`] bundles assertions so the same checks can be
//! attached to many tests; bundles compose with [`ResponseExpectation::and`].

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::request::APPLICATION_JSON;

/// A test assertion to run against a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check the media type of the `Content-Type` header.
    ContentType {
        /// Expected media type, e.g. `application/json`. Parameters such as
        /// `charset` are ignored on both sides.
        expected: String,
    },
    /// Check header exists and optionally its exact value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        value: Option<String>,
    },
    /// Check body contains text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        ignore_case: bool,
    },
    /// Select a value with a JSON path and match it.
    JsonPath {
        /// Path expression, see [`crate::JsonPath`].
        path: String,
        /// Condition the selected value must meet.
        matcher: Matcher,
    },
}

impl Assertion {
    /// Status equals `code`.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Content type media type equals `media_type`.
    #[must_use]
    pub fn content_type(media_type: impl Into<String>) -> Self {
        Self::ContentType {
            expected: media_type.into(),
        }
    }

    /// Header `name` equals `value`.
    #[must_use]
    pub fn header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::HeaderExists {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Body contains `text`, case-sensitive.
    #[must_use]
    pub fn body_contains(text: impl Into<String>) -> Self {
        Self::BodyContains {
            text: text.into(),
            ignore_case: false,
        }
    }

    /// JSON value at `path` satisfies `matcher`.
    #[must_use]
    pub fn json_path(path: impl Into<String>, matcher: Matcher) -> Self {
        Self::JsonPath {
            path: path.into(),
            matcher,
        }
    }

    /// JSON value at `path` equals `expected`.
    #[must_use]
    pub fn json_equals(path: impl Into<String>, expected: impl Into<Value>) -> Self {
        Self::json_path(path, Matcher::Equals(expected.into()))
    }

    /// JSON collection at `path` has exactly `size` elements.
    #[must_use]
    pub fn json_has_size(path: impl Into<String>, size: usize) -> Self {
        Self::json_path(path, Matcher::HasSize(size))
    }

    /// The field this assertion inspects, for failure messages.
    #[must_use]
    pub fn field(&self) -> String {
        match self {
            Self::StatusCode { .. } => "status".to_string(),
            Self::ContentType { .. } => "Content-Type".to_string(),
            Self::HeaderExists { name, .. } => format!("header '{name}'"),
            Self::BodyContains { .. } => "body".to_string(),
            Self::JsonPath { path, .. } => format!("json '{path}'"),
        }
    }

    /// What the assertion expects, for failure messages.
    #[must_use]
    pub fn expected(&self) -> String {
        match self {
            Self::StatusCode { expected } => expected.description(),
            Self::ContentType { expected } => expected.clone(),
            Self::HeaderExists { value: Some(v), .. } => format!("'{v}'"),
            Self::HeaderExists { value: None, .. } => "present".to_string(),
            Self::BodyContains { text, ignore_case } => {
                if *ignore_case {
                    format!("contains '{text}' (ignoring case)")
                } else {
                    format!("contains '{text}'")
                }
            }
            Self::JsonPath { matcher, .. } => matcher.description(),
        }
    }

    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ContentType { expected } => format!("Content-Type is '{expected}'"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("Header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("Header '{name}' exists"),
            Self::BodyContains { text, .. } => format!("Body contains '{text}'"),
            Self::JsonPath { path, matcher } => format!("JSON {path} {}", matcher.description()),
        }
    }
}

/// Condition on a value selected by a JSON path.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// The path selects something.
    Exists,
    /// Exact JSON equality.
    Equals(Value),
    /// String value contains the text.
    Contains(String),
    /// String value ends with the text.
    EndsWith(String),
    /// Array (or object) has exactly this many elements.
    HasSize(usize),
    /// String value matches the regex.
    Matches(String),
}

impl Matcher {
    /// Get description of the condition.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exists => "exists".to_string(),
            Self::Equals(value) => format!("== {value}"),
            Self::Contains(text) => format!("contains '{text}'"),
            Self::EndsWith(text) => format!("ends with '{text}'"),
            Self::HasSize(size) => format!("has size {size}"),
            Self::Matches(pattern) => format!("matches /{pattern}/"),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            assertion,
            passed: false,
            actual: Some(actual.into()),
            error: Some(error.into()),
        }
    }

    /// The mismatch this result describes, if it failed.
    #[must_use]
    pub fn mismatch(&self) -> Option<Mismatch> {
        if self.passed {
            return None;
        }
        let actual = match (&self.actual, &self.error) {
            (Some(actual), _) => actual.clone(),
            (None, Some(error)) => format!("<{error}>"),
            (None, None) => "<missing>".to_string(),
        };
        Some(Mismatch::new(
            self.assertion.field(),
            self.assertion.expected(),
            actual,
        ))
    }
}

/// One field whose actual value did not meet its expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The inspected field, e.g. `status` or `json 'md5'`.
    pub field: String,
    /// What was expected.
    pub expected: String,
    /// What was found.
    pub actual: String,
}

impl Mismatch {
    /// Creates a mismatch record.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: expected {}, actual {}",
            self.field, self.expected, self.actual
        )
    }
}

/// A response did not meet its expectations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{context} failed: {}", render(.mismatches))]
pub struct AssertionFailure {
    /// Which expectation or check failed.
    pub context: String,
    /// Every mismatched field, in assertion order.
    pub mismatches: Vec<Mismatch>,
}

fn render(mismatches: &[Mismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AssertionFailure {
    /// Creates a failure with a single mismatch.
    #[must_use]
    pub fn single(context: impl Into<String>, mismatch: Mismatch) -> Self {
        Self {
            context: context.into(),
            mismatches: vec![mismatch],
        }
    }
}

/// A reusable, composable set of assertions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseExpectation {
    /// Name used in reports.
    pub name: String,
    /// Assertions to run, in order.
    pub assertions: Vec<Assertion>,
    /// Whether to stop on first failure.
    pub stop_on_failure: bool,
}

impl ResponseExpectation {
    /// Create a new empty expectation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assertions: Vec::new(),
            stop_on_failure: false,
        }
    }

    /// Status 200 with a JSON content type.
    #[must_use]
    pub fn ok_json() -> Self {
        Self::new("status 200 + JSON")
            .with(Assertion::status(200))
            .with(Assertion::content_type(APPLICATION_JSON))
    }

    /// Add an assertion (builder pattern).
    #[must_use]
    pub fn with(mut self, assertion: Assertion) -> Self {
        self.assertions.push(assertion);
        self
    }

    /// Combines two expectations; `other`'s assertions run after these.
    #[must_use]
    pub fn and(mut self, other: &Self) -> Self {
        self.name = format!("{} + {}", self.name, other.name);
        self.assertions.extend(other.assertions.iter().cloned());
        self.stop_on_failure |= other.stop_on_failure;
        self
    }

    /// Check if the expectation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assertions.is_empty()
    }

    /// Get the number of assertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assertions.len()
    }
}

/// Results from checking one expectation.
#[derive(Debug, Clone)]
pub struct TestResults {
    /// Expectation that was checked.
    pub suite_name: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        results: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();

        Self {
            suite_name: suite_name.into(),
            results,
            total,
            passed,
            failed: total - passed,
            duration_ms,
        }
    }

    /// Check if all tests passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Collects every failed assertion into one failure.
    #[must_use]
    pub fn failure(&self) -> Option<AssertionFailure> {
        let mismatches: Vec<_> = self
            .results
            .iter()
            .filter_map(AssertionResult::mismatch)
            .collect();
        if mismatches.is_empty() {
            None
        } else {
            Some(AssertionFailure {
                context: self.suite_name.clone(),
                mismatches,
            })
        }
    }

    /// Returns the results, or the failure if any assertion failed.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] listing every mismatch.
    pub fn into_result(self) -> Result<Self, AssertionFailure> {
        match self.failure() {
            Some(failure) => Err(failure),
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_expectation_exact() {
        let exp = StatusExpectation::Exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn test_status_expectation_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn test_status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 405]);
        assert!(exp.matches(405));
        assert!(!exp.matches(201));
        assert_eq!(exp.description(), "in [200, 405]");
    }

    #[test]
    fn test_assertion_description() {
        assert_eq!(Assertion::status(200).description(), "Status code = 200");
        assert_eq!(
            Assertion::json_has_size("MRData.CircuitTable.Circuits.circuitId", 20).description(),
            "JSON MRData.CircuitTable.Circuits.circuitId has size 20"
        );
    }

    #[test]
    fn test_ok_json_bundle() {
        let bundle = ResponseExpectation::ok_json();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.assertions[0], Assertion::status(200));
    }

    #[test]
    fn test_bundles_compose() {
        let count = ResponseExpectation::new("20 circuits")
            .with(Assertion::json_has_size("MRData.CircuitTable.Circuits.circuitId", 20));
        let combined = ResponseExpectation::ok_json().and(&count);

        assert_eq!(combined.len(), 3);
        assert_eq!(combined.name, "status 200 + JSON + 20 circuits");
        // The shared bundle is untouched.
        assert_eq!(ResponseExpectation::ok_json().len(), 2);
    }

    #[test]
    fn test_failure_names_field_expected_and_actual() {
        let results = vec![
            AssertionResult::pass_with_value(Assertion::status(200), "200"),
            AssertionResult::fail_with_value(
                Assertion::json_equals("md5", "098f6bcd4621d373cade4e832627b4f6"),
                "\"nope\"",
                "value mismatch",
            ),
        ];

        let failure = TestResults::new("md5", results, 3).into_result().unwrap_err();
        assert_eq!(
            failure.mismatches,
            vec![Mismatch::new(
                "json 'md5'",
                "== \"098f6bcd4621d373cade4e832627b4f6\"",
                "\"nope\""
            )]
        );
        assert_eq!(
            failure.to_string(),
            concat!(
                "md5 failed: json 'md5': ",
                "expected == \"098f6bcd4621d373cade4e832627b4f6\", actual \"nope\""
            )
        );
    }

    #[test]
    fn test_failure_without_actual_value() {
        let result =
            AssertionResult::fail(Assertion::header("Content-Length", "4551"), "not found");
        assert_eq!(
            result.mismatch(),
            Some(Mismatch::new("header 'Content-Length'", "'4551'", "<not found>"))
        );
    }
}
