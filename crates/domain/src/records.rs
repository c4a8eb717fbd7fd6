//! Records that drive data-driven tests.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Input for one run of a data-driven test body.
pub trait CaseRecord: Debug {
    /// Short label distinguishing this record in reports.
    fn label(&self) -> String;
}

/// A season paired with the number of circuits it used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseRecord {
    /// Season year as it appears in the URL, e.g. `"2017"`.
    pub season: String,
    /// Expected number of circuits.
    pub expected_count: usize,
}

impl TestCaseRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(season: impl Into<String>, expected_count: usize) -> Self {
        Self {
            season: season.into(),
            expected_count,
        }
    }
}

impl CaseRecord for TestCaseRecord {
    fn label(&self) -> String {
        format!("season={}, expected={}", self.season, self.expected_count)
    }
}
