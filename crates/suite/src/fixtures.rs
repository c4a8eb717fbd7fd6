//! Shared test data.

use restcheck_domain::{Assertion, RegistrationRequest, ResponseExpectation, TestCaseRecord};
use uuid::Uuid;

/// JSON path listing every circuit id of a season.
pub const CIRCUIT_IDS: &str = "MRData.CircuitTable.Circuits.circuitId";

/// Seasons paired with the number of circuits raced that year.
#[must_use]
pub fn season_records() -> Vec<TestCaseRecord> {
    vec![
        TestCaseRecord::new("2017", 20),
        TestCaseRecord::new("2016", 21),
        TestCaseRecord::new("1966", 9),
    ]
}

/// The season lists exactly `count` circuits.
#[must_use]
pub fn circuit_count(count: usize) -> ResponseExpectation {
    ResponseExpectation::new(format!("circuit count == {count}"))
        .with(Assertion::json_has_size(CIRCUIT_IDS, count))
}

/// A customer whose user name and email have not been used before.
#[must_use]
pub fn unique_customer() -> RegistrationRequest {
    let id = Uuid::now_v7().simple().to_string();
    RegistrationRequest {
        first_name: "Rest".to_string(),
        last_name: "Check".to_string(),
        user_name: format!("restcheck_{id}"),
        password: format!("Pw-{id}"),
        email: format!("restcheck_{id}@example.com"),
    }
}
