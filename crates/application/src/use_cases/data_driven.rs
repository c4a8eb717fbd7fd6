//! Data-driven runs
//!
//! Runs one test body once per record. Every case runs in its own task
//! under a time bound, so a failing, hanging or panicking case is reported
//! and the remaining records still run.

use std::any::Any;
use std::future::Future;
use std::time::{Duration, Instant};

use restcheck_domain::{AssertionFailure, CaseRecord, Mismatch};
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Result of a single data-driven case.
#[derive(Debug)]
pub struct CaseOutcome {
    /// `suite[index: label]`
    pub name: String,
    /// What the test body returned.
    pub result: HarnessResult<()>,
    /// Wall time spent on the case.
    pub duration: Duration,
}

impl CaseOutcome {
    /// Returns true when the body returned `Ok`.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a data-driven run, in record order.
#[derive(Debug)]
pub struct DataDrivenReport {
    /// Suite name.
    pub suite: String,
    /// One outcome per record.
    pub outcomes: Vec<CaseOutcome>,
}

impl DataDrivenReport {
    /// Number of passing cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Number of failing cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// Returns true if every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(CaseOutcome::passed)
    }

    /// Turns the report into a single pass/fail result.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] with one mismatch per failed case.
    pub fn ensure_all_passed(&self) -> Result<(), AssertionFailure> {
        let mismatches: Vec<_> = self
            .outcomes
            .iter()
            .filter_map(|outcome| {
                outcome.result.as_ref().err().map(|e| {
                    Mismatch::new(outcome.name.clone(), "pass", format!("{} ({})", e, e.kind()))
                })
            })
            .collect();

        if mismatches.is_empty() {
            Ok(())
        } else {
            let total = self.outcomes.len();
            Err(AssertionFailure {
                context: format!("{} ({} of {total} cases)", self.suite, mismatches.len()),
                mismatches,
            })
        }
    }
}

/// Runs a test body once per record.
#[derive(Debug, Clone)]
pub struct DataDrivenRunner {
    suite: String,
    case_timeout: Duration,
}

impl DataDrivenRunner {
    /// Creates a runner; each case gets at most `case_timeout`.
    #[must_use]
    pub fn new(suite: impl Into<String>, case_timeout: Duration) -> Self {
        Self {
            suite: suite.into(),
            case_timeout,
        }
    }

    /// Display name of the case for `record` at `index`.
    #[must_use]
    pub fn case_name<R: CaseRecord>(&self, index: usize, record: &R) -> String {
        format!("{}[{}: {}]", self.suite, index, record.label())
    }

    /// Runs `body` for every record, one after another, in order.
    ///
    /// A case that returns an error, exceeds the time bound or panics is
    /// recorded as failed; the run always continues with the next record.
    pub async fn for_each<R, F, Fut>(&self, records: &[R], mut body: F) -> DataDrivenReport
    where
        R: CaseRecord + Clone,
        F: FnMut(R) -> Fut,
        Fut: Future<Output = HarnessResult<()>> + Send + 'static,
    {
        let mut outcomes = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let name = self.case_name(index, record);
            let started = Instant::now();

            let mut handle = tokio::spawn(body(record.clone()));
            let result = match tokio::time::timeout(self.case_timeout, &mut handle).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => Err(from_join_error(&name, join_error)),
                Err(_) => {
                    handle.abort();
                    Err(HarnessError::Timeout {
                        case: name.clone(),
                        timeout_ms: u64::try_from(self.case_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    })
                }
            };

            let duration = started.elapsed();
            match &result {
                Ok(()) => info!(case = %name, elapsed_ms = duration.as_millis(), "case passed"),
                Err(e) => warn!(case = %name, kind = e.kind(), error = %e, "case failed"),
            }

            outcomes.push(CaseOutcome {
                name,
                result,
                duration,
            });
        }

        let report = DataDrivenReport {
            suite: self.suite.clone(),
            outcomes,
        };
        info!(
            suite = %report.suite,
            passed = report.passed(),
            failed = report.failed(),
            "data-driven run finished"
        );
        report
    }
}

fn from_join_error(case: &str, error: JoinError) -> HarnessError {
    let message = match error.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(error) => error.to_string(),
    };
    HarnessError::Panicked {
        case: case.to_string(),
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::{Arc, Mutex};

    use restcheck_domain::TestCaseRecord;

    use super::*;

    fn seasons() -> Vec<TestCaseRecord> {
        vec![
            TestCaseRecord::new("2017", 20),
            TestCaseRecord::new("2016", 21),
            TestCaseRecord::new("1966", 9),
        ]
    }

    fn count_mismatch(record: &TestCaseRecord, actual: usize) -> HarnessError {
        AssertionFailure::single(
            "circuits",
            Mismatch::new(
                "MRData.CircuitTable.Circuits.circuitId",
                record.expected_count.to_string(),
                actual.to_string(),
            ),
        )
        .into()
    }

    #[tokio::test]
    async fn test_failing_case_does_not_stop_the_others() {
        let runner = DataDrivenRunner::new("circuits", Duration::from_secs(5));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let records = [
            TestCaseRecord::new("1966", 9),
            TestCaseRecord::new("2017", 20),
            TestCaseRecord::new("2016", 21),
        ];
        let report = runner
            .for_each(&records, |record| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(record.season.clone());
                    if record.season == "1966" {
                        Err(count_mismatch(&record, 8))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;

        assert_eq!(*seen.lock().unwrap(), vec!["1966", "2017", "2016"]);
        assert_eq!(report.passed(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.outcomes[0].passed());
        assert_eq!(report.outcomes[0].name, "circuits[0: season=1966, expected=9]");

        let failure = report.ensure_all_passed().unwrap_err();
        assert_eq!(failure.mismatches.len(), 1);
        assert_eq!(failure.mismatches[0].field, "circuits[0: season=1966, expected=9]");
    }

    #[tokio::test]
    async fn test_all_cases_pass() {
        let runner = DataDrivenRunner::new("circuits", Duration::from_secs(5));
        let report = runner.for_each(&seasons(), |_| async { Ok(()) }).await;

        assert!(report.all_passed());
        assert_eq!(report.outcomes.len(), 3);
        assert!(report.ensure_all_passed().is_ok());
    }

    #[tokio::test]
    async fn test_hanging_case_times_out() {
        let runner = DataDrivenRunner::new("circuits", Duration::from_millis(50));
        let report = runner
            .for_each(&seasons(), |record| async move {
                if record.season == "2016" {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                Ok(())
            })
            .await;

        assert_eq!(report.passed(), 2);
        assert!(matches!(
            report.outcomes[1].result,
            Err(HarnessError::Timeout { timeout_ms: 50, .. })
        ));
    }

    #[tokio::test]
    async fn test_panicking_case_is_isolated() {
        let runner = DataDrivenRunner::new("circuits", Duration::from_secs(5));
        let report = runner
            .for_each(&seasons(), |record| async move {
                if record.season == "2017" {
                    panic!("boom");
                }
                Ok(())
            })
            .await;

        assert_eq!(report.passed(), 2);
        match &report.outcomes[0].result {
            Err(HarnessError::Panicked { message, .. }) => assert_eq!(message, "boom"),
            other => panic!("expected panic outcome, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_records() {
        let runner = DataDrivenRunner::new("empty", Duration::from_secs(1));
        let report = runner
            .for_each(&Vec::<TestCaseRecord>::new(), |_| async { Ok(()) })
            .await;
        assert!(report.all_passed());
        assert_eq!(report.failed(), 0);
    }
}
