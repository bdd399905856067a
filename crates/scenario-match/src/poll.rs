//! Repeated comparison against a changing actual value.
//!
//! Systems under test often converge asynchronously. Polling fetches the
//! actual value again and again until it matches the expected template or a
//! timeout elapses, returning the last outcome.

use std::error::Error as StdError;
use std::thread;
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

use crate::document::{ContentType, Document};
use crate::error::{CompareError, Side};
use crate::report::ComparisonResult;
use crate::scenario::Scenario;

/// Default time allowed for the actual value to converge.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default pause between attempts.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Boxed error returned by an actual-value supplier.
pub type SupplierError = Box<dyn StdError + Send + Sync>;

/// How long and how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Time after which the last outcome is returned.
    pub timeout: Duration,
    /// Pause between attempts.
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl PollPolicy {
    /// Create a policy from a timeout and an interval.
    #[must_use]
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

/// Errors ending a poll without a comparison result.
#[derive(Debug, Error)]
pub enum PollError {
    /// The supplier was still failing when the timeout elapsed.
    #[error("actual value supplier failed after {attempts} attempts: {source}")]
    Supplier {
        /// Number of attempts made.
        attempts: usize,
        /// The last supplier error.
        #[source]
        source: SupplierError,
    },
    /// The comparison could not be carried out.
    #[error(transparent)]
    Compare(#[from] CompareError),
}

impl Scenario {
    /// Poll `supplier` until its text matches `expected` or the policy's
    /// timeout elapses.
    ///
    /// # Errors
    /// See [`Scenario::poll`].
    pub fn poll_text<F, E>(
        &mut self,
        expected: impl Into<Document>,
        policy: &PollPolicy,
        supplier: F,
    ) -> Result<ComparisonResult, PollError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<SupplierError>,
    {
        self.poll(ContentType::Text, expected, policy, supplier)
    }

    /// Poll `supplier` until its JSON text matches `expected` or the policy's
    /// timeout elapses.
    ///
    /// # Errors
    /// See [`Scenario::poll`].
    pub fn poll_json<F, E>(
        &mut self,
        expected: impl Into<Document>,
        policy: &PollPolicy,
        supplier: F,
    ) -> Result<ComparisonResult, PollError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<SupplierError>,
    {
        self.poll(ContentType::Json, expected, policy, supplier)
    }

    /// Poll `supplier` until its value matches `expected` or the policy's
    /// timeout elapses.
    ///
    /// At least one attempt is always made. A passing comparison commits its
    /// captures like [`Scenario::compare`]; after the timeout the last
    /// mismatching result is returned.
    ///
    /// # Errors
    /// Returns [`PollError::Supplier`] when the last attempt's supplier
    /// failed, and [`PollError::Compare`] when the expected template is
    /// invalid or the last actual value was malformed JSON. Supplier failures
    /// and malformed actual values are retried until the timeout.
    pub fn poll<F, E>(
        &mut self,
        content_type: ContentType,
        expected: impl Into<Document>,
        policy: &PollPolicy,
        mut supplier: F,
    ) -> Result<ComparisonResult, PollError>
    where
        F: FnMut() -> Result<String, E>,
        E: Into<SupplierError>,
    {
        let expected = expected.into();
        let started = Instant::now();
        let mut attempts = 0_usize;
        loop {
            attempts += 1;
            let outcome = match supplier() {
                Ok(actual) => match self.compare(content_type, expected.clone(), actual) {
                    Ok(result) if result.is_match() => return Ok(result),
                    Ok(result) => Ok(result),
                    Err(
                        err @ CompareError::MalformedDocument {
                            side: Side::Actual, ..
                        },
                    ) => Err(PollError::Compare(err)),
                    Err(err) => return Err(err.into()),
                },
                Err(err) => Err(PollError::Supplier {
                    attempts,
                    source: err.into(),
                }),
            };

            let elapsed = started.elapsed();
            if elapsed >= policy.timeout {
                debug!("giving up after {attempts} attempts in {elapsed:?}");
                return outcome;
            }
            match &outcome {
                Ok(result) => debug!("attempt {attempts}: {result}"),
                Err(err) => debug!("attempt {attempts}: {err}"),
            }
            thread::sleep(policy.interval.min(policy.timeout.saturating_sub(elapsed)));
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;
    use crate::config::CompareConfig;
    use rstest::{fixture, rstest};

    #[fixture]
    fn quick() -> PollPolicy {
        PollPolicy::new(Duration::from_secs(5), Duration::from_millis(1))
    }

    #[fixture]
    fn once() -> PollPolicy {
        PollPolicy::new(Duration::ZERO, Duration::from_millis(1))
    }

    #[test]
    fn default_policy_waits_thirty_seconds() {
        let policy = PollPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.interval, Duration::from_secs(1));
    }

    #[rstest]
    fn returns_first_matching_value(quick: PollPolicy) {
        let mut scenario = Scenario::new(CompareConfig::default());
        let mut values = vec!["done 42", "pending", "pending"];
        let mut calls = 0;
        let result = scenario
            .poll_text("done ~[n]", &quick, || {
                calls += 1;
                values.pop().map(str::to_owned).ok_or("exhausted")
            })
            .unwrap();
        assert!(result.is_match());
        assert_eq!(calls, 3);
        assert_eq!(scenario.symbols().get("n"), Some("42"));
    }

    #[rstest]
    fn retries_supplier_errors(quick: PollPolicy) {
        let mut scenario = Scenario::new(CompareConfig::default());
        let mut failures = 2;
        let result = scenario
            .poll_json(r#"{"state": "ready"}"#, &quick, || {
                if failures > 0 {
                    failures -= 1;
                    return Err("connection refused");
                }
                Ok(r#"{"state": "ready", "extra": true}"#.to_owned())
            })
            .unwrap();
        assert!(result.is_match());
    }

    #[rstest]
    fn timeout_returns_last_mismatch(once: PollPolicy) {
        let mut scenario = Scenario::new(CompareConfig::default());
        let result = scenario
            .poll_text("ready", &once, || Ok::<_, String>("pending".to_owned()))
            .unwrap();
        assert!(!result.is_match());
        assert_eq!(result.mismatches().len(), 1);
    }

    #[rstest]
    fn timeout_surfaces_supplier_error(once: PollPolicy) {
        let mut scenario = Scenario::new(CompareConfig::default());
        let err = scenario
            .poll_text("ready", &once, || Err::<String, _>("unreachable host"))
            .unwrap_err();
        assert!(matches!(err, PollError::Supplier { attempts: 1, .. }));
        assert!(err.to_string().contains("unreachable host"));
    }

    #[rstest]
    fn malformed_expected_document_fails_immediately(quick: PollPolicy) {
        let mut scenario = Scenario::new(CompareConfig::default());
        let mut calls = 0;
        let err = scenario
            .poll_json("{", &quick, || {
                calls += 1;
                Ok::<_, String>("{}".to_owned())
            })
            .unwrap_err();
        assert!(matches!(
            err,
            PollError::Compare(CompareError::MalformedDocument {
                side: Side::Expected,
                ..
            })
        ));
        assert_eq!(calls, 1);
    }

    #[rstest]
    fn malformed_actual_document_is_retried(quick: PollPolicy) {
        let mut scenario = Scenario::new(CompareConfig::default());
        let mut values = vec!["[1]", "not json"];
        let result = scenario
            .poll_json("[1]", &quick, || values.pop().map(str::to_owned).ok_or("exhausted"))
            .unwrap();
        assert!(result.is_match());
    }
}
