//! Errors surfaced by comparisons.

use std::fmt;

use scenario_match_patterns::PatternError;
use thiserror::Error;

use crate::report::{MismatchReport, display_path};

/// Which side of a comparison a failure concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The expected template document.
    Expected,
    /// The actual value produced by the system under test.
    Actual,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Expected => "expected",
            Self::Actual => "actual",
        })
    }
}

/// Failures that abort a comparison call.
///
/// Differences between documents are data, collected in a
/// [`ComparisonResult`](crate::ComparisonResult); they only become an error
/// through [`ComparisonResult::into_result`](crate::ComparisonResult::into_result)
/// for assert-style callers.
#[derive(Debug, Error)]
pub enum CompareError {
    /// JSON comparison was requested but one side is not valid JSON.
    #[error("malformed {side} JSON document: {source}")]
    MalformedDocument {
        /// The side that failed to parse.
        side: Side,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A template could not be synthesized or compiled.
    #[error("invalid template at {}: {source}", display_path(.path))]
    Pattern {
        /// Location of the template inside the expected document.
        path: String,
        /// The underlying pattern error.
        #[source]
        source: PatternError,
    },
    /// The documents differ.
    #[error("{0}")]
    Mismatch(MismatchReport),
}
