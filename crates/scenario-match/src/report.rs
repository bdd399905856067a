//! Comparison outcomes and mismatch reports.
//!
//! Paths are RFC 6901 JSON pointers into the expected document; the root is
//! the empty pointer, shown as `<root>` in human-readable reports.

use std::fmt;

use serde::Serialize;

use crate::error::CompareError;
use crate::symbols::SymbolTable;

/// Append an object key to a JSON pointer.
pub(crate) fn child_key(path: &str, key: &str) -> String {
    let escaped = key.replace('~', "~0").replace('/', "~1");
    format!("{path}/{escaped}")
}

/// Append an array index to a JSON pointer.
pub(crate) fn child_index(path: &str, index: usize) -> String {
    format!("{path}/{index}")
}

/// Render a JSON pointer for humans, naming the root explicitly.
pub(crate) fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

/// Category of a single difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// Scalar values differ.
    Value,
    /// The two sides hold different JSON types.
    Type,
    /// An expected field has no counterpart in the actual object.
    MissingField,
    /// The actual object carries a field the expected one does not name.
    UnexpectedField,
    /// Arrays differ in length.
    Length,
}

impl MismatchKind {
    /// Lowercase label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::Type => "type",
            Self::MissingField => "missing field",
            Self::UnexpectedField => "unexpected field",
            Self::Length => "length",
        }
    }
}

/// One path-qualified difference between expected and actual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    /// JSON pointer of the offending node.
    pub path: String,
    /// What kind of difference was found.
    pub kind: MismatchKind,
    /// Expected side, rendered as text.
    pub expected: String,
    /// Actual side, rendered as text.
    pub actual: String,
}

impl Mismatch {
    pub(crate) fn new(
        path: &str,
        kind: MismatchKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.to_owned(),
            kind,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} mismatch at {}: expected `{}`, actual `{}`",
            self.kind.label(),
            display_path(&self.path),
            self.expected,
            self.actual
        )
    }
}

/// The complete list of differences from one failed comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MismatchReport {
    mismatches: Vec<Mismatch>,
}

impl MismatchReport {
    /// The differences, in document order.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.mismatches.len();
        let noun = if count == 1 { "mismatch" } else { "mismatches" };
        write!(f, "documents differ ({count} {noun}):")?;
        for mismatch in &self.mismatches {
            write!(f, "\n  - {mismatch}")?;
        }
        Ok(())
    }
}

/// Outcome of comparing one expected document against one actual document.
///
/// A passing result carries the symbols the comparison captured; a failing
/// one carries every mismatch and no captures.
///
/// # Examples
///
/// ```
/// use scenario_match::{CompareConfig, ContentType, Scenario};
///
/// let mut scenario = Scenario::new(CompareConfig::default());
/// let result = scenario
///     .compare(ContentType::Text, "user-~[name]-active", "user-bob-active")
///     .expect("template is valid");
/// assert!(result.is_match());
/// assert_eq!(result.captured().get("name"), Some("bob"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    mismatches: Vec<Mismatch>,
    captured: SymbolTable,
}

impl ComparisonResult {
    pub(crate) fn passed(captured: SymbolTable) -> Self {
        Self {
            mismatches: Vec::new(),
            captured,
        }
    }

    pub(crate) fn failed(mismatches: Vec<Mismatch>) -> Self {
        Self {
            mismatches,
            captured: SymbolTable::new(),
        }
    }

    /// Return `true` when the documents are equivalent.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Every difference found, in document order.
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Symbols captured by a passing comparison.
    #[must_use]
    pub fn captured(&self) -> &SymbolTable {
        &self.captured
    }

    /// Convert into an assert-style result.
    ///
    /// # Errors
    /// Returns [`CompareError::Mismatch`] listing every difference when the
    /// documents are not equivalent.
    pub fn into_result(self) -> Result<SymbolTable, CompareError> {
        if self.mismatches.is_empty() {
            Ok(self.captured)
        } else {
            Err(CompareError::Mismatch(MismatchReport {
                mismatches: self.mismatches,
            }))
        }
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            return write!(f, "documents match ({} symbols captured)", self.captured.len());
        }
        let report = MismatchReport {
            mismatches: self.mismatches.clone(),
        };
        write!(f, "{report}")
    }
}
