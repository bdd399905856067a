//! Placeholder delimiter configuration.

use std::fmt;

use crate::errors::PatternError;

/// Default start delimiter for placeholders.
pub const DEFAULT_START: &str = "~[";
/// Default end delimiter for placeholders.
pub const DEFAULT_END: &str = "]";

/// Start and end markers enclosing a placeholder name.
///
/// Templates under test sometimes contain the default `~[` … `]` markers as
/// literal content, so the pair can be replaced per comparison.
///
/// # Examples
/// ```
/// use scenario_match_patterns::Delimiters;
///
/// let custom = Delimiters::new("${", "}").expect("delimiters are non-empty");
/// assert_eq!(custom.start(), "${");
/// assert_eq!(Delimiters::default().end(), "]");
/// assert!(Delimiters::new("", "}").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Delimiters {
    start: String,
    end: String,
}

impl Delimiters {
    /// Build a delimiter pair.
    ///
    /// # Errors
    /// Returns [`PatternError::Delimiters`] when either marker is empty.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self, PatternError> {
        let start = start.into();
        let end = end.into();
        if start.is_empty() {
            return Err(PatternError::Delimiters("start delimiter is empty"));
        }
        if end.is_empty() {
            return Err(PatternError::Delimiters("end delimiter is empty"));
        }
        Ok(Self { start, end })
    }

    /// The marker opening a placeholder.
    #[must_use]
    pub fn start(&self) -> &str {
        &self.start
    }

    /// The marker closing a placeholder.
    #[must_use]
    pub fn end(&self) -> &str {
        &self.end
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.to_owned(),
            end: DEFAULT_END.to_owned(),
        }
    }
}

impl fmt::Display for Delimiters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}name{}", self.start, self.end)
    }
}
