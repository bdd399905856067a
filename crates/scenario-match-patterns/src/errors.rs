//! Errors raised while turning templates into matching patterns.

use thiserror::Error;

/// Failure to lex, synthesize or resolve a template.
///
/// Positions are zero-based byte offsets of a placeholder's start
/// delimiter within the template.
///
/// # Examples
/// ```
/// use scenario_match_patterns::{PatternError, SynthesisOptions, synthesize};
///
/// let Err(err) = synthesize("id=~[]", &SynthesisOptions::default()) else {
///     panic!("empty names are rejected");
/// };
/// assert!(matches!(err, PatternError::EmptyPlaceholder { position: 3 }));
/// ```
#[derive(Debug, Error)]
pub enum PatternError {
    /// A placeholder has no name between its delimiters.
    #[error("empty placeholder name at byte {position} (zero-based)")]
    EmptyPlaceholder {
        /// Offset of the offending start delimiter.
        position: usize,
    },
    /// A template refers to a symbol that has not been captured yet.
    #[error("unbound symbol `{name}` referenced at byte {position} (zero-based)")]
    UnboundSymbol {
        /// Name of the missing symbol.
        name: String,
        /// Offset of the placeholder.
        position: usize,
    },
    /// The placeholder delimiters cannot be used for scanning.
    #[error("invalid placeholder delimiters: {0}")]
    Delimiters(&'static str),
    /// The synthesized or user-supplied expression failed to compile.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl PatternError {
    /// Return `true` when the failure comes from regular-expression syntax.
    ///
    /// Only syntax failures may be degraded to a literal comparison; size
    /// limits and placeholder errors always surface.
    #[must_use]
    pub fn is_regex_syntax(&self) -> bool {
        matches!(self, Self::Regex(regex::Error::Syntax(_)))
    }

    /// Return `true` when the expression was valid but too large to compile.
    #[must_use]
    pub fn is_size_limit(&self) -> bool {
        matches!(self, Self::Regex(regex::Error::CompiledTooBig(_)))
    }
}
