//! Options steering template interpretation.

use std::fmt;
use std::str::FromStr;

use crate::delimiters::Delimiters;

/// How the non-placeholder text of a template is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TemplateMode {
    /// Treat the template as a regular expression when its placeholder-free
    /// text compiles, and as literal text otherwise.
    #[default]
    Auto,
    /// Always treat the template as a regular expression. Compilation
    /// failures are reported instead of degrading to a literal match.
    Regex,
    /// Always match the template text verbatim.
    Literal,
}

impl TemplateMode {
    /// Lowercase label used in configuration and reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Regex => "regex",
            Self::Literal => "literal",
        }
    }
}

impl fmt::Display for TemplateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown [`TemplateMode`] label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown template mode '{0}', expected one of: auto, regex, literal")]
pub struct TemplateModeParseError(pub String);

impl FromStr for TemplateMode {
    type Err = TemplateModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "regex" => Ok(Self::Regex),
            "literal" => Ok(Self::Literal),
            _ => Err(TemplateModeParseError(s.to_owned())),
        }
    }
}

/// Settings shared by synthesis, extraction and resolution.
///
/// # Examples
/// ```
/// use scenario_match_patterns::{SynthesisOptions, TemplateMode};
///
/// let options = SynthesisOptions::default();
/// assert!(options.case_insensitive);
/// assert_eq!(options.mode, TemplateMode::Auto);
/// assert_eq!(options.delimiters.start(), "~[");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// Placeholder markers.
    pub delimiters: Delimiters,
    /// Match letters regardless of case. Enabled by default.
    pub case_insensitive: bool,
    /// Interpretation of the non-placeholder text.
    pub mode: TemplateMode,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            delimiters: Delimiters::default(),
            case_insensitive: true,
            mode: TemplateMode::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("auto", TemplateMode::Auto)]
    #[case("REGEX", TemplateMode::Regex)]
    #[case(" literal ", TemplateMode::Literal)]
    fn parses_mode_labels(#[case] input: &str, #[case] expected: TemplateMode) {
        assert_eq!(input.parse::<TemplateMode>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_mode() {
        let Err(err) = "glob".parse::<TemplateMode>() else {
            panic!("unknown label should fail");
        };
        assert!(err.to_string().contains("unknown template mode 'glob'"));
    }

    #[test]
    fn labels_round_trip_through_display() {
        for mode in [TemplateMode::Auto, TemplateMode::Regex, TemplateMode::Literal] {
            assert_eq!(mode.to_string().parse::<TemplateMode>(), Ok(mode));
        }
    }
}
