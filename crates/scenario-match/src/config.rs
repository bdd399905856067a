//! Comparison configuration.
//!
//! Every option has an explicit default and can be overridden through
//! environment variables prefixed with `SCENARIO_MATCH_` or by the caller.
//!
//! # Environment Variables
//!
//! - `SCENARIO_MATCH_FIELD_MODE`: `strict` or `lenient`
//! - `SCENARIO_MATCH_CASE_INSENSITIVE`: boolean (`1`, `true`, `yes`, `on`, …)
//! - `SCENARIO_MATCH_PLACEHOLDER_START` / `SCENARIO_MATCH_PLACEHOLDER_END`:
//!   placeholder delimiters
//! - `SCENARIO_MATCH_TEMPLATE_MODE`: `auto`, `regex` or `literal`

use std::env;
use std::fmt;
use std::str::FromStr;

use scenario_match_patterns::{
    DEFAULT_END, DEFAULT_START, Delimiters, SynthesisOptions, TemplateMode,
};
use thiserror::Error;

const FIELD_MODE_VAR: &str = "SCENARIO_MATCH_FIELD_MODE";
const CASE_INSENSITIVE_VAR: &str = "SCENARIO_MATCH_CASE_INSENSITIVE";
const PLACEHOLDER_START_VAR: &str = "SCENARIO_MATCH_PLACEHOLDER_START";
const PLACEHOLDER_END_VAR: &str = "SCENARIO_MATCH_PLACEHOLDER_END";
const TEMPLATE_MODE_VAR: &str = "SCENARIO_MATCH_TEMPLATE_MODE";

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// How object fields present only in the actual document are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    /// Field sets must correspond exactly; extra actual fields are mismatches.
    Strict,
    /// Extra actual fields are allowed. Expected fields must still be present.
    #[default]
    Lenient,
}

impl FromStr for FieldMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ConfigError::Invalid(format!(
                "unknown field mode '{s}', expected strict or lenient"
            ))),
        }
    }
}

impl fmt::Display for FieldMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        })
    }
}

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}

/// Settings applied to every comparison in a scenario.
///
/// # Examples
///
/// ```
/// use scenario_match::{CompareConfig, FieldMode};
///
/// let config = CompareConfig::default();
/// assert_eq!(config.field_mode, FieldMode::Lenient);
/// assert!(config.case_insensitive);
/// assert_eq!(config.delimiters.start(), "~[");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareConfig {
    /// Treatment of fields only present in the actual document.
    pub field_mode: FieldMode,
    /// Match letters regardless of case. Enabled by default.
    pub case_insensitive: bool,
    /// Placeholder markers, `~[` and `]` by default.
    pub delimiters: Delimiters,
    /// Interpretation of template text outside placeholders.
    pub template_mode: TemplateMode,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            field_mode: FieldMode::default(),
            case_insensitive: true,
            delimiters: Delimiters::default(),
            template_mode: TemplateMode::default(),
        }
    }
}

impl CompareConfig {
    /// Load configuration from `SCENARIO_MATCH_*` environment variables.
    ///
    /// Missing variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(FIELD_MODE_VAR) {
            config.field_mode = value.parse()?;
        }

        if let Some(value) = lookup(CASE_INSENSITIVE_VAR) {
            config.case_insensitive = parse_env_bool(&value).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "invalid {CASE_INSENSITIVE_VAR} value '{value}', expected a boolean"
                ))
            })?;
        }

        let start = lookup(PLACEHOLDER_START_VAR);
        let end = lookup(PLACEHOLDER_END_VAR);
        if start.is_some() || end.is_some() {
            config.delimiters = Delimiters::new(
                start.unwrap_or_else(|| DEFAULT_START.to_owned()),
                end.unwrap_or_else(|| DEFAULT_END.to_owned()),
            )
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        }

        if let Some(value) = lookup(TEMPLATE_MODE_VAR) {
            config.template_mode = value
                .parse()
                .map_err(|err: scenario_match_patterns::TemplateModeParseError| {
                    ConfigError::Invalid(err.to_string())
                })?;
        }

        Ok(config)
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        field_mode: Option<FieldMode>,
        case_insensitive: Option<bool>,
        delimiters: Option<Delimiters>,
        template_mode: Option<TemplateMode>,
    ) -> Self {
        if let Some(mode) = field_mode {
            self.field_mode = mode;
        }
        if let Some(flag) = case_insensitive {
            self.case_insensitive = flag;
        }
        if let Some(pair) = delimiters {
            self.delimiters = pair;
        }
        if let Some(mode) = template_mode {
            self.template_mode = mode;
        }
        self
    }

    /// Create a new configuration with the specified field mode.
    #[must_use]
    pub fn with_field_mode(mut self, field_mode: FieldMode) -> Self {
        self.field_mode = field_mode;
        self
    }

    /// Options handed to the template synthesizer.
    #[must_use]
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            delimiters: self.delimiters.clone(),
            case_insensitive: self.case_insensitive,
            mode: self.template_mode,
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
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = CompareConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, CompareConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = CompareConfig::from_lookup(lookup_from(&[
            (FIELD_MODE_VAR, "STRICT"),
            (CASE_INSENSITIVE_VAR, "off"),
            (PLACEHOLDER_START_VAR, "{{"),
            (PLACEHOLDER_END_VAR, "}}"),
            (TEMPLATE_MODE_VAR, "literal"),
        ]))
        .unwrap();
        assert_eq!(config.field_mode, FieldMode::Strict);
        assert!(!config.case_insensitive);
        assert_eq!(config.delimiters.start(), "{{");
        assert_eq!(config.delimiters.end(), "}}");
        assert_eq!(config.template_mode, TemplateMode::Literal);
    }

    #[test]
    fn partial_delimiter_override_keeps_other_default() {
        let config =
            CompareConfig::from_lookup(lookup_from(&[(PLACEHOLDER_END_VAR, ">")])).unwrap();
        assert_eq!(config.delimiters.start(), "~[");
        assert_eq!(config.delimiters.end(), ">");
    }

    #[test]
    fn rejects_invalid_values() {
        let err = CompareConfig::from_lookup(lookup_from(&[(FIELD_MODE_VAR, "loose")]))
            .unwrap_err();
        assert!(err.to_string().contains("unknown field mode 'loose'"));

        let err = CompareConfig::from_lookup(lookup_from(&[(CASE_INSENSITIVE_VAR, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains("expected a boolean"));

        let err = CompareConfig::from_lookup(lookup_from(&[(PLACEHOLDER_START_VAR, "")]))
            .unwrap_err();
        assert!(err.to_string().contains("start delimiter is empty"));
    }

    #[test]
    fn overrides_take_precedence() {
        let config = CompareConfig::default().apply_overrides(
            Some(FieldMode::Strict),
            Some(false),
            None,
            Some(TemplateMode::Regex),
        );
        assert_eq!(config.field_mode, FieldMode::Strict);
        assert!(!config.case_insensitive);
        assert_eq!(config.template_mode, TemplateMode::Regex);
        assert_eq!(config.delimiters, Delimiters::default());
    }

    #[test]
    fn parse_env_bool_understands_common_values() {
        for truthy in ["1", "true", "YES", "On"] {
            assert_eq!(parse_env_bool(truthy), Some(true), "{truthy} should be truthy");
        }
        for falsy in ["0", "False", "no", "OFF"] {
            assert_eq!(parse_env_bool(falsy), Some(false), "{falsy} should be falsy");
        }
        assert_eq!(parse_env_bool("maybe"), None);
    }
}
