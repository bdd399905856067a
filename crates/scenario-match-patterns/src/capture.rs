//! Symbol extraction and placeholder resolution.

use log::debug;

use crate::bindings::{Bindings, NoBindings};
use crate::delimiters::Delimiters;
use crate::errors::PatternError;
use crate::pattern::lexer::{Token, lex_template};
use crate::pattern::{SynthesisOptions, synthesize_with};

/// How a bound value is written into a resolved template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Substitution {
    /// Insert the value as-is.
    #[default]
    Plain,
    /// Insert the value escaped so it matches verbatim inside an expression.
    Quoted,
}

/// Fold ordered captures into a mapping where the last occurrence of a name
/// wins, keeping the position of its first occurrence.
pub(crate) fn last_write_wins(captures: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = Vec::with_capacity(captures.len());
    for (name, value) in captures {
        match merged.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => merged.push((name, value)),
        }
    }
    merged
}

/// Match `source` against `template` and return the captured symbols.
///
/// An unmatched source yields an empty mapping; deciding whether that is a
/// failure is up to the caller.
///
/// # Errors
/// Returns [`PatternError`] when the template cannot be synthesized.
///
/// # Examples
/// ```
/// use scenario_match_patterns::{SynthesisOptions, extract};
///
/// let options = SynthesisOptions::default();
/// let symbols = extract("user-~[name]-active", "user-bob-active", &options)
///     .expect("template compiles");
/// assert_eq!(symbols, vec![("name".to_string(), "bob".to_string())]);
///
/// let none = extract("user-~[name]-active", "admin", &options)
///     .expect("template compiles");
/// assert!(none.is_empty());
/// ```
pub fn extract(
    template: &str,
    source: &str,
    options: &SynthesisOptions,
) -> Result<Vec<(String, String)>, PatternError> {
    extract_with(template, source, options, &NoBindings)
}

/// Like [`extract`], but placeholders bound in `bindings` must match their
/// bound value and are not captured again.
///
/// # Errors
/// Returns [`PatternError`] when the template cannot be synthesized.
pub fn extract_with<B: Bindings + ?Sized>(
    template: &str,
    source: &str,
    options: &SynthesisOptions,
    bindings: &B,
) -> Result<Vec<(String, String)>, PatternError> {
    let synthesis = synthesize_with(template, options, bindings)?;
    if synthesis.names().is_empty() {
        return Ok(Vec::new());
    }
    let Some(captures) = synthesis.captures(source) else {
        debug!("template {template:?} did not match; no symbols captured");
        return Ok(Vec::new());
    };
    Ok(last_write_wins(captures))
}

/// Replace every placeholder in `template` with its bound value.
///
/// # Errors
/// Returns [`PatternError::UnboundSymbol`] when a placeholder names a symbol
/// absent from `bindings`, and [`PatternError::EmptyPlaceholder`] for malformed
/// placeholders.
///
/// # Examples
/// ```
/// use scenario_match_patterns::{Delimiters, Substitution, resolve};
///
/// let bound = vec![("x".to_string(), "4.2".to_string())];
/// let delimiters = Delimiters::default();
/// assert_eq!(
///     resolve("foo ~[x] bar", bound.as_slice(), Substitution::Plain, &delimiters).unwrap(),
///     "foo 4.2 bar"
/// );
/// assert_eq!(
///     resolve("foo ~[x] bar", bound.as_slice(), Substitution::Quoted, &delimiters).unwrap(),
///     r"foo 4\.2 bar"
/// );
/// assert!(resolve("~[y]", bound.as_slice(), Substitution::Plain, &delimiters).is_err());
/// ```
pub fn resolve<B: Bindings + ?Sized>(
    template: &str,
    bindings: &B,
    substitution: Substitution,
    delimiters: &Delimiters,
) -> Result<String, PatternError> {
    let tokens = lex_template(template, delimiters)?;
    let mut resolved = String::with_capacity(template.len());
    for token in tokens {
        match token {
            Token::Literal(text) => resolved.push_str(&text),
            Token::Placeholder { start, name } => {
                let Some(value) = bindings.lookup(&name) else {
                    return Err(PatternError::UnboundSymbol {
                        name,
                        position: start,
                    });
                };
                match substitution {
                    Substitution::Plain => resolved.push_str(value),
                    Substitution::Quoted => resolved.push_str(&regex::escape(value)),
                }
            }
        }
    }
    Ok(resolved)
}
