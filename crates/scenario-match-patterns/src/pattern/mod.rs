//! Template lexing and pattern synthesis.

mod compiler;
pub(crate) mod lexer;
mod options;

use regex::Regex;

use crate::bindings::{Bindings, NoBindings};
use crate::errors::PatternError;
use compiler::Matcher;

pub use lexer::placeholder_names;
pub use options::{SynthesisOptions, TemplateMode, TemplateModeParseError};

/// A compiled template together with its placeholder list.
///
/// `names()[i]` is the placeholder bound by the `i`-th capture group the
/// synthesizer emitted; user groups inside regex templates never shift the
/// alignment because placeholder groups are named.
#[derive(Debug, Clone)]
pub struct Synthesis {
    matcher: Matcher,
    names: Vec<String>,
    groups: Vec<String>,
    mode: TemplateMode,
}

impl Synthesis {
    /// The compiled, anchored expression.
    ///
    /// `None` when a placeholder-free template was too large to compile and
    /// is compared as plain text instead.
    #[must_use]
    pub fn regex(&self) -> Option<&Regex> {
        match &self.matcher {
            Matcher::Regex(regex) => Some(regex),
            Matcher::Text { .. } => None,
        }
    }

    /// Placeholder names carved out as capture groups, in appearance order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The interpretation actually used: [`TemplateMode::Regex`] or
    /// [`TemplateMode::Literal`].
    #[must_use]
    pub fn mode(&self) -> TemplateMode {
        self.mode
    }

    /// Return `true` when `source` satisfies the whole template.
    #[must_use]
    pub fn is_match(&self, source: &str) -> bool {
        match &self.matcher {
            Matcher::Regex(regex) => regex.is_match(source),
            Matcher::Text {
                text,
                case_insensitive,
            } => Matcher::text_matches(text, *case_insensitive, source),
        }
    }

    /// Capture placeholder values from `source`, in appearance order.
    ///
    /// Returns `None` when `source` does not satisfy the template. Repeated
    /// names appear once per occurrence; callers that need a mapping apply
    /// them in order so the last occurrence wins.
    #[must_use]
    pub fn captures(&self, source: &str) -> Option<Vec<(String, String)>> {
        let regex = match &self.matcher {
            Matcher::Regex(regex) => regex,
            Matcher::Text { .. } => return self.is_match(source).then(Vec::new),
        };
        let caps = regex.captures(source)?;
        let values = self
            .names
            .iter()
            .zip(&self.groups)
            .map(|(name, group)| {
                let value = caps.name(group).map_or_else(String::new, |m| m.as_str().to_owned());
                (name.clone(), value)
            })
            .collect();
        Some(values)
    }
}

/// Synthesize a matching pattern for `template` with no symbols bound.
///
/// # Errors
/// Returns [`PatternError`] when a placeholder is malformed or the resulting
/// expression cannot be compiled.
///
/// # Examples
/// ```
/// use scenario_match_patterns::{SynthesisOptions, TemplateMode, synthesize};
///
/// let synthesis = synthesize("user-~[name]-active", &SynthesisOptions::default())
///     .expect("template compiles");
/// assert_eq!(synthesis.names(), ["name"]);
/// assert!(synthesis.is_match("USER-bob-ACTIVE"));
///
/// let regex = synthesize(r"\d+", &SynthesisOptions::default())
///     .expect("template compiles");
/// assert_eq!(regex.mode(), TemplateMode::Regex);
/// assert!(regex.is_match("7"));
/// ```
pub fn synthesize(template: &str, options: &SynthesisOptions) -> Result<Synthesis, PatternError> {
    synthesize_with(template, options, &NoBindings)
}

/// Synthesize a matching pattern, substituting placeholders already bound in
/// `bindings` with their escaped values.
///
/// # Errors
/// Returns [`PatternError`] when a placeholder is malformed or the resulting
/// expression cannot be compiled.
pub fn synthesize_with<B: Bindings + ?Sized>(
    template: &str,
    options: &SynthesisOptions,
    bindings: &B,
) -> Result<Synthesis, PatternError> {
    let tokens = lexer::lex_template(template, &options.delimiters)?;
    let (matcher, names, mode) = compiler::compile_tokens(&tokens, options, bindings)?;
    let groups = (0..names.len()).map(compiler::group_name).collect();
    Ok(Synthesis {
        matcher,
        names,
        groups,
        mode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Display;

    fn expect_ok<T, E: Display>(result: Result<T, E>, context: &str) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("{context}: {err}"),
        }
    }

    #[test]
    fn literal_templates_do_not_match_more_than_their_text() {
        let options = SynthesisOptions {
            mode: TemplateMode::Literal,
            ..SynthesisOptions::default()
        };
        let synthesis = expect_ok(synthesize("a.c (~[x])", &options), "template should compile");
        assert_eq!(
            synthesis.captures("a.c (1)"),
            Some(vec![("x".to_string(), "1".to_string())])
        );
        assert!(!synthesis.is_match("abc (1)"));
        assert!(!synthesis.is_match("prefix a.c (1)"));
    }

    #[test]
    fn auto_mode_treats_compilable_text_as_regex() {
        let synthesis = expect_ok(
            synthesize("a.c-~[x]", &SynthesisOptions::default()),
            "template should compile",
        );
        assert_eq!(synthesis.mode(), TemplateMode::Regex);
        assert!(synthesis.is_match("abc-1"));
    }

    #[test]
    fn user_groups_do_not_shift_placeholder_alignment() {
        let synthesis = expect_ok(
            synthesize(r"(\w+)=~[value];(\d)", &SynthesisOptions::default()),
            "template should compile",
        );
        assert_eq!(synthesis.mode(), TemplateMode::Regex);
        assert_eq!(
            synthesis.captures("key=abc;7"),
            Some(vec![("value".to_string(), "abc".to_string())])
        );
    }

    #[test]
    fn matches_across_lines() {
        let synthesis = expect_ok(
            synthesize("status: ~[status]\nbody: ~[body]", &SynthesisOptions::default()),
            "template should compile",
        );
        assert_eq!(
            synthesis.captures("status: 200\nbody: line one\nline two"),
            Some(vec![
                ("status".to_string(), "200".to_string()),
                ("body".to_string(), "line one\nline two".to_string()),
            ])
        );
    }

    #[test]
    fn case_sensitivity_is_configurable() {
        let options = SynthesisOptions {
            case_insensitive: false,
            ..SynthesisOptions::default()
        };
        let synthesis = expect_ok(synthesize("Hello ~[who]", &options), "compiles");
        assert!(!synthesis.is_match("hello world"));
        assert!(synthesis.is_match("Hello world"));
    }

    #[test]
    fn bound_placeholders_match_their_value_verbatim() {
        let bound = vec![("id".to_string(), "a.b".to_string())];
        let synthesis = expect_ok(
            synthesize_with("~[id]/~[rest]", &SynthesisOptions::default(), bound.as_slice()),
            "compiles",
        );
        assert_eq!(synthesis.names(), ["rest"]);
        assert!(synthesis.is_match("a.b/tail"));
        assert!(!synthesis.is_match("axb/tail"));
    }

    #[test]
    fn regex_syntax_inside_template_falls_back_to_literal() {
        let synthesis = expect_ok(
            synthesize("[~[x]", &SynthesisOptions::default()),
            "compiles",
        );
        assert_eq!(synthesis.mode(), TemplateMode::Literal);
        assert_eq!(
            synthesis.captures("[open"),
            Some(vec![("x".to_string(), "open".to_string())])
        );
    }
}
