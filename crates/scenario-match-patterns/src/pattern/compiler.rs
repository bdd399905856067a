//! Convert lexed template tokens into anchored regular-expression sources.

use log::{debug, trace};
use regex::{Regex, RegexBuilder};

use crate::bindings::Bindings;
use crate::errors::PatternError;

use super::lexer::Token;
use super::options::{SynthesisOptions, TemplateMode};

/// Pattern fragment substituted for every unbound placeholder.
const CAPTURE_ANYTHING: &str = ".*?";

/// Compiled program size allowed per template; whole response bodies are
/// templates too.
const SIZE_LIMIT: usize = 256 * (1 << 20);

/// Lazy DFA cache allowed per template.
const DFA_SIZE_LIMIT: usize = 64 * (1 << 20);

/// How a compiled template is checked against a source string.
#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    /// An anchored expression with one named group per unbound placeholder.
    Regex(Regex),
    /// Whole-string equality, used when a placeholder-free literal template
    /// is too large to compile.
    Text {
        /// The template text, lowercased when matching ignores case.
        text: String,
        /// Whether both sides are lowercased before comparing.
        case_insensitive: bool,
    },
}

impl Matcher {
    fn text(text: String, case_insensitive: bool) -> Self {
        let text = if case_insensitive {
            text.to_lowercase()
        } else {
            text
        };
        Self::Text {
            text,
            case_insensitive,
        }
    }

    /// Compare `source` against a [`Matcher::Text`] template.
    pub(crate) fn text_matches(text: &str, case_insensitive: bool, source: &str) -> bool {
        if case_insensitive {
            source.to_lowercase() == text
        } else {
            source == text
        }
    }
}

/// Name of the capture group carrying the placeholder at `index`.
pub(crate) fn group_name(index: usize) -> String {
    format!("__ph{index}")
}

/// Build the anchored pattern source for `tokens` in the given mode.
///
/// Literal mode escapes every literal run; regex mode keeps literal runs
/// verbatim so the user's expression syntax applies. Bound placeholders are
/// always escaped so their value matches verbatim. Returns the source and the
/// names of the placeholders that became capture groups.
pub(crate) fn build_source<B: Bindings + ?Sized>(
    tokens: &[Token],
    mode: TemplateMode,
    bindings: &B,
) -> (String, Vec<String>) {
    let mut source = String::from(r"\A(?:");
    let mut names = Vec::new();

    for token in tokens {
        match token {
            Token::Literal(text) if mode == TemplateMode::Literal => {
                source.push_str(&regex::escape(text));
            }
            Token::Literal(text) => source.push_str(text),
            Token::Placeholder { name, .. } => match bindings.lookup(name) {
                Some(value) => source.push_str(&regex::escape(value)),
                None => {
                    source.push_str("(?P<");
                    source.push_str(&group_name(names.len()));
                    source.push('>');
                    source.push_str(CAPTURE_ANYTHING);
                    source.push(')');
                    names.push(name.clone());
                }
            },
        }
    }

    source.push_str(r")\z");
    (source, names)
}

/// Compile `source` with the flags every template match uses.
pub(crate) fn compile_source(
    source: &str,
    options: &SynthesisOptions,
) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(options.case_insensitive)
        .multi_line(true)
        .dot_matches_new_line(true)
        .size_limit(SIZE_LIMIT)
        .dfa_size_limit(DFA_SIZE_LIMIT)
        .build()
        .map_err(PatternError::from)
}

/// Decide whether the placeholder-free part of a template is a regex.
///
/// A syntax failure marks the template as literal, as does text too large to
/// compile; any other compilation failure is surfaced.
pub(crate) fn detect_mode(
    tokens: &[Token],
    options: &SynthesisOptions,
) -> Result<TemplateMode, PatternError> {
    if options.mode != TemplateMode::Auto {
        return Ok(options.mode);
    }
    let bare: String = tokens
        .iter()
        .filter_map(|token| match token {
            Token::Literal(text) => Some(text.as_str()),
            Token::Placeholder { .. } => None,
        })
        .collect();
    match compile_source(&bare, options) {
        Ok(_) => Ok(TemplateMode::Regex),
        Err(err) if err.is_regex_syntax() => {
            trace!("template {bare:?} is not a valid expression; matching literally");
            Ok(TemplateMode::Literal)
        }
        Err(err) if err.is_size_limit() => {
            debug!(
                "template of {} bytes exceeds the pattern size limit; matching literally",
                bare.len()
            );
            Ok(TemplateMode::Literal)
        }
        Err(err) => Err(err),
    }
}

/// Compile tokens, degrading an auto-detected regex to literal matching when
/// the synthesized expression is not syntactically valid or is too large.
pub(crate) fn compile_tokens<B: Bindings + ?Sized>(
    tokens: &[Token],
    options: &SynthesisOptions,
    bindings: &B,
) -> Result<(Matcher, Vec<String>, TemplateMode), PatternError> {
    let mode = detect_mode(tokens, options)?;
    let (source, names) = build_source(tokens, mode, bindings);
    match compile_source(&source, options) {
        Ok(regex) => Ok((Matcher::Regex(regex), names, mode)),
        Err(err) if mode == TemplateMode::Literal => {
            literal_fallback(tokens, options, bindings, err).map(|m| (m, names, mode))
        }
        Err(err)
            if options.mode == TemplateMode::Auto
                && (err.is_regex_syntax() || err.is_size_limit()) =>
        {
            debug!("synthesized expression failed to compile ({err}); retrying literally");
            let (source, names) = build_source(tokens, TemplateMode::Literal, bindings);
            let matcher = match compile_source(&source, options) {
                Ok(regex) => Matcher::Regex(regex),
                Err(err) => literal_fallback(tokens, options, bindings, err)?,
            };
            Ok((matcher, names, TemplateMode::Literal))
        }
        Err(err) => Err(err),
    }
}

/// Replace a literal template that failed to compile with plain equality,
/// possible only when every placeholder is already bound.
fn literal_fallback<B: Bindings + ?Sized>(
    tokens: &[Token],
    options: &SynthesisOptions,
    bindings: &B,
    err: PatternError,
) -> Result<Matcher, PatternError> {
    if !err.is_size_limit() {
        return Err(err);
    }
    let Some(text) = literal_text(tokens, bindings) else {
        return Err(err);
    };
    debug!(
        "literal template of {} bytes is too large to compile; comparing text directly",
        text.len()
    );
    Ok(Matcher::text(text, options.case_insensitive))
}

/// The text a template denotes when no placeholder is left to capture.
fn literal_text<B: Bindings + ?Sized>(tokens: &[Token], bindings: &B) -> Option<String> {
    let mut text = String::new();
    for token in tokens {
        match token {
            Token::Literal(literal) => text.push_str(literal),
            Token::Placeholder { name, .. } => text.push_str(bindings.lookup(name)?),
        }
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::NoBindings;
    use crate::delimiters::Delimiters;
    use crate::pattern::lexer::lex_template;

    fn tokens(template: &str) -> Vec<Token> {
        match lex_template(template, &Delimiters::default()) {
            Ok(tokens) => tokens,
            Err(err) => panic!("template should lex: {err}"),
        }
    }

    #[test]
    fn builds_literal_source_with_capture_groups() {
        let (source, names) =
            build_source(&tokens("a.b ~[x] (c)"), TemplateMode::Literal, &NoBindings);
        assert_eq!(source, r"\A(?:a\.b (?P<__ph0>.*?) \(c\))\z");
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn builds_regex_source_inline() {
        let (source, names) = build_source(&tokens(r"\d+~[x]"), TemplateMode::Regex, &NoBindings);
        assert_eq!(source, r"\A(?:\d+(?P<__ph0>.*?))\z");
        assert_eq!(names, vec!["x"]);
    }

    #[test]
    fn escapes_bound_values_in_regex_mode() {
        let bound = vec![("x".to_string(), "1+1".to_string())];
        let (source, names) =
            build_source(&tokens("^~[x]-~[y]"), TemplateMode::Regex, bound.as_slice());
        assert_eq!(source, r"\A(?:^1\+1-(?P<__ph0>.*?))\z");
        assert_eq!(names, vec!["y"]);
    }

    #[test]
    fn detects_regex_and_literal_templates() {
        let options = SynthesisOptions::default();
        assert!(matches!(
            detect_mode(&tokens(r"\d+ ~[x]"), &options),
            Ok(TemplateMode::Regex)
        ));
        assert!(matches!(
            detect_mode(&tokens("price (~[x]"), &options),
            Ok(TemplateMode::Literal)
        ));
    }

    #[test]
    fn forced_modes_skip_detection() {
        let options = SynthesisOptions {
            mode: TemplateMode::Literal,
            ..SynthesisOptions::default()
        };
        assert!(matches!(
            detect_mode(&tokens(r"\d+"), &options),
            Ok(TemplateMode::Literal)
        ));
    }

    #[test]
    fn forced_regex_mode_surfaces_syntax_errors() {
        let options = SynthesisOptions {
            mode: TemplateMode::Regex,
            ..SynthesisOptions::default()
        };
        let Err(err) = compile_tokens(&tokens("(~[x]"), &options, &NoBindings) else {
            panic!("unbalanced group should fail in regex mode");
        };
        assert!(err.is_regex_syntax());
    }

    #[test]
    fn literal_text_substitutes_bound_values_only() {
        let bound = vec![("x".to_string(), "1".to_string())];
        assert_eq!(
            literal_text(&tokens("a ~[x] b"), bound.as_slice()),
            Some("a 1 b".to_string())
        );
        assert_eq!(literal_text(&tokens("a ~[y]"), bound.as_slice()), None);
    }

    #[test]
    fn oversized_literal_falls_back_to_text_equality() {
        let options = SynthesisOptions::default();
        let err = PatternError::Regex(regex::Error::CompiledTooBig(SIZE_LIMIT));
        let Ok(Matcher::Text {
            text,
            case_insensitive,
        }) = literal_fallback(&tokens("Body TEXT"), &options, &NoBindings, err)
        else {
            panic!("placeholder-free literal should compare as text");
        };
        assert_eq!(text, "body text");
        assert!(case_insensitive);
        assert!(Matcher::text_matches(&text, case_insensitive, "BODY text"));
        assert!(!Matcher::text_matches(&text, case_insensitive, "body text!"));
    }

    #[test]
    fn oversized_template_with_capture_is_surfaced() {
        let err = PatternError::Regex(regex::Error::CompiledTooBig(SIZE_LIMIT));
        let result = literal_fallback(
            &tokens("body ~[x]"),
            &SynthesisOptions::default(),
            &NoBindings,
            err,
        );
        assert!(matches!(result, Err(err) if err.is_size_limit()));
    }

    #[test]
    fn syntax_errors_are_not_degraded_to_text() {
        let err = PatternError::Regex(regex::Error::Syntax("bad".into()));
        let result = literal_fallback(&tokens("x"), &SynthesisOptions::default(), &NoBindings, err);
        assert!(matches!(result, Err(err) if err.is_regex_syntax()));
    }
}
