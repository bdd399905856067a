//! Template lexer splitting literal text from placeholders.

use crate::delimiters::Delimiters;
use crate::errors::PatternError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(String),
    Placeholder { start: usize, name: String },
}

/// Split `template` into literal runs and placeholders.
///
/// The name of a placeholder runs up to the first end delimiter following
/// its start delimiter. A start delimiter without a matching end delimiter is
/// kept as literal text.
pub(crate) fn lex_template(
    template: &str,
    delimiters: &Delimiters,
) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = template;
    let mut offset = 0usize;

    while let Some((before, after_start)) = rest.split_once(delimiters.start()) {
        let Some((name, after_end)) = after_start.split_once(delimiters.end()) else {
            break;
        };
        let start = offset + before.len();
        if name.is_empty() {
            return Err(PatternError::EmptyPlaceholder { position: start });
        }
        literal.push_str(before);
        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        tokens.push(Token::Placeholder {
            start,
            name: name.to_owned(),
        });
        offset = start + delimiters.start().len() + name.len() + delimiters.end().len();
        rest = after_end;
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

/// Collect placeholder names in appearance order, duplicates included.
///
/// # Errors
/// Returns [`PatternError::EmptyPlaceholder`] when a placeholder has an empty name.
///
/// # Examples
/// ```
/// use scenario_match_patterns::{Delimiters, placeholder_names};
///
/// let names = placeholder_names("~[a]-~[b]-~[a]", &Delimiters::default())
///     .expect("template is well formed");
/// assert_eq!(names, vec!["a", "b", "a"]);
/// ```
pub fn placeholder_names(
    template: &str,
    delimiters: &Delimiters,
) -> Result<Vec<String>, PatternError> {
    Ok(lex_template(template, delimiters)?
        .into_iter()
        .filter_map(|token| match token {
            Token::Placeholder { name, .. } => Some(name),
            Token::Literal(_) => None,
        })
        .collect())
}
