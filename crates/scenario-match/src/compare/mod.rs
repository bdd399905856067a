//! Structural comparison of expected templates against actual documents.
//!
//! Two comparator variants implement [`DocumentComparator`]: [`JsonComparator`]
//! walks JSON trees in lock-step and [`TextComparator`] treats both sides as a
//! single text leaf. Callers pick one from the declared [`ContentType`] via
//! [`Comparator::for_content`]; documents are never inspected to guess.

mod walker;

use log::debug;
use scenario_match_patterns::SynthesisOptions;
use serde_json::Value;

use crate::config::{CompareConfig, FieldMode};
use crate::document::{ContentType, Document, scalar_text};
use crate::error::{CompareError, Side};
use crate::report::ComparisonResult;
use crate::symbols::{Layered, SymbolTable};

use walker::Walker;

/// Capability shared by the comparator variants.
pub trait DocumentComparator {
    /// Compare `expected` against `actual`.
    ///
    /// `symbols` holds the values captured earlier in the scenario; templates
    /// referencing them must match the bound value. The table is only read.
    /// Newly captured symbols are returned in the [`ComparisonResult`] when
    /// the comparison passes.
    ///
    /// # Errors
    /// Returns [`CompareError::MalformedDocument`] when a side is not valid
    /// for this comparator and [`CompareError::Pattern`] when a template
    /// cannot be compiled.
    fn compare(
        &self,
        expected: &Document,
        actual: &Document,
        symbols: &SymbolTable,
    ) -> Result<ComparisonResult, CompareError>;
}

/// Compares JSON documents field by field and element by element.
///
/// # Examples
///
/// ```
/// use scenario_match::{CompareConfig, DocumentComparator, Document, JsonComparator, SymbolTable};
/// use serde_json::json;
///
/// let comparator = JsonComparator::new(&CompareConfig::default());
/// let result = comparator
///     .compare(
///         &Document::from(json!({"id": "~[uid]", "status": "ok"})),
///         &Document::from(json!({"id": "abc-123", "status": "ok"})),
///         &SymbolTable::new(),
///     )
///     .expect("templates are valid");
/// assert!(result.is_match());
/// assert_eq!(result.captured().get("uid"), Some("abc-123"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonComparator {
    options: SynthesisOptions,
    field_mode: FieldMode,
}

impl JsonComparator {
    /// Build a JSON comparator from `config`.
    #[must_use]
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            options: config.synthesis_options(),
            field_mode: config.field_mode,
        }
    }

    fn tree(document: &Document, side: Side) -> Result<Value, CompareError> {
        match document {
            Document::Json(value) => Ok(value.clone()),
            Document::Text(text) => Document::parse_json(text, side).map(Document::into_value),
        }
    }
}

impl DocumentComparator for JsonComparator {
    fn compare(
        &self,
        expected: &Document,
        actual: &Document,
        symbols: &SymbolTable,
    ) -> Result<ComparisonResult, CompareError> {
        let expected = Self::tree(expected, Side::Expected)?;
        let actual = Self::tree(actual, Side::Actual)?;
        let walker = Walker::new(&self.options, self.field_mode);
        let mut scope = Layered::new(symbols);
        let mut mismatches = Vec::new();
        walker.compare_node(&expected, &actual, "", &mut scope, &mut mismatches)?;
        Ok(finish(mismatches, scope))
    }
}

/// Compares two texts as one template leaf.
///
/// # Examples
///
/// ```
/// use scenario_match::{CompareConfig, DocumentComparator, Document, SymbolTable, TextComparator};
///
/// let comparator = TextComparator::new(&CompareConfig::default());
/// let result = comparator
///     .compare(
///         &Document::from(r"\d+"),
///         &Document::from("7"),
///         &SymbolTable::new(),
///     )
///     .expect("template is valid");
/// assert!(result.is_match());
/// assert!(result.captured().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TextComparator {
    options: SynthesisOptions,
}

impl TextComparator {
    /// Build a text comparator from `config`.
    #[must_use]
    pub fn new(config: &CompareConfig) -> Self {
        Self {
            options: config.synthesis_options(),
        }
    }

    fn text(document: &Document) -> String {
        match document {
            Document::Text(text) => text.clone(),
            Document::Json(value) => scalar_text(value).unwrap_or_else(|| value.to_string()),
        }
    }
}

impl DocumentComparator for TextComparator {
    fn compare(
        &self,
        expected: &Document,
        actual: &Document,
        symbols: &SymbolTable,
    ) -> Result<ComparisonResult, CompareError> {
        let template = Self::text(expected);
        let actual = Self::text(actual);
        let walker = Walker::new(&self.options, FieldMode::default());
        let mut scope = Layered::new(symbols);
        let mut mismatches = Vec::new();
        walker.compare_template(&template, &actual, "", &mut scope, &mut mismatches)?;
        Ok(finish(mismatches, scope))
    }
}

/// Comparator selected by declared content type.
#[derive(Debug, Clone)]
pub enum Comparator {
    /// JSON tree comparison.
    Json(JsonComparator),
    /// Plain text comparison.
    Text(TextComparator),
}

impl Comparator {
    /// Pick the comparator variant for `content_type`.
    #[must_use]
    pub fn for_content(content_type: ContentType, config: &CompareConfig) -> Self {
        match content_type {
            ContentType::Json => Self::Json(JsonComparator::new(config)),
            ContentType::Text => Self::Text(TextComparator::new(config)),
        }
    }
}

impl DocumentComparator for Comparator {
    fn compare(
        &self,
        expected: &Document,
        actual: &Document,
        symbols: &SymbolTable,
    ) -> Result<ComparisonResult, CompareError> {
        match self {
            Self::Json(comparator) => comparator.compare(expected, actual, symbols),
            Self::Text(comparator) => comparator.compare(expected, actual, symbols),
        }
    }
}

fn finish(mismatches: Vec<crate::report::Mismatch>, scope: Layered<'_>) -> ComparisonResult {
    if mismatches.is_empty() {
        let captured = scope.into_pending();
        debug!("comparison passed; {} symbols captured", captured.len());
        ComparisonResult::passed(captured)
    } else {
        debug!("comparison failed with {} mismatches", mismatches.len());
        ComparisonResult::failed(mismatches)
    }
}

#[cfg(test)]
mod tests;
