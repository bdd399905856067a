//! Per-scenario comparison context.
//!
//! A [`Scenario`] owns the symbol table for one logical test case. Steps
//! receive it by `&mut`, so captures from one step are visible to the next
//! and scenarios running in parallel never observe each other's symbols.

use log::{debug, info};
use scenario_match_patterns::{PatternError, Substitution, resolve};

use crate::compare::{Comparator, DocumentComparator};
use crate::config::CompareConfig;
use crate::document::{ContentType, Document};
use crate::error::CompareError;
use crate::report::ComparisonResult;
use crate::symbols::SymbolTable;

/// Symbol table and settings shared by the steps of one scenario.
///
/// # Examples
///
/// ```
/// use scenario_match::{CompareConfig, Scenario};
/// use serde_json::json;
///
/// let mut scenario = Scenario::new(CompareConfig::default());
/// scenario
///     .assert_json(json!({"id": "~[uid]"}), json!({"id": "abc-123"}))
///     .expect("documents match");
/// assert_eq!(scenario.resolve("/users/~[uid]").expect("uid is bound"), "/users/abc-123");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    symbols: SymbolTable,
    config: CompareConfig,
}

impl Scenario {
    /// Start a scenario with an empty symbol table.
    #[must_use]
    pub fn new(config: CompareConfig) -> Self {
        Self {
            symbols: SymbolTable::new(),
            config,
        }
    }

    /// Compare `expected` against `actual` using the comparator for
    /// `content_type`.
    ///
    /// Symbols captured by a passing comparison are committed to the
    /// scenario; a failing comparison leaves the table untouched.
    ///
    /// # Errors
    /// Returns [`CompareError::MalformedDocument`] or
    /// [`CompareError::Pattern`] when the comparison cannot be carried out.
    /// Document differences are reported in the returned result, not as an
    /// error.
    pub fn compare(
        &mut self,
        content_type: ContentType,
        expected: impl Into<Document>,
        actual: impl Into<Document>,
    ) -> Result<ComparisonResult, CompareError> {
        let comparator = Comparator::for_content(content_type, &self.config);
        let result = comparator.compare(&expected.into(), &actual.into(), &self.symbols)?;
        if result.is_match() {
            self.commit(result.captured());
        } else {
            debug!(
                "{content_type:?} comparison found {} mismatches",
                result.mismatches().len()
            );
        }
        Ok(result)
    }

    /// Compare two JSON documents.
    ///
    /// # Errors
    /// See [`Scenario::compare`].
    pub fn compare_json(
        &mut self,
        expected: impl Into<Document>,
        actual: impl Into<Document>,
    ) -> Result<ComparisonResult, CompareError> {
        self.compare(ContentType::Json, expected, actual)
    }

    /// Compare two texts as single template leaves.
    ///
    /// # Errors
    /// See [`Scenario::compare`].
    pub fn compare_text(
        &mut self,
        expected: impl Into<Document>,
        actual: impl Into<Document>,
    ) -> Result<ComparisonResult, CompareError> {
        self.compare(ContentType::Text, expected, actual)
    }

    /// Compare two JSON documents, failing on any difference.
    ///
    /// # Errors
    /// Returns [`CompareError::Mismatch`] listing every difference, or the
    /// errors of [`Scenario::compare`].
    pub fn assert_json(
        &mut self,
        expected: impl Into<Document>,
        actual: impl Into<Document>,
    ) -> Result<(), CompareError> {
        self.compare_json(expected, actual)?.into_result().map(drop)
    }

    /// Compare two texts, failing on any difference.
    ///
    /// # Errors
    /// Returns [`CompareError::Mismatch`] when the texts differ, or the
    /// errors of [`Scenario::compare`].
    pub fn assert_text(
        &mut self,
        expected: impl Into<Document>,
        actual: impl Into<Document>,
    ) -> Result<(), CompareError> {
        self.compare_text(expected, actual)?.into_result().map(drop)
    }

    /// Substitute bound symbols into `template` verbatim.
    ///
    /// # Errors
    /// Returns [`PatternError::UnboundSymbol`] naming the first placeholder
    /// with no binding.
    pub fn resolve(&self, template: &str) -> Result<String, PatternError> {
        resolve(
            template,
            &self.symbols,
            Substitution::Plain,
            &self.config.delimiters,
        )
    }

    /// Substitute bound symbols into `template`, escaping each value so the
    /// result can be embedded in a regex template.
    ///
    /// # Errors
    /// Returns [`PatternError::UnboundSymbol`] naming the first placeholder
    /// with no binding.
    pub fn resolve_quoted(&self, template: &str) -> Result<String, PatternError> {
        resolve(
            template,
            &self.symbols,
            Substitution::Quoted,
            &self.config.delimiters,
        )
    }

    /// Symbols bound so far.
    #[must_use]
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Bind a symbol directly, returning its previous value.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.symbols.insert(name, value)
    }

    /// Settings in effect for this scenario.
    #[must_use]
    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Forget every symbol, ready for the next scenario.
    pub fn reset(&mut self) {
        debug!("clearing {} scenario symbols", self.symbols.len());
        self.symbols.clear();
    }

    fn commit(&mut self, captured: &SymbolTable) {
        for (name, value) in captured.iter() {
            info!("captured symbol {name} = {value:?}");
            self.symbols.insert(name, value);
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
    use crate::config::FieldMode;
    use crate::report::MismatchKind;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn scenario() -> Scenario {
        Scenario::new(CompareConfig::default())
    }

    #[rstest]
    fn captured_symbol_is_resolved_in_a_later_step(mut scenario: Scenario) {
        scenario
            .assert_json(
                json!({"id": "~[uid]", "status": "ok"}),
                json!({"id": "abc-123", "status": "ok"}),
            )
            .unwrap();
        assert_eq!(scenario.resolve("/users/~[uid]").unwrap(), "/users/abc-123");
    }

    #[rstest]
    fn repeating_a_passing_comparison_keeps_symbols(mut scenario: Scenario) {
        let expected = json!({"id": "~[uid]"});
        let actual = json!({"id": "abc-123"});
        scenario.assert_json(expected.clone(), actual.clone()).unwrap();
        let before = scenario.symbols().clone();
        scenario.assert_json(expected, actual).unwrap();
        assert_eq!(scenario.symbols(), &before);
    }

    #[rstest]
    fn bound_symbol_constrains_later_comparisons(mut scenario: Scenario) {
        scenario.assert_text("~[uid]", "abc-123").unwrap();
        let result = scenario.compare_text("id=~[uid]", "id=other").unwrap();
        assert!(!result.is_match());
        assert!(scenario.compare_text("id=~[uid]", "id=abc-123").unwrap().is_match());
    }

    #[rstest]
    fn failed_comparison_does_not_commit(mut scenario: Scenario) {
        let result = scenario
            .compare_json(
                json!({"id": "~[uid]", "status": "ok"}),
                json!({"id": "a", "status": "ko"}),
            )
            .unwrap();
        assert!(!result.is_match());
        assert!(scenario.symbols().is_empty());
    }

    #[rstest]
    fn assert_surfaces_every_mismatch(mut scenario: Scenario) {
        let err = scenario
            .assert_json(json!([1, 2, 3]), json!([1, 5]))
            .unwrap_err();
        let report = match err {
            CompareError::Mismatch(report) => report,
            other => panic!("expected a mismatch report, got {other}"),
        };
        let kinds: Vec<_> = report.mismatches().iter().map(|m| m.kind).collect();
        assert_eq!(kinds, [MismatchKind::Length, MismatchKind::Value]);
    }

    #[rstest]
    fn unbound_symbol_is_an_error(scenario: Scenario) {
        let err = scenario.resolve("/users/~[uid]").unwrap_err();
        assert!(matches!(
            err,
            PatternError::UnboundSymbol { ref name, position: 7 } if name == "uid"
        ));
    }

    #[rstest]
    fn quoted_resolution_escapes_values(mut scenario: Scenario) {
        scenario.bind("price", "4.20");
        assert_eq!(scenario.resolve("~[price] EUR").unwrap(), "4.20 EUR");
        assert_eq!(scenario.resolve_quoted("~[price] EUR").unwrap(), r"4\.20 EUR");
    }

    #[rstest]
    fn reset_forgets_symbols(mut scenario: Scenario) {
        scenario.assert_text("~[x]", "1").unwrap();
        scenario.reset();
        assert!(scenario.symbols().is_empty());
        assert!(scenario.resolve("~[x]").is_err());
    }

    #[test]
    fn config_is_applied_to_comparisons() {
        let mut scenario =
            Scenario::new(CompareConfig::default().with_field_mode(FieldMode::Strict));
        assert_eq!(scenario.config().field_mode, FieldMode::Strict);
        let result = scenario
            .compare_json(json!({"a": 1}), json!({"a": 1, "b": 2}))
            .unwrap();
        assert_eq!(result.mismatches().len(), 1);
    }
}
