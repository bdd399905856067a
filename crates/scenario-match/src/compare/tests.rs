//! Unit tests for the structural comparator.

use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::report::{Mismatch, MismatchKind};
use crate::symbols::SymbolTable;

fn compare_json(
    config: &CompareConfig,
    expected: Value,
    actual: Value,
    symbols: &SymbolTable,
) -> ComparisonResult {
    match JsonComparator::new(config).compare(&expected.into(), &actual.into(), symbols) {
        Ok(result) => result,
        Err(err) => panic!("comparison should not error: {err}"),
    }
}

fn lenient(expected: Value, actual: Value) -> ComparisonResult {
    compare_json(&CompareConfig::default(), expected, actual, &SymbolTable::new())
}

fn strict(expected: Value, actual: Value) -> ComparisonResult {
    let config = CompareConfig::default().with_field_mode(FieldMode::Strict);
    compare_json(&config, expected, actual, &SymbolTable::new())
}

fn kinds(result: &ComparisonResult) -> Vec<(String, MismatchKind)> {
    result
        .mismatches()
        .iter()
        .map(|m| (m.path.clone(), m.kind))
        .collect()
}

#[test]
fn captures_placeholder_inside_object() {
    let result = lenient(
        json!({"id": "~[uid]", "status": "ok"}),
        json!({"id": "abc-123", "status": "ok"}),
    );
    assert!(result.is_match());
    assert_eq!(result.captured().get("uid"), Some("abc-123"));
}

#[test]
fn field_name_placeholder_captures_actual_name() {
    let result = lenient(json!({"~[key]": 10}), json!({"total": 10}));
    assert!(result.is_match());
    assert_eq!(result.captured().get("key"), Some("total"));
}

#[test]
fn field_name_placeholder_still_compares_value() {
    let result = lenient(json!({"~[key]": 11}), json!({"total": 10}));
    assert_eq!(kinds(&result), vec![("/~0[key]".to_string(), MismatchKind::Value)]);
    assert!(result.captured().is_empty());
}

#[test]
fn exact_field_names_are_settled_before_templates() {
    let result = lenient(
        json!({"~[k]": "~[v]", "name": "x"}),
        json!({"name": "x", "total": 5}),
    );
    assert!(result.is_match(), "{result}");
    assert_eq!(result.captured().get("k"), Some("total"));
    assert_eq!(result.captured().get("v"), Some("5"));
}

#[test]
fn rejected_candidates_do_not_leak_captures() {
    let result = lenient(
        json!({"~[k]": {"kind": "b", "ref": "~[r]"}}),
        json!({"first": {"kind": "a", "ref": "1"}, "second": {"kind": "b", "ref": "2"}}),
    );
    assert!(result.is_match(), "{result}");
    assert_eq!(result.captured().get("k"), Some("second"));
    assert_eq!(result.captured().get("r"), Some("2"));
}

#[test]
fn missing_field_is_reported_in_both_modes() {
    for result in [
        strict(json!({"a": 1, "b": 2}), json!({"a": 1})),
        lenient(json!({"a": 1, "b": 2}), json!({"a": 1})),
    ] {
        assert_eq!(kinds(&result), vec![("/b".to_string(), MismatchKind::MissingField)]);
    }
}

#[test]
fn extra_actual_fields_depend_on_field_mode() {
    let strict_result = strict(json!({"a": 1}), json!({"a": 1, "b": 2}));
    assert_eq!(
        kinds(&strict_result),
        vec![("/b".to_string(), MismatchKind::UnexpectedField)]
    );
    assert!(lenient(json!({"a": 1}), json!({"a": 1, "b": 2})).is_match());
}

#[test]
fn array_length_mismatch_still_compares_elements() {
    let result = lenient(json!([1, "~[x]", 3]), json!([2, "two"]));
    assert_eq!(
        kinds(&result),
        vec![
            (String::new(), MismatchKind::Length),
            ("/0".to_string(), MismatchKind::Value),
        ]
    );
    assert_eq!(
        result.mismatches().first(),
        Some(&Mismatch {
            path: String::new(),
            kind: MismatchKind::Length,
            expected: "3".into(),
            actual: "2".into(),
        })
    );
}

#[test]
fn collects_every_mismatch_in_one_pass() {
    let result = lenient(
        json!({"user": {"name": "alice", "age": 30}, "tags": ["a", "b"], "ok": true}),
        json!({"user": {"name": "bob", "age": "30"}, "tags": ["a", "c"], "ok": false}),
    );
    assert_eq!(
        kinds(&result),
        vec![
            ("/user/name".to_string(), MismatchKind::Value),
            ("/user/age".to_string(), MismatchKind::Type),
            ("/tags/1".to_string(), MismatchKind::Value),
            ("/ok".to_string(), MismatchKind::Value),
        ]
    );
}

#[rstest]
#[case(json!({"a": 1}), json!([1]))]
#[case(json!(null), json!("null"))]
#[case(json!("~[x]"), json!(null))]
#[case(json!([1]), json!({"0": 1}))]
#[case(json!(1), json!("1"))]
fn type_mismatches_never_coerce(#[case] expected: Value, #[case] actual: Value) {
    let result = lenient(expected, actual);
    assert_eq!(kinds(&result), vec![(String::new(), MismatchKind::Type)]);
}

#[test]
fn string_templates_match_numbers_and_booleans() {
    let result = lenient(json!({"id": "~[id]", "flag": "true"}), json!({"id": 42, "flag": true}));
    assert!(result.is_match());
    assert_eq!(result.captured().get("id"), Some("42"));
}

#[test]
fn numbers_compare_by_value() {
    assert!(lenient(json!(1.0), json!(1)).is_match());
    assert!(!lenient(json!(1.5), json!(105)).is_match());
    assert!(lenient(json!(-7), json!(-7)).is_match());
}

#[rstest]
#[case(json!(9_007_199_254_740_993_u64), json!(9_007_199_254_740_992_u64))]
#[case(json!(u64::MAX), json!(u64::MAX - 1))]
#[case(json!(-9_007_199_254_740_993_i64), json!(-9_007_199_254_740_992_i64))]
#[case(json!(-1), json!(u64::MAX))]
fn large_integers_compare_exactly(#[case] expected: Value, #[case] actual: Value) {
    let result = lenient(json!({"id": expected}), json!({"id": actual}));
    assert_eq!(kinds(&result), vec![("/id".to_string(), MismatchKind::Value)]);
}

#[test]
fn bound_symbols_become_expectations() {
    let symbols: SymbolTable = [("uid", "abc-123")].into_iter().collect();
    let config = CompareConfig::default();
    let pass = compare_json(&config, json!({"id": "~[uid]"}), json!({"id": "abc-123"}), &symbols);
    assert!(pass.is_match());
    assert!(pass.captured().is_empty());
    let fail = compare_json(&config, json!({"id": "~[uid]"}), json!({"id": "xyz"}), &symbols);
    assert_eq!(kinds(&fail), vec![("/id".to_string(), MismatchKind::Value)]);
}

#[test]
fn captures_are_visible_to_later_leaves() {
    let result = lenient(
        json!({"id": "~[id]", "self": "/users/~[id]"}),
        json!({"id": "7", "self": "/users/7"}),
    );
    assert!(result.is_match());

    let mismatch = lenient(
        json!({"id": "~[id]", "self": "/users/~[id]"}),
        json!({"id": "7", "self": "/users/8"}),
    );
    assert_eq!(kinds(&mismatch), vec![("/self".to_string(), MismatchKind::Value)]);
}

#[test]
fn failed_comparison_captures_nothing() {
    let result = lenient(json!({"id": "~[uid]", "status": "ok"}), json!({"id": "a", "status": "ko"}));
    assert!(!result.is_match());
    assert!(result.captured().is_empty());
}

#[test]
fn malformed_json_text_is_an_error() {
    let comparator = JsonComparator::new(&CompareConfig::default());
    let Err(err) = comparator.compare(
        &Document::Text("{\"a\": 1}".into()),
        &Document::Text("not json".into()),
        &SymbolTable::new(),
    ) else {
        panic!("malformed actual document should error");
    };
    assert!(matches!(
        err,
        CompareError::MalformedDocument {
            side: Side::Actual,
            ..
        }
    ));
}

#[test]
fn json_text_is_parsed_before_comparison() {
    let comparator = JsonComparator::new(&CompareConfig::default());
    let result = comparator
        .compare(
            &Document::Text(r#"{"a": "~[a]"}"#.into()),
            &Document::Text(r#"{"a": "x", "b": 1}"#.into()),
            &SymbolTable::new(),
        )
        .unwrap_or_else(|err| panic!("valid JSON should compare: {err}"));
    assert_eq!(result.captured().get("a"), Some("x"));
}

#[test]
fn forced_regex_mode_reports_pattern_errors_with_path() {
    let config = CompareConfig {
        template_mode: scenario_match_patterns::TemplateMode::Regex,
        ..CompareConfig::default()
    };
    let Err(err) = JsonComparator::new(&config).compare(
        &json!({"items": ["(unclosed"]}).into(),
        &json!({"items": ["x"]}).into(),
        &SymbolTable::new(),
    ) else {
        panic!("invalid regex should surface");
    };
    assert!(matches!(err, CompareError::Pattern { ref path, .. } if path == "/items/0"));
}

#[test]
fn auto_mode_degrades_invalid_regex_to_literal() {
    assert!(lenient(json!("(unclosed"), json!("(unclosed")).is_match());
    assert!(!lenient(json!("(unclosed"), json!("unclosed")).is_match());
}

#[rstest]
#[case(r"\d+", "7", true)]
#[case("user-~[name]-active", "user-bob-active", true)]
#[case("HELLO", "hello", true)]
#[case("hello", "hello world", false)]
fn text_comparator_matches_whole_value(
    #[case] template: &str,
    #[case] actual: &str,
    #[case] expected: bool,
) {
    let comparator = Comparator::for_content(ContentType::Text, &CompareConfig::default());
    let result = comparator
        .compare(&template.into(), &actual.into(), &SymbolTable::new())
        .unwrap_or_else(|err| panic!("template should compile: {err}"));
    assert_eq!(result.is_match(), expected);
}

#[test]
fn text_comparator_does_not_parse_json() {
    let comparator = Comparator::for_content(ContentType::Text, &CompareConfig::default());
    let result = comparator
        .compare(&"{not json".into(), &"{not json".into(), &SymbolTable::new())
        .unwrap_or_else(|err| panic!("text comparison should not parse: {err}"));
    assert!(result.is_match());
}
