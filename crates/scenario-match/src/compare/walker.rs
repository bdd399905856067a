//! Lock-step traversal of expected and actual JSON trees.

use log::trace;
use scenario_match_patterns::{PatternError, Synthesis, SynthesisOptions, synthesize_with};
use serde_json::{Map, Number, Value};

use crate::config::FieldMode;
use crate::document::{scalar_text, type_label};
use crate::error::CompareError;
use crate::report::{Mismatch, MismatchKind, child_index, child_key};
use crate::symbols::Layered;

/// Placeholder text for the absent side of a field mismatch.
const ABSENT: &str = "<absent>";

/// Recursive comparison state shared by one walk.
pub(crate) struct Walker<'o> {
    options: &'o SynthesisOptions,
    field_mode: FieldMode,
}

impl<'o> Walker<'o> {
    pub(crate) fn new(options: &'o SynthesisOptions, field_mode: FieldMode) -> Self {
        Self {
            options,
            field_mode,
        }
    }

    /// Compare `expected` against `actual`, appending every difference.
    pub(crate) fn compare_node(
        &self,
        expected: &Value,
        actual: &Value,
        path: &str,
        scope: &mut Layered<'_>,
        out: &mut Vec<Mismatch>,
    ) -> Result<(), CompareError> {
        match (expected, actual) {
            (Value::Object(exp), Value::Object(act)) => {
                self.compare_object(exp, act, path, scope, out)
            }
            (Value::Array(exp), Value::Array(act)) => {
                self.compare_array(exp, act, path, scope, out)
            }
            (Value::Null, Value::Null) => Ok(()),
            (Value::String(template), _) if is_scalar(actual) => {
                let text = scalar_text(actual).unwrap_or_default();
                self.compare_template(template, &text, path, scope, out)
            }
            (Value::Number(exp), Value::Number(act)) => {
                if !numbers_equal(exp, act) {
                    out.push(Mismatch::new(
                        path,
                        MismatchKind::Value,
                        exp.to_string(),
                        act.to_string(),
                    ));
                }
                Ok(())
            }
            (Value::Bool(exp), Value::Bool(act)) => {
                if exp != act {
                    out.push(Mismatch::new(
                        path,
                        MismatchKind::Value,
                        exp.to_string(),
                        act.to_string(),
                    ));
                }
                Ok(())
            }
            _ => {
                out.push(Mismatch::new(
                    path,
                    MismatchKind::Type,
                    type_label(expected),
                    type_label(actual),
                ));
                Ok(())
            }
        }
    }

    /// Match one template leaf, binding new captures into `scope`.
    pub(crate) fn compare_template(
        &self,
        template: &str,
        actual: &str,
        path: &str,
        scope: &mut Layered<'_>,
        out: &mut Vec<Mismatch>,
    ) -> Result<(), CompareError> {
        let synthesis = self.synthesize(template, path, scope)?;
        match synthesis.captures(actual) {
            Some(captures) => {
                trace!(
                    "{path:?}: {template:?} matched {actual:?} ({} mode)",
                    synthesis.mode()
                );
                scope.bind_all(captures);
            }
            None => out.push(Mismatch::new(path, MismatchKind::Value, template, actual)),
        }
        Ok(())
    }

    fn synthesize(
        &self,
        template: &str,
        path: &str,
        scope: &Layered<'_>,
    ) -> Result<Synthesis, CompareError> {
        synthesize_with(template, self.options, scope).map_err(|source: PatternError| {
            CompareError::Pattern {
                path: path.to_owned(),
                source,
            }
        })
    }

    fn compare_array(
        &self,
        expected: &[Value],
        actual: &[Value],
        path: &str,
        scope: &mut Layered<'_>,
        out: &mut Vec<Mismatch>,
    ) -> Result<(), CompareError> {
        if expected.len() != actual.len() {
            out.push(Mismatch::new(
                path,
                MismatchKind::Length,
                expected.len().to_string(),
                actual.len().to_string(),
            ));
        }
        for (index, (exp, act)) in expected.iter().zip(actual).enumerate() {
            self.compare_node(exp, act, &child_index(path, index), scope, out)?;
        }
        Ok(())
    }

    /// Compare two objects field by field.
    ///
    /// Expected fields whose exact name exists in `actual` are settled first
    /// so template field names cannot claim them. Mismatches are reported in
    /// expected-field order.
    fn compare_object(
        &self,
        expected: &Map<String, Value>,
        actual: &Map<String, Value>,
        path: &str,
        scope: &mut Layered<'_>,
        out: &mut Vec<Mismatch>,
    ) -> Result<(), CompareError> {
        let entries: Vec<(&String, &Value)> = actual.iter().collect();
        let mut used = vec![false; entries.len()];
        let fields: Vec<(&String, &Value)> = expected.iter().collect();
        let (exact, templated): (Vec<usize>, Vec<usize>) =
            (0..fields.len()).partition(|&index| {
                fields
                    .get(index)
                    .is_some_and(|(key, _)| actual.contains_key(key.as_str()))
            });

        let mut per_field: Vec<Vec<Mismatch>> = vec![Vec::new(); fields.len()];
        for index in exact.into_iter().chain(templated) {
            let Some(&(exp_key, exp_value)) = fields.get(index) else {
                continue;
            };
            let mismatches =
                self.compare_field(exp_key, exp_value, &entries, &mut used, path, scope)?;
            if let Some(slot) = per_field.get_mut(index) {
                *slot = mismatches;
            }
        }
        out.extend(per_field.into_iter().flatten());

        if self.field_mode == FieldMode::Strict {
            for ((key, _), taken) in entries.iter().zip(&used) {
                if !taken {
                    out.push(Mismatch::new(
                        &child_key(path, key),
                        MismatchKind::UnexpectedField,
                        ABSENT,
                        key.as_str(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Find the actual field answering one expected field and compare values.
    ///
    /// Each candidate is tried against a copy of `scope`; only the accepted
    /// candidate's captures survive.
    fn compare_field(
        &self,
        exp_key: &str,
        exp_value: &Value,
        entries: &[(&String, &Value)],
        used: &mut [bool],
        path: &str,
        scope: &mut Layered<'_>,
    ) -> Result<Vec<Mismatch>, CompareError> {
        let field_path = child_key(path, exp_key);
        let key_template = self.synthesize(exp_key, &field_path, scope)?;
        let candidates = candidate_fields(exp_key, &key_template, entries, used);

        let mut fallback: Option<(usize, Vec<Mismatch>)> = None;
        for (slot, key_captures) in candidates {
            let Some(&(_, act_value)) = entries.get(slot) else {
                continue;
            };
            let mut trial_scope = scope.clone();
            trial_scope.bind_all(key_captures);
            let mut trial = Vec::new();
            self.compare_node(
                exp_value,
                act_value,
                &field_path,
                &mut trial_scope,
                &mut trial,
            )?;
            if trial.is_empty() {
                *scope = trial_scope;
                mark_used(used, slot);
                return Ok(Vec::new());
            }
            if fallback.is_none() {
                fallback = Some((slot, trial));
            }
        }

        match fallback {
            Some((slot, mismatches)) => {
                mark_used(used, slot);
                Ok(mismatches)
            }
            None => Ok(vec![Mismatch::new(
                &field_path,
                MismatchKind::MissingField,
                exp_key,
                ABSENT,
            )]),
        }
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

/// Integers compare exactly; a float on either side compares as `f64`.
fn numbers_equal(expected: &Number, actual: &Number) -> bool {
    if let (Some(exp), Some(act)) = (expected.as_i64(), actual.as_i64()) {
        return exp == act;
    }
    if let (Some(exp), Some(act)) = (expected.as_u64(), actual.as_u64()) {
        return exp == act;
    }
    if expected.is_f64() || actual.is_f64() {
        return expected.as_f64() == actual.as_f64();
    }
    false
}

fn mark_used(used: &mut [bool], slot: usize) {
    if let Some(flag) = used.get_mut(slot) {
        *flag = true;
    }
}

/// Unused actual fields whose names satisfy the expected field template,
/// with the symbols each name captured.
///
/// An identically named field is tried first; the rest follow in actual
/// document order.
fn candidate_fields(
    exp_key: &str,
    key_template: &Synthesis,
    entries: &[(&String, &Value)],
    used: &[bool],
) -> Vec<(usize, Vec<(String, String)>)> {
    let unused = |slot: &usize| !used.get(*slot).copied().unwrap_or(true);
    let exact = entries
        .iter()
        .position(|(key, _)| key.as_str() == exp_key)
        .filter(unused);

    let mut candidates: Vec<(usize, Vec<(String, String)>)> = Vec::new();
    if let Some(slot) = exact {
        let captures = key_template.captures(exp_key).unwrap_or_default();
        candidates.push((slot, captures));
    }
    for (slot, (key, _)) in entries.iter().enumerate() {
        if Some(slot) == exact || !unused(&slot) {
            continue;
        }
        if let Some(captures) = key_template.captures(key) {
            candidates.push((slot, captures));
        }
    }
    candidates
}
