//! Placeholder template utilities for scenario-match.
//!
//! A template is an expected value that may be a literal string, a regular
//! expression, or either annotated with named placeholders such as
//! `~[name]`. This crate turns templates into anchored matching patterns,
//! extracts the text each placeholder captured, and resolves placeholders
//! back into concrete values.

mod bindings;
mod capture;
mod delimiters;
mod errors;
mod pattern;

pub use bindings::{Bindings, NoBindings};
pub use capture::{Substitution, extract, extract_with, resolve};
pub use delimiters::{DEFAULT_END, DEFAULT_START, Delimiters};
pub use errors::PatternError;
pub use pattern::{
    Synthesis, SynthesisOptions, TemplateMode, TemplateModeParseError, placeholder_names,
    synthesize, synthesize_with,
};
