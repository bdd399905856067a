//! Templated structural comparison for behaviour-driven tests.
//!
//! Expected values are written as templates: literal text, regular
//! expressions, or either annotated with placeholders such as `~[uid]`.
//! Comparing a template against an actual value captures the text behind
//! each placeholder into a scenario-scoped [`SymbolTable`], so later steps
//! can [`resolve`](Scenario::resolve) those symbols into new requests or
//! require that the same value appears again.
//!
//! JSON documents are compared structurally: objects field by field,
//! arrays element by element, every string leaf as a template. All
//! differences are collected in one pass and reported with JSON Pointer
//! paths.
//!
//! ```
//! use scenario_match::{CompareConfig, Scenario};
//! use serde_json::json;
//!
//! let mut scenario = Scenario::new(CompareConfig::default());
//! let result = scenario
//!     .compare_json(
//!         json!({"id": "~[uid]", "status": "ok"}),
//!         json!({"id": "abc-123", "status": "ok", "ts": 1}),
//!     )
//!     .expect("documents are well formed");
//! assert!(result.is_match());
//! assert_eq!(scenario.symbols().get("uid"), Some("abc-123"));
//! ```

mod compare;
mod config;
mod document;
mod error;
mod poll;
mod report;
mod scenario;
mod symbols;

pub use compare::{Comparator, DocumentComparator, JsonComparator, TextComparator};
pub use config::{CompareConfig, ConfigError, FieldMode};
pub use document::{ContentType, Document};
pub use error::{CompareError, Side};
pub use poll::{PollError, PollPolicy, SupplierError};
pub use report::{ComparisonResult, Mismatch, MismatchKind, MismatchReport};
pub use scenario::Scenario;
pub use symbols::SymbolTable;

pub use scenario_match_patterns::{Delimiters, PatternError, Substitution, TemplateMode};
