//! Scenario-scoped symbol storage.
//!
//! A [`SymbolTable`] maps placeholder names to the text they last captured.
//! It preserves insertion order so reports list symbols in the order the
//! scenario discovered them, and it only grows during a scenario: entries
//! are added or overwritten, and the table is emptied with
//! [`SymbolTable::clear`] when the next scenario starts.
//!
//! # Examples
//!
//! ```
//! use scenario_match::SymbolTable;
//!
//! let mut table = SymbolTable::new();
//! table.insert("uid", "abc-123");
//! table.insert("name", "bob");
//! table.insert("uid", "xyz-789");
//! assert_eq!(table.get("uid"), Some("xyz-789"));
//! let names: Vec<_> = table.iter().map(|(name, _)| name).collect();
//! assert_eq!(names, ["uid", "name"]);
//! ```

use hashbrown::HashMap;
use scenario_match_patterns::Bindings;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Insertion-ordered map from symbol name to captured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    /// Construct an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, returning the previous value when present.
    ///
    /// Overwriting keeps the position of the first insertion.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        if let Some(&slot) = self.index.get(&name) {
            if let Some(entry) = self.entries.get_mut(slot) {
                return Some(std::mem::replace(&mut entry.1, value));
            }
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
        None
    }

    /// Look up the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let slot = *self.index.get(name)?;
        self.entries.get(slot).map(|(_, value)| value.as_str())
    }

    /// Return `true` when `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of bound symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when no symbol is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Remove every binding.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl Bindings for SymbolTable {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for SymbolTable {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            let _ = self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Read-through view layering uncommitted captures over a base table.
///
/// Comparisons collect captures here so later leaves of the same document
/// can reference them before they are committed to the scenario.
#[derive(Debug, Clone)]
pub(crate) struct Layered<'a> {
    base: &'a SymbolTable,
    pending: SymbolTable,
}

impl<'a> Layered<'a> {
    pub(crate) fn new(base: &'a SymbolTable) -> Self {
        Self {
            base,
            pending: SymbolTable::new(),
        }
    }

    pub(crate) fn into_pending(self) -> SymbolTable {
        self.pending
    }

    pub(crate) fn bind_all(&mut self, captures: Vec<(String, String)>) {
        self.pending.extend(captures);
    }
}

impl Bindings for Layered<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.pending.get(name).or_else(|| self.base.get(name))
    }
}
