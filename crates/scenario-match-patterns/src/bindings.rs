//! Lookup seam for symbols that are already bound.

use std::collections::HashMap;
use std::hash::BuildHasher;

/// Read access to previously captured symbol values.
///
/// The synthesizer consults a `Bindings` implementation to replace
/// placeholders whose names already carry a value, and
/// [`resolve`](crate::resolve) uses it to render templates.
///
/// # Examples
/// ```
/// use scenario_match_patterns::Bindings;
///
/// let bound = vec![("uid".to_string(), "abc-123".to_string())];
/// assert_eq!(bound.as_slice().lookup("uid"), Some("abc-123"));
/// assert_eq!(bound.as_slice().lookup("missing"), None);
/// ```
pub trait Bindings {
    /// Return the value bound to `name`, if any.
    fn lookup(&self, name: &str) -> Option<&str>;
}

/// Bindings that never resolve a name.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBindings;

impl Bindings for NoBindings {
    fn lookup(&self, _name: &str) -> Option<&str> {
        None
    }
}

impl<S: BuildHasher> Bindings for HashMap<String, String, S> {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

// Later entries shadow earlier ones, matching "last write wins".
impl Bindings for [(String, String)] {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl<B: Bindings + ?Sized> Bindings for &B {
    fn lookup(&self, name: &str) -> Option<&str> {
        (**self).lookup(name)
    }
}
