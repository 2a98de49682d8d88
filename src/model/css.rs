//! Computed CSS property sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered map of CSS property names to values.
///
/// Ordering is by property name so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssProps(BTreeMap<String, String>);

impl CssProps {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Set a property when a value is available.
    pub fn set_opt(&mut self, name: &str, value: Option<String>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    /// Get a property value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Remove a property, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }

    /// Check whether a property is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Check if no property is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge another set into this one (other takes precedence).
    pub fn merge(&mut self, other: &CssProps) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Non-mutating version of [`CssProps::merge`].
    pub fn merged(&self, other: &CssProps) -> CssProps {
        let mut out = self.clone();
        out.merge(other);
        out
    }

    /// Serialize as the body of a `style` attribute or CSS rule.
    pub fn to_inline(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CssProps {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = CssProps::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_precedence() {
        let mut base: CssProps = [("color", "red"), ("font-size", "10pt")].into_iter().collect();
        let top: CssProps = [("color", "blue")].into_iter().collect();
        base.merge(&top);
        assert_eq!(base.get("color"), Some("blue"));
        assert_eq!(base.get("font-size"), Some("10pt"));
    }

    #[test]
    fn test_to_inline_is_sorted() {
        let props: CssProps = [("margin-top", "1pt"), ("color", "red")].into_iter().collect();
        assert_eq!(props.to_inline(), "color: red; margin-top: 1pt");
        assert_eq!(CssProps::new().to_inline(), "");
    }
}
