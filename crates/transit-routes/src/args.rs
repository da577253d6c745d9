//! Route argument bag
//!
//! Values are opaque strings. Parsing them (e.g. `five` as a number) is
//! left to whichever screen consumes them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteArgs(BTreeMap<String, String>);

impl RouteArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fill in any name missing from `self` with the value from `defaults`
    pub fn or_defaults(mut self, defaults: &RouteArgs) -> Self {
        for (name, value) in defaults.iter() {
            self.0
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
        self
    }
}

impl<K, V> FromIterator<(K, V)> for RouteArgs
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl std::fmt::Display for RouteArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", name, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_override_defaults() {
        let defaults = RouteArgs::new().with("five", "").with("mode", "view");
        let args = RouteArgs::new().with("five", "12").or_defaults(&defaults);

        assert_eq!(args.get("five"), Some("12"));
        assert_eq!(args.get("mode"), Some("view"));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn test_display() {
        let args: RouteArgs = [("five", "9"), ("a", "x")].into_iter().collect();
        assert_eq!(args.to_string(), r#"{a: "x", five: "9"}"#);
        assert_eq!(RouteArgs::new().to_string(), "{}");
    }

    #[test]
    fn test_serialize_as_map() {
        let args = RouteArgs::new().with("five", "12");
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"{"five":"12"}"#);
    }
}
