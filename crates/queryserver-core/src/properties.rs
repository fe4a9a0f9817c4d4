//! Connection property bag passed alongside the URL to a metadata provider.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::config::Configuration;

/// Pattern selecting configuration keys that pass through as connection
/// properties. Matched with find semantics, so the pattern may occur anywhere
/// in the key.
pub const CONNECTION_PROPERTY_PATTERN: &str = "avatica.*";

fn connection_property_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(CONNECTION_PROPERTY_PATTERN).expect("Invalid connection property pattern")
    })
}

/// Ordered string properties for a single provider construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: BTreeMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a bag with every configuration entry matching
    /// [`CONNECTION_PROPERTY_PATTERN`], and nothing else.
    pub fn from_configuration(conf: &Configuration) -> Self {
        Self {
            entries: conf.vals_by_regex(connection_property_regex()),
        }
    }

    /// Inserts a property, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> Option<String> {
        self.entries.insert(key.into(), value.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
