//! Dot-separated logger key paths

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Default separator between key path components
pub const KEY_PATH_SEPARATOR: &str = ".";

/// Hierarchical identifier of a logger, e.g. `"Network.Http"`.
///
/// Components are never empty: parsing drops empty segments, so `""`,
/// `"."` and `"Default."` all parse without failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KeyPath {
    components: Vec<String>,
}

impl KeyPath {
    /// Key path from already split components. Empty components are dropped.
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            components: components
                .into_iter()
                .map(Into::into)
                .filter(|component| !component.is_empty())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn parse(s: &str) -> Self {
        Self::new(s.split(KEY_PATH_SEPARATOR))
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.components.first().map(String::as_str)
    }

    /// Splits off the head component, returning it and the remaining path.
    pub fn pop_first(&self) -> (Option<String>, KeyPath) {
        match self.components.split_first() {
            Some((head, tail)) => (
                Some(head.clone()),
                KeyPath {
                    components: tail.to_vec(),
                },
            ),
            None => (None, KeyPath::empty()),
        }
    }

    #[must_use]
    pub fn appending_component(&self, component: impl Into<String>) -> KeyPath {
        let mut components = self.components.clone();
        components.push(component.into());
        KeyPath::new(components)
    }

    #[must_use]
    pub fn prepending_component(&self, component: impl Into<String>) -> KeyPath {
        let mut components = Vec::with_capacity(self.components.len() + 1);
        components.push(component.into());
        components.extend(self.components.iter().cloned());
        KeyPath::new(components)
    }

    pub fn to_string_with_separator(&self, separator: &str) -> String {
        self.components.join(separator)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_separator(KEY_PATH_SEPARATOR))
    }
}

impl FromStr for KeyPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(KeyPath::parse(s))
    }
}

impl From<&str> for KeyPath {
    fn from(s: &str) -> Self {
        KeyPath::parse(s)
    }
}

impl From<String> for KeyPath {
    fn from(s: String) -> Self {
        KeyPath::parse(&s)
    }
}

impl From<&String> for KeyPath {
    fn from(s: &String) -> Self {
        KeyPath::parse(s)
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(components: Vec<String>) -> Self {
        KeyPath::new(components)
    }
}

impl From<&KeyPath> for KeyPath {
    fn from(key_path: &KeyPath) -> Self {
        key_path.clone()
    }
}

impl From<KeyPath> for String {
    fn from(key_path: KeyPath) -> Self {
        key_path.to_string()
    }
}
