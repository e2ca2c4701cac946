//! Level configuration from environment variables or JSON documents

use super::{
    error::{LoggerError, Result},
    key_path::KeyPath,
    log_level::LogLevel,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Prefix of the environment variables read by `configure_from_environment`
pub const ENV_PREFIX: &str = "LOGTREE";

/// Map of key path to level name.
///
/// Level names are kept as strings so that one bad entry is reported
/// instead of rejecting the whole document.
///
/// ```
/// use logtree::LevelConfig;
///
/// let config = LevelConfig::from_json(r#"{ "levels": { "Net.Http": "debug" } }"#).unwrap();
/// assert_eq!(config.levels["Net.Http"], "debug");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default)]
    pub levels: BTreeMap<String, String>,
}

/// One validated `key path = level` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelAssignment {
    pub key_path: KeyPath,
    pub level: LogLevel,
}

impl fmt::Display for LevelAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key_path, self.level)
    }
}

/// An entry whose level name could not be parsed
#[derive(Debug)]
pub struct InvalidEntry {
    pub key_path: KeyPath,
    pub value: String,
    pub error: LoggerError,
}

impl LevelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, key_path: impl Into<String>, level: impl Into<String>) -> Self {
        self.levels.insert(key_path.into(), level.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("reading level config", path.display().to_string(), e)
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Collects variables whose first key path component equals `prefix`.
    ///
    /// The prefix component is dropped, so `LOGTREE.Net.Http=Debug` targets
    /// `Net.Http` and a bare `LOGTREE=Info` targets the root.
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let levels = vars
            .into_iter()
            .filter_map(|(name, value)| {
                let (first, key_path) = KeyPath::parse(name.as_ref()).pop_first();
                (first.as_deref() == Some(prefix)).then(|| (key_path.to_string(), value.into()))
            })
            .collect();
        Self { levels }
    }

    /// Splits the entries into parsed assignments and invalid ones
    pub fn resolve(&self) -> (Vec<LevelAssignment>, Vec<InvalidEntry>) {
        let mut assignments = Vec::new();
        let mut invalid = Vec::new();

        for (path, value) in &self.levels {
            let key_path = KeyPath::parse(path);
            match value.parse::<LogLevel>() {
                Ok(level) => assignments.push(LevelAssignment { key_path, level }),
                Err(error) => invalid.push(InvalidEntry {
                    key_path,
                    value: value.clone(),
                    error,
                }),
            }
        }

        (assignments, invalid)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_vars_filters_by_prefix() {
        let vars = vec![
            ("LOGTREE.Net.Http", "Debug"),
            ("LOGTREE", "warning"),
            ("LOGTREEX.Other", "Error"),
            ("PATH", "/usr/bin"),
        ];
        let config = LevelConfig::from_vars(ENV_PREFIX, vars);

        assert_eq!(config.levels.len(), 2);
        assert_eq!(config.levels["Net.Http"], "Debug");
        assert_eq!(config.levels[""], "warning");
    }

    #[test]
    fn test_resolve_separates_invalid_levels() {
        let config = LevelConfig::new()
            .with_level("Net", "verbose")
            .with_level("Db", "LOUD");

        let (assignments, invalid) = config.resolve();

        assert_eq!(
            assignments,
            vec![LevelAssignment {
                key_path: KeyPath::parse("Net"),
                level: LogLevel::Verbose,
            }]
        );
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].value, "LOUD");
        assert!(matches!(invalid[0].error, LoggerError::InvalidLevel { .. }));
    }

    #[test]
    fn test_json_document() {
        let config = LevelConfig::from_json(r#"{"levels": {"A.B": "Info"}}"#).unwrap();
        assert_eq!(config, LevelConfig::new().with_level("A.B", "Info"));

        let empty = LevelConfig::from_json("{}").unwrap();
        assert!(empty.is_empty());

        let err = LevelConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }

    #[test]
    fn test_from_file() {
        let file = NamedTempFile::new().expect("Failed to create temp file");
        std::fs::write(file.path(), r#"{"levels": {"Cache": "Error"}}"#).unwrap();

        let config = LevelConfig::from_file(file.path()).unwrap();
        assert_eq!(config.levels["Cache"], "Error");

        let err = LevelConfig::from_file(file.path().with_extension("missing")).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }

    #[test]
    fn test_to_json() {
        let json = LevelConfig::new().with_level("A", "Debug").to_json().unwrap();
        assert_eq!(LevelConfig::from_json(&json).unwrap().levels["A"], "Debug");
    }
}
