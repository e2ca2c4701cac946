//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of an event, or the threshold of a logger or handler.
///
/// Levels are ordered by declaration rank. `All` and `Off` are meant as
/// thresholds: a logger at `All` passes everything, a logger at `Off` passes
/// only events that are themselves logged at `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    All = 0,
    Verbose = 1,
    Debug = 2,
    Info = 3,
    Warning = 4,
    Error = 5,
    Critical = 6,
    Off = 7,
}

impl LogLevel {
    /// Every level in ascending order
    pub const ALL_LEVELS: [LogLevel; 8] = [
        LogLevel::All,
        LogLevel::Verbose,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
        LogLevel::Off,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::All => "All",
            LogLevel::Verbose => "Verbose",
            LogLevel::Debug => "Debug",
            LogLevel::Info => "Info",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
            LogLevel::Off => "Off",
        }
    }

    /// Uppercase name used in formatted records
    pub fn as_upper_str(&self) -> &'static str {
        match self {
            LogLevel::All => "ALL",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
            LogLevel::Off => "OFF",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::All | LogLevel::Verbose => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
            LogLevel::Critical | LogLevel::Off => BrightRed,
        }
    }

    /// Whether an event at `level` passes a `threshold`.
    ///
    /// A missing level on either side always passes.
    #[inline]
    pub fn passes(level: Option<LogLevel>, threshold: Option<LogLevel>) -> bool {
        match (level, threshold) {
            (Some(level), Some(threshold)) => level >= threshold,
            _ => true,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(LogLevel::All),
            "verbose" => Ok(LogLevel::Verbose),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "critical" => Ok(LogLevel::Critical),
            "off" => Ok(LogLevel::Off),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        for input in ["debug", "DEBUG", "Debug", " dEbUg "] {
            assert_eq!(input.parse::<LogLevel>().unwrap(), LogLevel::Debug);
        }
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warning);
    }

    #[test]
    fn test_parse_rejects_unknown_names() {
        let err = "loud".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel { ref name } if name == "loud"));
        assert!("".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_ordering_follows_declaration() {
        let mut sorted = LogLevel::ALL_LEVELS;
        sorted.sort();
        assert_eq!(sorted, LogLevel::ALL_LEVELS);
        assert!(LogLevel::Verbose < LogLevel::Debug);
        assert!(LogLevel::Critical < LogLevel::Off);
    }

    #[test]
    fn test_passes() {
        assert!(LogLevel::passes(None, None));
        assert!(LogLevel::passes(Some(LogLevel::Verbose), None));
        assert!(LogLevel::passes(None, Some(LogLevel::Critical)));
        assert!(LogLevel::passes(Some(LogLevel::Info), Some(LogLevel::Debug)));
        assert!(LogLevel::passes(Some(LogLevel::Debug), Some(LogLevel::Debug)));
        assert!(!LogLevel::passes(Some(LogLevel::Verbose), Some(LogLevel::Debug)));
        assert!(!LogLevel::passes(Some(LogLevel::Critical), Some(LogLevel::Off)));
        assert!(LogLevel::passes(Some(LogLevel::Off), Some(LogLevel::Off)));
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"Warning\"");
        let level: LogLevel = serde_json::from_str("\"Critical\"").unwrap();
        assert_eq!(level, LogLevel::Critical);
    }
}
