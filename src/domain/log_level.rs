use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Severity of a log entry.
///
/// The four built-in levels have fixed verbosity ranks; any other name is
/// carried as `Custom` and ranks as the most verbose.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Debug,
    Warning,
    Error,
    Custom(String),
}

impl LogLevel {
    /// Uppercase wire name, e.g. `WARNING`.
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Custom(name) => name,
        }
    }

    /// Lowercase key used for per-level format and colour lookup.
    pub fn key(&self) -> String {
        self.as_str().to_lowercase()
    }

    /// Rank compared against a sink's `level` threshold.
    pub fn verbosity(&self) -> u8 {
        match self {
            LogLevel::Error => 1,
            LogLevel::Warning => 2,
            LogLevel::Info => 3,
            LogLevel::Debug => 4,
            LogLevel::Custom(_) => 5,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LogLevel::Error)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_uppercase().as_str() {
            "INFO" => LogLevel::Info,
            "DEBUG" => LogLevel::Debug,
            "WARNING" | "WARN" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            other => LogLevel::Custom(other.to_string()),
        })
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(LogLevel::from(name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(LogLevel::from("warning"), LogLevel::Warning);
        assert_eq!(LogLevel::from("Warn"), LogLevel::Warning);
        assert_eq!(LogLevel::from("ERROR"), LogLevel::Error);
        assert_eq!(LogLevel::from("audit"), LogLevel::Custom("AUDIT".into()));
    }

    #[test]
    fn test_keys_and_ranks() {
        assert_eq!(LogLevel::Warning.key(), "warning");
        assert!(LogLevel::Error.verbosity() < LogLevel::Debug.verbosity());
        assert_eq!(LogLevel::Custom("AUDIT".into()).verbosity(), 5);
    }

    #[test]
    fn test_serializes_as_wire_name() {
        let json = serde_json::to_string(&LogLevel::Debug).unwrap();
        assert_eq!(json, "\"DEBUG\"");
        let parsed: LogLevel = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(parsed, LogLevel::Info);
    }
}
