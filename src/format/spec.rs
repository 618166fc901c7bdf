use crate::domain::{LogEntry, LogLevel};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub type FormatFn = Arc<dyn Fn(&LogEntry) -> String + Send + Sync>;

/// How a sink turns an entry into text.
#[derive(Clone)]
pub enum FormatSpec {
    /// A `%token%` template.
    Template(String),
    /// Called with the entry; its output is used verbatim.
    Function(FormatFn),
    /// Lowercase level name (or `default`) to a nested spec.
    PerLevel(BTreeMap<String, FormatSpec>),
}

/// A spec narrowed down to one level.
pub enum Resolved<'a> {
    Template(&'a str),
    Function(&'a FormatFn),
}

impl FormatSpec {
    pub fn template(template: impl Into<String>) -> Self {
        FormatSpec::Template(template.into())
    }

    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&LogEntry) -> String + Send + Sync + 'static,
    {
        FormatSpec::Function(Arc::new(f))
    }

    pub fn per_level<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FormatSpec)>,
        K: Into<String>,
    {
        FormatSpec::PerLevel(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Picks the level-specific entry, falling back to `default`.
    pub fn resolve(&self, level: &LogLevel) -> Option<Resolved<'_>> {
        match self {
            FormatSpec::Template(template) => Some(Resolved::Template(template)),
            FormatSpec::Function(f) => Some(Resolved::Function(f)),
            FormatSpec::PerLevel(by_level) => by_level
                .get(&level.key())
                .or_else(|| by_level.get("default"))
                .and_then(|spec| spec.resolve(level)),
        }
    }

    /// Layers `top` over `self`: per-level maps merge key by key, anything
    /// else is replaced.
    pub fn merge(&mut self, top: &FormatSpec) {
        match (self, top) {
            (FormatSpec::PerLevel(base), FormatSpec::PerLevel(over)) => {
                for (key, spec) in over {
                    match base.get_mut(key) {
                        Some(existing) => existing.merge(spec),
                        None => {
                            base.insert(key.clone(), spec.clone());
                        }
                    }
                }
            }
            (slot, top) => *slot = top.clone(),
        }
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::String(template) => Ok(FormatSpec::Template(template)),
            Value::Object(fields) => fields
                .into_iter()
                .map(|(k, v)| Self::from_value(v).map(|spec| (k, spec)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(FormatSpec::PerLevel),
            other => Err(format!(
                "format must be a string or a map of level to format, got {other}"
            )),
        }
    }
}

impl Default for FormatSpec {
    fn default() -> Self {
        FormatSpec::Template("[%event%](%date%) - %message%".to_string())
    }
}

impl fmt::Debug for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatSpec::Template(template) => f.debug_tuple("Template").field(template).finish(),
            FormatSpec::Function(_) => f.write_str("Function(..)"),
            FormatSpec::PerLevel(by_level) => f.debug_tuple("PerLevel").field(by_level).finish(),
        }
    }
}

impl From<&str> for FormatSpec {
    fn from(s: &str) -> Self {
        FormatSpec::Template(s.to_string())
    }
}

impl Serialize for FormatSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FormatSpec::Template(template) => serializer.serialize_str(template),
            FormatSpec::Function(_) => serializer.serialize_unit(),
            FormatSpec::PerLevel(by_level) => by_level.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FormatSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FormatSpec::from_value(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_of(spec: &FormatSpec, level: LogLevel) -> Option<String> {
        match spec.resolve(&level) {
            Some(Resolved::Template(t)) => Some(t.to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_per_level_falls_back_to_default() {
        let spec = FormatSpec::per_level([
            ("warning", FormatSpec::from("%message%")),
            ("default", FormatSpec::from("[%event%] %message%")),
        ]);
        assert_eq!(template_of(&spec, LogLevel::Warning).as_deref(), Some("%message%"));
        assert_eq!(
            template_of(&spec, LogLevel::Info).as_deref(),
            Some("[%event%] %message%")
        );
    }

    #[test]
    fn test_per_level_without_default_resolves_to_none() {
        let spec = FormatSpec::per_level([("error", FormatSpec::from("%message%"))]);
        assert!(spec.resolve(&LogLevel::Info).is_none());
    }

    #[test]
    fn test_merge_keeps_untouched_levels() {
        let mut base = FormatSpec::per_level([
            ("default", FormatSpec::from("a")),
            ("error", FormatSpec::from("b")),
        ]);
        base.merge(&FormatSpec::per_level([("default", FormatSpec::from("c"))]));
        assert_eq!(template_of(&base, LogLevel::Info).as_deref(), Some("c"));
        assert_eq!(template_of(&base, LogLevel::Error).as_deref(), Some("b"));
    }

    #[test]
    fn test_merge_template_replaces_map() {
        let mut base = FormatSpec::per_level([("default", FormatSpec::from("a"))]);
        base.merge(&FormatSpec::from("%message%"));
        assert!(matches!(base, FormatSpec::Template(ref t) if t == "%message%"));
    }

    #[test]
    fn test_deserialize_string_and_map() {
        let plain: FormatSpec = serde_json::from_str("\"%event%\"").unwrap();
        assert!(matches!(plain, FormatSpec::Template(_)));

        let mapped: FormatSpec =
            serde_json::from_str(r#"{"warning": "%message%", "default": "%event%"}"#).unwrap();
        assert!(matches!(mapped, FormatSpec::PerLevel(ref m) if m.len() == 2));

        assert!(serde_json::from_str::<FormatSpec>("42").is_err());
    }
}
