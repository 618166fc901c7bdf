use super::ConfigError;
use super::path;
use crate::domain::LogLevel;
use crate::format::formatter::stringify;
use crate::format::{FormatSpec, Palette};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Fully resolved configuration of one sink.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SinkConfig {
    pub application: String,
    pub application_version: String,
    /// Verbosity threshold; entries ranked above it are not written.
    pub level: u8,
    /// Name the sink was registered under.
    pub logger: String,
    /// Substituted for an entry with no event.
    pub default_event: String,
    /// Fallback text for a `%level%` token only. Every entry carries an
    /// explicit level, so this never changes which level is logged or
    /// whether the sink emits it.
    pub default_level: LogLevel,
    pub format: FormatSpec,
    pub show_colours: bool,
    pub colours: Palette,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            application: String::new(),
            application_version: String::new(),
            level: 5,
            logger: "stdout".to_string(),
            default_event: "UNKNOWN".to_string(),
            default_level: LogLevel::Info,
            format: FormatSpec::default(),
            show_colours: false,
            colours: Palette::default(),
            settings: Map::new(),
        }
    }
}

/// `useColour` and `showColours` name the same option.
fn canonical(key: &str) -> &str {
    match key {
        "useColour" => "showColours",
        other => other,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl SinkConfig {
    /// Whether this sink writes entries of `level`.
    pub fn emits(&self, level: &LogLevel) -> bool {
        level.verbosity() <= self.level
    }

    /// The `default<Name>` fallback for a missing `%name%` token.
    pub fn token_default(&self, name: &str) -> Option<String> {
        match format!("default{}", capitalize(name)).as_str() {
            "defaultEvent" => Some(self.default_event.clone()),
            "defaultLevel" => Some(self.default_level.to_string()),
            key => self.settings.get(key).map(stringify),
        }
    }

    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(Value::as_str)
    }

    /// Reads a dotted property path, e.g. `colours.error.event`.
    pub fn get(&self, property: &str) -> Option<Value> {
        let segments = path::segments(property);
        let (head, rest) = segments.split_first()?;
        let tree = serde_json::to_value(self).ok()?;
        let node = tree.get(canonical(head))?;
        path::lookup(node, rest).cloned()
    }

    /// Writes a dotted property path. Typed options are re-validated.
    pub fn set(&mut self, property: &str, value: Value) -> Result<(), ConfigError> {
        let segments = path::segments(property);
        let Some((head, rest)) = segments.split_first() else {
            return Err(ConfigError::UnknownProperty(property.to_string()));
        };

        let outcome = match canonical(head) {
            "application" => assign(&mut self.application, rest, value),
            "applicationVersion" => assign(&mut self.application_version, rest, value),
            "level" => assign(&mut self.level, rest, value),
            "logger" => assign(&mut self.logger, rest, value),
            "defaultEvent" => assign(&mut self.default_event, rest, value),
            "defaultLevel" => assign(&mut self.default_level, rest, value),
            "format" => assign(&mut self.format, rest, value),
            "showColours" => assign(&mut self.show_colours, rest, value),
            "colours" => assign(&mut self.colours, rest, value),
            key => {
                let slot = self
                    .settings
                    .entry(key.to_string())
                    .or_insert(Value::Null);
                path::assign(slot, rest, value);
                Ok(())
            }
        };

        outcome.map_err(|reason| ConfigError::InvalidSetting {
            sink: self.logger.clone(),
            property: property.to_string(),
            reason,
        })
    }
}

fn assign<T>(slot: &mut T, rest: &[&str], value: Value) -> Result<(), String>
where
    T: Serialize + DeserializeOwned,
{
    let updated = if rest.is_empty() {
        value
    } else {
        let mut current = serde_json::to_value(&*slot).map_err(|e| e.to_string())?;
        path::assign(&mut current, rest, value);
        current
    };
    *slot = serde_json::from_value(updated).map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryBuilder;
    use crate::format::Formatter;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let config = SinkConfig::default();
        assert_eq!(config.get("level"), Some(json!(5)));
        assert_eq!(config.get("defaultEvent"), Some(json!("UNKNOWN")));
        assert_eq!(config.get("defaultLevel"), Some(json!("INFO")));
        assert_eq!(config.get("logger"), Some(json!("stdout")));
    }

    #[test]
    fn test_set_and_get_typed_field() {
        let mut config = SinkConfig::default();
        config.set("level", json!(2)).unwrap();
        assert_eq!(config.level, 2);
        assert!(config.set("level", json!("loud")).is_err());
        assert_eq!(config.level, 2);
    }

    #[test]
    fn test_colour_alias() {
        let mut config = SinkConfig::default();
        config.set("useColour", json!(true)).unwrap();
        assert!(config.show_colours);
        assert_eq!(config.get("useColour"), Some(json!(true)));
    }

    #[test]
    fn test_nested_colour_path() {
        let mut config = SinkConfig::default();
        config.set("colours.error.event", json!(35)).unwrap();
        assert_eq!(config.get("colours.error.event"), Some(json!(35)));
        assert_eq!(config.colours.code(&LogLevel::Error, "event"), 35);
    }

    #[test]
    fn test_custom_settings_round_trip() {
        let mut config = SinkConfig::default();
        config.set("db.name", json!("logs")).unwrap();
        config.set("extension", json!("test")).unwrap();
        assert_eq!(config.get("db.name"), Some(json!("logs")));
        assert_eq!(config.setting_str("extension"), Some("test"));
        assert_eq!(config.get("missing"), None);
    }

    #[test]
    fn test_token_defaults() {
        let mut config = SinkConfig::default();
        config.settings.insert("defaultData".into(), json!({"empty": true}));
        assert_eq!(config.token_default("event").as_deref(), Some("UNKNOWN"));
        assert_eq!(config.token_default("level").as_deref(), Some("INFO"));
        assert!(config.token_default("data").unwrap().contains("\"empty\": true"));
        assert_eq!(config.token_default("message"), None);
    }

    #[test]
    fn test_default_level_does_not_override_entry_level() {
        let mut config = SinkConfig::default();
        config.application = "a".into();
        config.application_version = "1".into();
        config.default_level = LogLevel::Error;
        config.format = FormatSpec::template("%level%");
        let entry = EntryBuilder::new(&config).build(
            LogLevel::Debug,
            None,
            "m".into(),
            None,
            None,
        );
        assert_eq!(entry.log_level(), &LogLevel::Debug);
        assert_eq!(Formatter::new(Arc::new(config)).render(&entry), "DEBUG");
    }

    #[test]
    fn test_level_threshold() {
        let mut config = SinkConfig::default();
        config.level = 2;
        assert!(config.emits(&LogLevel::Error));
        assert!(config.emits(&LogLevel::Warning));
        assert!(!config.emits(&LogLevel::Info));
    }
}
