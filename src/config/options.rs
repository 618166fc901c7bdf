use super::ConfigError;
use super::path::deep_merge_map;
use super::sink_config::SinkConfig;
use crate::domain::LogLevel;
use crate::format::{FormatSpec, Palette};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Which sinks to build: a single sink name, or sink name -> per-sink overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LoggerSelection {
    Single(String),
    Many(Map<String, Value>),
}

impl LoggerSelection {
    /// Normalizes both forms to ordered (sink name, overrides) pairs.
    pub fn into_sinks(self) -> Result<Vec<(String, Options)>, ConfigError> {
        match self {
            LoggerSelection::Single(name) => Ok(vec![(name, Options::default())]),
            LoggerSelection::Many(sinks) => sinks
                .into_iter()
                .map(|(name, overrides)| {
                    let overrides = match overrides {
                        Value::Null => Options::default(),
                        other => Options::from_value(other)?,
                    };
                    Ok((name, overrides))
                })
                .collect(),
        }
    }
}

/// One layer of caller-supplied configuration. Every field is optional;
/// unset fields leave the layer below untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub application: Option<String>,
    pub application_version: Option<String>,
    pub level: Option<u8>,
    pub logger: Option<LoggerSelection>,
    pub default_event: Option<String>,
    pub default_level: Option<LogLevel>,
    pub format: Option<FormatSpec>,
    #[serde(alias = "useColour")]
    pub show_colours: Option<bool>,
    pub colours: Option<Palette>,
    /// Sink-specific and custom options (`extension`, `defaultRequestId`, ..).
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON-like value. Anything but a map is rejected.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::InvalidOptions(format!(
                "expected a map of options, got {value}"
            )));
        }
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidOptions(e.to_string()))
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }

    pub fn application_version(mut self, version: impl Into<String>) -> Self {
        self.application_version = Some(version.into());
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Selects a single sink by name.
    pub fn logger(mut self, name: impl Into<String>) -> Self {
        self.logger = Some(LoggerSelection::Single(name.into()));
        self
    }

    /// Adds a sink with its own overrides, switching to the multi-sink form.
    pub fn sink(mut self, name: impl Into<String>, overrides: Value) -> Self {
        let mut sinks = match self.logger.take() {
            Some(LoggerSelection::Many(sinks)) => sinks,
            Some(LoggerSelection::Single(existing)) => {
                let mut sinks = Map::new();
                sinks.insert(existing, Value::Object(Map::new()));
                sinks
            }
            None => Map::new(),
        };
        sinks.insert(name.into(), overrides);
        self.logger = Some(LoggerSelection::Many(sinks));
        self
    }

    pub fn default_event(mut self, event: impl Into<String>) -> Self {
        self.default_event = Some(event.into());
        self
    }

    pub fn default_level(mut self, level: LogLevel) -> Self {
        self.default_level = Some(level);
        self
    }

    pub fn format(mut self, format: impl Into<FormatSpec>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn show_colours(mut self, show: bool) -> Self {
        self.show_colours = Some(show);
        self
    }

    pub fn colours(mut self, colours: Palette) -> Self {
        self.colours = Some(colours);
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Applies this layer onto a resolved config, field by field.
    pub fn apply_to(&self, config: &mut SinkConfig) {
        if let Some(application) = &self.application {
            config.application.clone_from(application);
        }
        if let Some(version) = &self.application_version {
            config.application_version.clone_from(version);
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(event) = &self.default_event {
            config.default_event.clone_from(event);
        }
        if let Some(level) = &self.default_level {
            config.default_level = level.clone();
        }
        if let Some(format) = &self.format {
            config.format.merge(format);
        }
        if let Some(show) = self.show_colours {
            config.show_colours = show;
        }
        if let Some(colours) = &self.colours {
            config.colours.merge(colours);
        }
        deep_merge_map(&mut config.settings, &self.settings);
    }
}
