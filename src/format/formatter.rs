use super::palette::Palette;
use super::spec::Resolved;
use crate::config::SinkConfig;
use crate::domain::LogEntry;
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::{Arc, LazyLock};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([^%]+)%").expect("token pattern is valid"));

/// Renders entries for one sink, using the sink's configuration as it was
/// when the log call was dispatched.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: Arc<SinkConfig>,
}

impl Formatter {
    pub fn new(config: Arc<SinkConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Renders with the sink's configured format.
    pub fn render(&self, entry: &LogEntry) -> String {
        match self.config.format.resolve(entry.log_level()) {
            Some(Resolved::Function(f)) => f(entry),
            Some(Resolved::Template(template)) => self.substitute(entry, template),
            None => String::new(),
        }
    }

    /// Substitutes every `%name%` token in `template`.
    pub fn substitute(&self, entry: &LogEntry, template: &str) -> String {
        TOKEN
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                let text = match entry.field(name) {
                    Some(value) => stringify(&value),
                    None => self.config.token_default(name).unwrap_or_default(),
                };
                if self.config.show_colours {
                    Palette::paint(self.config.colours.code(entry.log_level(), name), &text)
                } else {
                    text
                }
            })
            .into_owned()
    }
}

/// Text for a substituted value: strings raw, containers as pretty JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}
