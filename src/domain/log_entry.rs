use super::log_level::LogLevel;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Message text, either given directly or produced on demand.
#[derive(Clone)]
pub enum Message {
    Text(String),
    Deferred(Arc<dyn Fn() -> String + Send + Sync>),
}

impl Message {
    /// Wraps a producer that runs only when an entry is actually rendered.
    pub fn deferred<F>(producer: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Message::Deferred(Arc::new(producer))
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Message::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

/// The normalized record shared by every sink of one log call.
#[derive(Debug)]
pub struct LogEntry {
    application: String,
    application_version: String,
    timestamp: DateTime<Utc>,
    log_level: LogLevel,
    event: String,
    message: Message,
    forced: OnceLock<String>,
    data: Option<Value>,
    exception: Option<Value>,
}

impl LogEntry {
    pub(crate) fn new(
        application: String,
        application_version: String,
        timestamp: DateTime<Utc>,
        log_level: LogLevel,
        event: String,
        message: Message,
        data: Option<Value>,
        exception: Option<Value>,
    ) -> Self {
        Self {
            application,
            application_version,
            timestamp,
            log_level,
            event,
            message,
            forced: OnceLock::new(),
            data,
            exception,
        }
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn application_version(&self) -> &str {
        &self.application_version
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn log_level(&self) -> &LogLevel {
        &self.log_level
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    /// The message text. A deferred producer runs on first access only.
    pub fn message(&self) -> &str {
        match &self.message {
            Message::Text(text) => text,
            Message::Deferred(producer) => self.forced.get_or_init(|| producer()),
        }
    }

    /// Whether a deferred message has been produced yet.
    pub fn message_forced(&self) -> bool {
        match self.message {
            Message::Text(_) => true,
            Message::Deferred(_) => self.forced.get().is_some(),
        }
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn exception(&self) -> Option<&Value> {
        self.exception.as_ref()
    }

    pub fn date_string(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Looks up a template token by name.
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "application" => Some(Value::String(self.application.clone())),
            "applicationVersion" => Some(Value::String(self.application_version.clone())),
            "date" | "timestamp" => Some(Value::String(self.date_string())),
            "logLevel" | "level" => Some(Value::String(self.log_level.to_string())),
            "event" => Some(Value::String(self.event.clone())),
            "message" => Some(Value::String(self.message().to_string())),
            "data" => self.data.clone(),
            "exception" => self.exception.clone(),
            _ => None,
        }
    }
}

impl Serialize for LogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LogEntry", 8)?;
        state.serialize_field("application", &self.application)?;
        state.serialize_field("applicationVersion", &self.application_version)?;
        state.serialize_field("date", &self.date_string())?;
        state.serialize_field("logLevel", &self.log_level)?;
        state.serialize_field("event", &self.event)?;
        state.serialize_field("message", self.message())?;
        if let Some(data) = &self.data {
            state.serialize_field("data", data)?;
        } else {
            state.skip_field("data")?;
        }
        if let Some(exception) = &self.exception {
            state.serialize_field("exception", exception)?;
        } else {
            state.skip_field("exception")?;
        }
        state.end()
    }
}
