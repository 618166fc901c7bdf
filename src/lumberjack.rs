//! The public handle: construction from options and runtime configuration.

use crate::config::{ConfigResolver, Options, SinkConfig};
use crate::decorate::{Decorated, Logger};
use crate::dispatch::{AggregateCallback, Dispatcher, Pending};
use crate::domain::{ConfigError, LogLevel, Message, Payload};
use crate::http::HttpInstrumentation;
use crate::sink::{RegisteredSink, SinkCatalog, SinkFactory, SinkRegistry};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A configured set of sinks. Clones share the same sinks and configuration.
#[derive(Clone)]
pub struct Lumberjack {
    dispatcher: Arc<Dispatcher>,
}

/// Builds a [`Lumberjack`] with extra sink types beyond the built-ins.
pub struct LumberjackBuilder {
    catalog: SinkCatalog,
}

impl LumberjackBuilder {
    /// Registers a sink type under `name`, replacing any built-in of that name.
    #[must_use]
    pub fn sink(mut self, name: impl Into<String>, factory: impl SinkFactory + 'static) -> Self {
        self.catalog.register(name, factory);
        self
    }

    pub fn create(self, options: Options) -> Result<Lumberjack, ConfigError> {
        let configs = ConfigResolver::new(&self.catalog).resolve(options)?;
        let registry = SinkRegistry::build(&self.catalog, configs)?;
        info!(sinks = ?registry.names(), "Lumberjack created");
        Ok(Lumberjack::from_dispatcher(Arc::new(Dispatcher::new(registry))))
    }
}

impl Lumberjack {
    pub fn builder() -> LumberjackBuilder {
        LumberjackBuilder {
            catalog: SinkCatalog::with_builtins(),
        }
    }

    pub fn create(options: Options) -> Result<Self, ConfigError> {
        Self::builder().create(options)
    }

    /// Creates from options produced by `f`.
    pub fn create_with<F>(f: F) -> Result<Self, ConfigError>
    where
        F: FnOnce() -> Options,
    {
        Self::create(f())
    }

    /// Creates from a JSON object of options.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Self::create(Options::from_value(value)?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::create(Options::from_toml_str(source)?)
    }

    pub(crate) fn from_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Sends one entry to every sink; `callback` runs once all have finished.
    pub fn log(
        &self,
        level: LogLevel,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
        callback: Option<AggregateCallback>,
    ) {
        self.dispatcher.log(level, event, message.into(), data, err, callback);
    }

    pub fn dispatch(
        &self,
        level: LogLevel,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> Pending {
        self.dispatcher.dispatch(level, event, message.into(), data, err)
    }

    pub fn info(&self, event: Option<&str>, message: impl Into<Message>, data: Option<&Payload>) -> Pending {
        self.dispatch(LogLevel::Info, event, message, data, None)
    }

    pub fn debug(&self, event: Option<&str>, message: impl Into<Message>, data: Option<&Payload>) -> Pending {
        self.dispatch(LogLevel::Debug, event, message, data, None)
    }

    pub fn warning(&self, event: Option<&str>, message: impl Into<Message>, data: Option<&Payload>) -> Pending {
        self.dispatch(LogLevel::Warning, event, message, data, None)
    }

    pub fn error(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> Pending {
        self.dispatch(LogLevel::Error, event, message, data, err)
    }

    pub fn logger(&self) -> Logger {
        Logger::new(Arc::clone(&self.dispatcher))
    }

    /// Attaches the level methods to `target`.
    pub fn decorate<T>(&self, target: T) -> Decorated<T> {
        Decorated::new(target, self.logger())
    }

    /// Reads a property from the primary (first) sink.
    pub fn get(&self, property: &str) -> Option<Value> {
        self.dispatcher.registry().primary().get(property)
    }

    /// Reads a property from the named sink; `None` if there is no such sink.
    pub fn get_from(&self, sink: &str, property: &str) -> Option<Value> {
        self.dispatcher.registry().get(sink)?.get(property)
    }

    /// Writes a property on the primary sink. Seen by the next log call.
    pub fn set(&self, property: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.dispatcher
            .registry()
            .primary()
            .set(property, value.into())
    }

    pub fn set_on(&self, sink: &str, property: &str, value: impl Into<Value>) -> Result<(), ConfigError> {
        self.dispatcher
            .registry()
            .get(sink)
            .ok_or_else(|| ConfigError::UnknownSink(sink.to_string()))?
            .set(property, value.into())
    }

    /// Edits the primary sink's configuration in place.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SinkConfig),
    {
        self.dispatcher.registry().primary().update(f);
    }

    pub fn sink(&self, name: &str) -> Option<Arc<RegisteredSink>> {
        self.dispatcher.registry().get(name).cloned()
    }

    pub fn sink_names(&self) -> Vec<String> {
        self.dispatcher.registry().names()
    }

    /// Request/response logging through this handle.
    pub fn register_http(&self) -> HttpInstrumentation {
        HttpInstrumentation::new(self.logger())
    }
}
