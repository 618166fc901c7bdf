use super::catalog::SinkCatalog;
use super::Sink;
use crate::config::SinkConfig;
use crate::domain::ConfigError;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// A built sink together with its live configuration.
///
/// The configuration can be changed at any time; each log call reads it
/// afresh.
pub struct RegisteredSink {
    name: String,
    config: RwLock<SinkConfig>,
    writer: Box<dyn Sink>,
}

impl RegisteredSink {
    pub fn new(config: SinkConfig, writer: Box<dyn Sink>) -> Self {
        Self {
            name: config.logger.clone(),
            config: RwLock::new(config),
            writer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy of the configuration as it is right now.
    pub fn config(&self) -> SinkConfig {
        self.config.read().clone()
    }

    pub fn get(&self, property: &str) -> Option<Value> {
        self.config.read().get(property)
    }

    pub fn set(&self, property: &str, value: Value) -> Result<(), ConfigError> {
        self.config.write().set(property, value)
    }

    /// Mutates the configuration in place, e.g. to install a format function.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SinkConfig),
    {
        f(&mut self.config.write());
    }

    pub fn writer(&self) -> &dyn Sink {
        self.writer.as_ref()
    }
}

/// The configured sinks, in registration order. Membership is fixed at
/// construction.
pub struct SinkRegistry {
    sinks: Vec<Arc<RegisteredSink>>,
}

impl SinkRegistry {
    pub fn build(catalog: &SinkCatalog, configs: Vec<SinkConfig>) -> Result<Self, ConfigError> {
        if configs.is_empty() {
            return Err(ConfigError::InvalidOptions(
                "at least one sink must be configured".to_string(),
            ));
        }

        let sinks = configs
            .into_iter()
            .map(|config| {
                let factory = catalog
                    .get(&config.logger)
                    .ok_or_else(|| ConfigError::UnknownSink(config.logger.clone()))?;
                let writer = factory.initialize(&config)?;
                info!(sink = %config.logger, "Sink initialized");
                Ok(Arc::new(RegisteredSink::new(config, writer)))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self { sinks })
    }

    /// The first registered sink; target of single-argument `get`/`set`.
    pub fn primary(&self) -> &Arc<RegisteredSink> {
        &self.sinks[0]
    }

    pub fn get(&self, name: &str) -> Option<&Arc<RegisteredSink>> {
        self.sinks.iter().find(|sink| sink.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RegisteredSink>> {
        self.sinks.iter()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.sinks.iter().map(|sink| sink.name().to_string()).collect()
    }
}
