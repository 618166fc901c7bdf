use super::ConfigError;
use super::options::{LoggerSelection, Options};
use super::sink_config::SinkConfig;
use crate::sink::catalog::SinkCatalog;
use tracing::debug;

/// Default sink when the caller names none.
pub const DEFAULT_SINK: &str = "stdout";

/// Resolves caller options into one validated config per sink.
///
/// Layers, lowest first: global defaults, sink-type defaults, caller global
/// options, caller per-sink overrides.
pub struct ConfigResolver<'a> {
    catalog: &'a SinkCatalog,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(catalog: &'a SinkCatalog) -> Self {
        Self { catalog }
    }

    pub fn resolve(&self, mut options: Options) -> Result<Vec<SinkConfig>, ConfigError> {
        let selection = options
            .logger
            .take()
            .unwrap_or_else(|| LoggerSelection::Single(DEFAULT_SINK.to_string()));
        let sinks = selection.into_sinks()?;
        if sinks.is_empty() {
            return Err(ConfigError::InvalidOptions(
                "at least one sink must be configured".to_string(),
            ));
        }

        sinks
            .into_iter()
            .map(|(name, overrides)| self.resolve_sink(&name, &options, &overrides))
            .collect()
    }

    fn resolve_sink(
        &self,
        name: &str,
        global: &Options,
        overrides: &Options,
    ) -> Result<SinkConfig, ConfigError> {
        let factory = self
            .catalog
            .get(name)
            .ok_or_else(|| ConfigError::UnknownSink(name.to_string()))?;

        let mut config = SinkConfig::default();
        factory.defaults().apply_to(&mut config);
        global.apply_to(&mut config);
        overrides.apply_to(&mut config);
        config.logger = name.to_string();

        if factory.requires_identity() {
            validate_identity(&config)?;
        }

        debug!(sink = name, "Resolved sink configuration");
        Ok(config)
    }
}

/// Both identity fields must be present and non-blank.
pub fn validate_identity(config: &SinkConfig) -> Result<(), ConfigError> {
    if config.application.trim().is_empty() {
        return Err(ConfigError::MissingField("application"));
    }
    if config.application_version.trim().is_empty() {
        return Err(ConfigError::MissingField("applicationVersion"));
    }
    Ok(())
}
