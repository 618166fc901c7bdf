//! Option layering, validation, and runtime property access.

pub mod env;
pub mod options;
pub mod path;
pub mod resolver;
pub mod sink_config;

pub use crate::domain::ConfigError;
pub use options::{LoggerSelection, Options};
pub use resolver::{ConfigResolver, DEFAULT_SINK};
pub use sink_config::SinkConfig;
