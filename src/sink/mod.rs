//! Pluggable output sinks.
//!
//! A sink type is registered in a [`SinkCatalog`](catalog::SinkCatalog) as a
//! [`SinkFactory`]; the factory contributes the sink-type defaults layer and
//! builds the [`Sink`] once the configuration is resolved.

pub mod catalog;
pub mod console;
pub mod cout;
pub mod file;
pub mod registry;

pub use catalog::SinkCatalog;
pub use console::{ConsoleSinkFactory, ConsoleStreams, SharedBuffer};
pub use cout::CoutSinkFactory;
pub use file::FileSinkFactory;
pub use registry::{RegisteredSink, SinkRegistry};

use crate::config::{Options, SinkConfig};
use crate::dispatch::Completion;
use crate::domain::{ConfigError, LogEntry};
use crate::format::Formatter;
use std::sync::Arc;

/// Output backend for rendered entries.
///
/// `write` must not panic for an entry built by the pipeline and must report
/// through `done` exactly once, either before returning or later from another
/// task.
pub trait Sink: Send + Sync {
    fn write(&self, entry: Arc<LogEntry>, formatter: Formatter, done: Completion);
}

/// Builds one kind of sink.
pub trait SinkFactory: Send + Sync {
    /// Sink-type defaults, layered between the global defaults and caller options.
    fn defaults(&self) -> Options {
        Options::default()
    }

    /// Whether `application` and `applicationVersion` are mandatory.
    fn requires_identity(&self) -> bool {
        true
    }

    /// Validates sink-specific options and builds the sink.
    fn initialize(&self, config: &SinkConfig) -> Result<Box<dyn Sink>, ConfigError>;
}
