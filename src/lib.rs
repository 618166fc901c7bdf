#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned
)]
#![allow(
    clippy::missing_errors_doc,      // Internal API
    clippy::module_name_repetitions, // e.g. SinkConfig in sink module
    clippy::must_use_candidate,      // Annotated selectively on critical APIs
    clippy::too_many_arguments,      // log() mirrors the positional call shape
    clippy::doc_markdown
)]

pub mod config;
pub mod decorate;
pub mod dispatch;
pub mod domain;
pub mod entry;
pub mod format;
pub mod http;
pub mod lumberjack;
pub mod sink;
pub mod telemetry;

// Re-export main types for easy access
pub use config::{Options, SinkConfig};
pub use decorate::{Decorated, Logger};
pub use dispatch::{AggregateCallback, Completion, Pending, SinkOutcome, WriteReceipt};
pub use domain::{ConfigError, LogEntry, LogLevel, Message, Payload, SinkError};
pub use format::{FormatSpec, Formatter};
pub use lumberjack::{Lumberjack, LumberjackBuilder};
pub use sink::{Sink, SinkFactory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
