//! Domain layer for lumberjack.
//!
//! Contains the canonical types shared across all modules:
//! - `LogEntry`: the normalized record handed to every sink
//! - `LogLevel`: entry severity (INFO/DEBUG/WARNING/ERROR, extensible)
//! - `Payload`: caller-supplied value graph, possibly self-referential
//! - `ConfigError` / `SinkError`: error taxonomy

pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod payload;

pub use error::{ConfigError, SinkError};
pub use log_entry::{LogEntry, Message};
pub use log_level::LogLevel;
pub use payload::Payload;
