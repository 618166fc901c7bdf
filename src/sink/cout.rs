// Raw entry dump: the whole entry as one JSON line, no template.

use super::console::ConsoleStreams;
use super::{Sink, SinkFactory};
use crate::config::SinkConfig;
use crate::dispatch::{Completion, WriteReceipt};
use crate::domain::{ConfigError, LogEntry, SinkError};
use crate::format::Formatter;
use std::sync::Arc;

pub struct CoutSink {
    name: String,
    streams: ConsoleStreams,
}

impl CoutSink {
    fn emit(&self, entry: &LogEntry) -> Result<WriteReceipt, SinkError> {
        let line = serde_json::to_string(entry).map_err(|source| SinkError::Encode {
            sink: self.name.clone(),
            source,
        })?;
        self.streams
            .write_line(entry, &line)
            .map_err(|source| SinkError::Io {
                sink: self.name.clone(),
                source,
            })?;
        Ok(WriteReceipt::Written)
    }
}

impl Sink for CoutSink {
    fn write(&self, entry: Arc<LogEntry>, _formatter: Formatter, done: Completion) {
        done.complete(self.emit(&entry));
    }
}

#[derive(Clone, Default)]
pub struct CoutSinkFactory {
    streams: ConsoleStreams,
}

impl CoutSinkFactory {
    pub fn with_streams(streams: ConsoleStreams) -> Self {
        Self { streams }
    }
}

impl SinkFactory for CoutSinkFactory {
    fn requires_identity(&self) -> bool {
        false
    }

    fn initialize(&self, config: &SinkConfig) -> Result<Box<dyn Sink>, ConfigError> {
        Ok(Box::new(CoutSink {
            name: config.logger.clone(),
            streams: self.streams.clone(),
        }))
    }
}
