// Console sink: one rendered line per entry. ERROR entries go to the error
// stream, everything else to the output stream.

use super::{Sink, SinkFactory};
use crate::config::{Options, SinkConfig};
use crate::dispatch::{Completion, WriteReceipt};
use crate::domain::{ConfigError, LogEntry, SinkError};
use crate::format::{FormatSpec, Formatter, Palette};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// The pair of streams a console-style sink writes to.
#[derive(Clone)]
pub struct ConsoleStreams {
    pub out: SharedWriter,
    pub err: SharedWriter,
}

impl ConsoleStreams {
    pub fn stdio() -> Self {
        Self {
            out: Arc::new(Mutex::new(std::io::stdout())),
            err: Arc::new(Mutex::new(std::io::stderr())),
        }
    }

    pub fn for_entry(&self, entry: &LogEntry) -> &SharedWriter {
        if entry.log_level().is_error() {
            &self.err
        } else {
            &self.out
        }
    }

    /// Writes `line` plus a newline to the stream chosen for `entry`.
    pub fn write_line(&self, entry: &LogEntry, line: &str) -> std::io::Result<()> {
        let mut stream = self.for_entry(entry).lock();
        writeln!(stream, "{line}")?;
        stream.flush()
    }
}

impl Default for ConsoleStreams {
    fn default() -> Self {
        Self::stdio()
    }
}

/// In-memory writer, handy for capturing console output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    pub fn writer(&self) -> SharedWriter {
        Arc::new(Mutex::new(self.clone()))
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

const PLAIN: &str = "[%event%](%date%) - %message%";
const WITH_DATA: &str = "[%event%](%date%) - %message%\n%data%";

/// Per-level formats shared by the console and file sinks.
pub fn default_format() -> FormatSpec {
    FormatSpec::per_level([
        ("default", FormatSpec::from(PLAIN)),
        ("warning", FormatSpec::from(WITH_DATA)),
        ("debug", FormatSpec::from(WITH_DATA)),
        ("error", FormatSpec::from(WITH_DATA)),
    ])
}

pub fn default_palette() -> Palette {
    Palette::new()
        .with("default", "event", 36)
        .with("default", "date", 90)
        .with("default", "message", 36)
        .with("default", "default", 90)
        .with("default", "data", 37)
        .with("error", "event", 31)
        .with("error", "date", 90)
        .with("error", "message", 31)
        .with("error", "default", 90)
        .with("warning", "event", 33)
        .with("warning", "date", 90)
        .with("warning", "message", 33)
        .with("warning", "default", 90)
        .with("debug", "event", 90)
        .with("debug", "date", 90)
        .with("debug", "message", 90)
        .with("debug", "default", 90)
        .with("debug", "data", 37)
}

pub struct ConsoleSink {
    name: String,
    streams: ConsoleStreams,
}

impl Sink for ConsoleSink {
    fn write(&self, entry: Arc<LogEntry>, formatter: Formatter, done: Completion) {
        let line = formatter.render(&entry);
        let outcome = self
            .streams
            .write_line(&entry, &line)
            .map(|()| WriteReceipt::Written)
            .map_err(|source| SinkError::Io {
                sink: self.name.clone(),
                source,
            });
        done.complete(outcome);
    }
}

#[derive(Clone, Default)]
pub struct ConsoleSinkFactory {
    streams: ConsoleStreams,
}

impl ConsoleSinkFactory {
    pub fn with_streams(streams: ConsoleStreams) -> Self {
        Self { streams }
    }
}

impl SinkFactory for ConsoleSinkFactory {
    fn defaults(&self) -> Options {
        Options::new()
            .format(default_format())
            .colours(default_palette())
            .show_colours(true)
    }

    fn initialize(&self, config: &SinkConfig) -> Result<Box<dyn Sink>, ConfigError> {
        Ok(Box::new(ConsoleSink {
            name: config.logger.clone(),
            streams: self.streams.clone(),
        }))
    }
}
