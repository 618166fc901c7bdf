// Appends rendered entries to a dated file under a configurable directory.
//
// `location`, `prefix` and `extension` are read from the live configuration
// on every write, so they can be changed between calls. On a tokio runtime
// the append happens on a spawned task; otherwise it is done inline.

use super::{Sink, SinkFactory};
use crate::config::{Options, SinkConfig};
use crate::dispatch::{Completion, WriteReceipt};
use crate::domain::{ConfigError, LogEntry, SinkError};
use crate::format::Formatter;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::warn;

const DEFAULT_PREFIX: &str = "log_";
const DEFAULT_EXTENSION: &str = "log";

fn default_location() -> PathBuf {
    std::env::current_dir()
        .map(|dir| dir.join("logs"))
        .unwrap_or_else(|_| PathBuf::from("logs"))
}

/// `<location>/<prefix>--<YYYYMMDD>.<extension>`
pub fn target_path(config: &SinkConfig, now: DateTime<Local>) -> PathBuf {
    let location = config
        .setting_str("location")
        .map_or_else(default_location, PathBuf::from);
    let prefix = config.setting_str("prefix").unwrap_or(DEFAULT_PREFIX);
    let extension = config.setting_str("extension").unwrap_or(DEFAULT_EXTENSION);
    location.join(format!("{prefix}--{}.{extension}", now.format("%Y%m%d")))
}

fn append_blocking(path: &Path, line: &str) -> std::io::Result<()> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()
}

async fn append(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await
}

fn outcome(sink: &str, path: PathBuf, result: std::io::Result<()>) -> Result<WriteReceipt, SinkError> {
    match result {
        Ok(()) => Ok(WriteReceipt::Appended(path)),
        Err(source) => {
            warn!(sink, path = %path.display(), error = %source, "File append failed");
            Err(SinkError::Io {
                sink: sink.to_string(),
                source,
            })
        }
    }
}

pub struct FileSink {
    name: String,
}

impl Sink for FileSink {
    fn write(&self, entry: Arc<LogEntry>, formatter: Formatter, done: Completion) {
        let path = target_path(formatter.config(), Local::now());
        let line = format!("{}\n", formatter.render(&entry));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let name = self.name.clone();
                handle.spawn(async move {
                    let result = append(&path, &line).await;
                    done.complete(outcome(&name, path, result));
                });
            }
            Err(_) => {
                let result = append_blocking(&path, &line);
                done.complete(outcome(&self.name, path, result));
            }
        }
    }
}

pub struct FileSinkFactory;

impl SinkFactory for FileSinkFactory {
    fn defaults(&self) -> Options {
        Options::new()
            .format(super::console::default_format())
            .show_colours(false)
            .setting("location", default_location().to_string_lossy().into_owned())
            .setting("prefix", DEFAULT_PREFIX)
            .setting("extension", DEFAULT_EXTENSION)
    }

    fn initialize(&self, config: &SinkConfig) -> Result<Box<dyn Sink>, ConfigError> {
        for key in ["location", "prefix", "extension"] {
            if config.setting(key).is_some_and(|v| !v.is_string()) {
                return Err(ConfigError::InvalidSetting {
                    sink: config.logger.clone(),
                    property: key.to_string(),
                    reason: "expected a string".to_string(),
                });
            }
        }
        Ok(Box::new(FileSink {
            name: config.logger.clone(),
        }))
    }
}
