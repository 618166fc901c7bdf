use thiserror::Error;

/// Raised synchronously while building or reconfiguring a logger. Never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    MissingField(&'static str),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Unknown sink: {0}")]
    UnknownSink(String),

    #[error("Invalid value for {property} on sink {sink}: {reason}")]
    InvalidSetting {
        sink: String,
        property: String,
        reason: String,
    },

    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment error: {0}")]
    Env(String),
}

/// Failure reported by a sink through its completion handle.
///
/// These are never returned from `log`; they land in the matching slot of
/// the aggregate outcome vector.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink {sink} failed to write: {source}")]
    Io {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Sink {sink} failed to encode entry: {source}")]
    Encode {
        sink: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Sink {0} dropped its completion without reporting")]
    Abandoned(String),

    #[error("Sink {sink} rejected entry: {reason}")]
    Rejected { sink: String, reason: String },
}

impl SinkError {
    /// Name of the sink that reported the failure.
    pub fn sink(&self) -> &str {
        match self {
            SinkError::Io { sink, .. }
            | SinkError::Encode { sink, .. }
            | SinkError::Rejected { sink, .. } => sink,
            SinkError::Abandoned(sink) => sink,
        }
    }
}
