use super::serializer::EntrySerializer;
use crate::config::SinkConfig;
use crate::domain::{LogEntry, LogLevel, Message, Payload};
use chrono::Utc;

/// Assembles a `LogEntry` from caller input and the identity/defaults of a
/// resolved configuration.
pub struct EntryBuilder<'a> {
    config: &'a SinkConfig,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(config: &'a SinkConfig) -> Self {
        Self { config }
    }

    /// Builds the entry. The timestamp is taken here, not at render time.
    pub fn build(
        &self,
        level: LogLevel,
        event: Option<&str>,
        message: Message,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> LogEntry {
        let event = event.map_or_else(|| self.config.default_event.clone(), str::to_string);

        LogEntry::new(
            self.config.application.clone(),
            self.config.application_version.clone(),
            Utc::now(),
            level,
            event,
            message,
            EntrySerializer::serialize_opt(data),
            EntrySerializer::serialize_opt(err),
        )
    }
}
