use super::completion::CompletionJoin;
use super::{AggregateCallback, Pending, WriteReceipt};
use crate::domain::{LogLevel, Message, Payload};
use crate::entry::EntryBuilder;
use crate::format::Formatter;
use crate::sink::SinkRegistry;
use std::sync::Arc;
use tracing::debug;

/// Routes one log call to every registered sink.
///
/// Each call builds a single entry, hands it to the sinks in registration
/// order, and joins their completions. Calls are independent: a second call
/// may start while sinks of an earlier one are still writing.
pub struct Dispatcher {
    registry: SinkRegistry,
}

impl Dispatcher {
    pub fn new(registry: SinkRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SinkRegistry {
        &self.registry
    }

    /// Dispatches an entry; `callback`, if given, runs once after every sink
    /// has reported.
    pub fn log(
        &self,
        level: LogLevel,
        event: Option<&str>,
        message: Message,
        data: Option<&Payload>,
        err: Option<&Payload>,
        callback: Option<AggregateCallback>,
    ) {
        let primary = self.registry.primary().config();
        let entry = Arc::new(EntryBuilder::new(&primary).build(level, event, message, data, err));

        let join = CompletionJoin::new(self.registry.len(), callback);
        debug!(
            level = %entry.log_level(),
            event = entry.event(),
            sinks = join.size(),
            "Dispatching log entry"
        );

        for (slot, sink) in self.registry.iter().enumerate() {
            let done = join.completion(slot, sink.name());
            let config = sink.config();
            if !config.emits(entry.log_level()) {
                done.complete(Ok(WriteReceipt::Filtered));
                continue;
            }
            sink.writer()
                .write(Arc::clone(&entry), Formatter::new(Arc::new(config)), done);
        }
    }

    /// Same as [`log`](Self::log), returning a future of the outcomes.
    pub fn dispatch(
        &self,
        level: LogLevel,
        event: Option<&str>,
        message: Message,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> Pending {
        let (pending, callback) = Pending::channel();
        self.log(level, event, message, data, err, Some(callback));
        pending
    }
}
