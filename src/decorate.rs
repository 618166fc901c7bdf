//! Level-named convenience methods, held by composition.
//!
//! [`Logger`] is a cheap handle onto a dispatcher with one method per
//! built-in level. [`Decorated`] pairs a caller's value with a `Logger` so the
//! value can be passed around with logging attached.

use crate::dispatch::{AggregateCallback, Dispatcher, Pending};
use crate::domain::{LogLevel, Message, Payload};
use crate::lumberjack::Lumberjack;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};

/// `info`/`debug`/`warning`/`error` routed through a shared dispatcher.
///
/// Each method forwards its arguments unchanged with the level fixed. The
/// plain variants return a [`Pending`] for the sinks' outcomes; the `_then`
/// variants take the aggregate callback instead.
#[derive(Clone)]
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
}

impl Logger {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn log(
        &self,
        level: LogLevel,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> Pending {
        self.dispatcher.dispatch(level, event, message.into(), data, err)
    }

    pub fn info(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
    ) -> Pending {
        self.log(LogLevel::Info, event, message, data, None)
    }

    pub fn debug(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
    ) -> Pending {
        self.log(LogLevel::Debug, event, message, data, None)
    }

    pub fn warning(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
    ) -> Pending {
        self.log(LogLevel::Warning, event, message, data, None)
    }

    pub fn error(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> Pending {
        self.log(LogLevel::Error, event, message, data, err)
    }

    pub fn info_then(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        callback: AggregateCallback,
    ) {
        self.dispatcher.log(
            LogLevel::Info,
            event,
            message.into(),
            data,
            None,
            Some(callback),
        );
    }

    pub fn debug_then(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        callback: AggregateCallback,
    ) {
        self.dispatcher.log(
            LogLevel::Debug,
            event,
            message.into(),
            data,
            None,
            Some(callback),
        );
    }

    pub fn warning_then(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        callback: AggregateCallback,
    ) {
        self.dispatcher.log(
            LogLevel::Warning,
            event,
            message.into(),
            data,
            None,
            Some(callback),
        );
    }

    pub fn error_then(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
        callback: AggregateCallback,
    ) {
        self.dispatcher.log(
            LogLevel::Error,
            event,
            message.into(),
            data,
            err,
            Some(callback),
        );
    }

    pub(crate) fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

/// A caller value with a [`Logger`] attached.
///
/// Derefs to the wrapped value. The back-reference to the dispatcher is weak
/// and only used by [`Decorated::lumberjack`].
pub struct Decorated<T> {
    target: T,
    logger: Logger,
    origin: Weak<Dispatcher>,
}

impl<T> Decorated<T> {
    pub(crate) fn new(target: T, logger: Logger) -> Self {
        let origin = Arc::downgrade(logger.dispatcher());
        Self {
            target,
            logger,
            origin,
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The handle this value was decorated by, while it is still alive.
    pub fn lumberjack(&self) -> Option<Lumberjack> {
        self.origin.upgrade().map(Lumberjack::from_dispatcher)
    }

    pub fn into_inner(self) -> T {
        self.target
    }

    pub fn info(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
    ) -> Pending {
        self.logger.info(event, message, data)
    }

    pub fn debug(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
    ) -> Pending {
        self.logger.debug(event, message, data)
    }

    pub fn warning(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
    ) -> Pending {
        self.logger.warning(event, message, data)
    }

    pub fn error(
        &self,
        event: Option<&str>,
        message: impl Into<Message>,
        data: Option<&Payload>,
        err: Option<&Payload>,
    ) -> Pending {
        self.logger.error(event, message, data, err)
    }
}

impl<T> Deref for Decorated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.target
    }
}

impl<T> DerefMut for Decorated<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

#[cfg(test)]
mod tests {
    use super::Decorated;
    use crate::config::Options;
    use crate::dispatch::SinkOutcome;
    use crate::domain::Payload;
    use crate::lumberjack::Lumberjack;
    use crate::sink::{ConsoleStreams, CoutSinkFactory, SharedBuffer};
    use serde_json::{Value, json};

    struct App {
        name: &'static str,
    }

    fn handle(out: &SharedBuffer, err: &SharedBuffer) -> Lumberjack {
        let streams = ConsoleStreams {
            out: out.writer(),
            err: err.writer(),
        };
        Lumberjack::builder()
            .sink("cout", CoutSinkFactory::with_streams(streams))
            .create(Options::new().logger("cout"))
            .unwrap()
    }

    fn lines(buffer: &SharedBuffer) -> Vec<Value> {
        buffer
            .contents()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_methods_fix_the_level() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let app = handle(&out, &err).decorate(App { name: "api" });

        app.info(Some("A"), "a", None);
        app.debug(Some("B"), "b", None);
        app.warning(Some("C"), "c", None);
        app.error(Some("D"), "d", None, None);

        let levels: Vec<_> = lines(&out).iter().map(|l| l["logLevel"].clone()).collect();
        assert_eq!(levels, vec![json!("INFO"), json!("DEBUG"), json!("WARNING")]);
        assert_eq!(lines(&err)[0]["logLevel"], "ERROR");
        assert_eq!(app.name, "api");
    }

    #[test]
    fn test_arguments_forwarded_unchanged() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let logger = handle(&out, &err).logger();

        let data = Payload::from(json!({"k": 1}));
        let cause = Payload::from(json!({"message": "boom"}));
        logger.error(None, "went wrong", Some(&data), Some(&cause));

        let line = &lines(&err)[0];
        assert_eq!(line["event"], "UNKNOWN");
        assert_eq!(line["message"], "went wrong");
        assert_eq!(line["data"], json!({"k": 1}));
        assert_eq!(line["exception"], json!({"message": "boom"}));
    }

    #[test]
    fn test_then_variant_reports_once() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let logger = handle(&out, &err).logger();
        let (tx, rx) = std::sync::mpsc::channel();
        logger.info_then(
            Some("E"),
            "m",
            None,
            Box::new(move |outcomes: Vec<SinkOutcome>| tx.send(outcomes.len()).unwrap()),
        );
        assert_eq!(rx.recv().unwrap(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_back_reference_is_weak() {
        let out = SharedBuffer::new();
        let err = SharedBuffer::new();
        let lumberjack = handle(&out, &err);
        let decorated = lumberjack.decorate(vec![1, 2, 3]);
        assert_eq!(decorated.len(), 3);

        let back = decorated.lumberjack().unwrap();
        assert_eq!(back.sink_names(), vec!["cout"]);
        drop(back);

        let Decorated { logger, origin, .. } = decorated;
        drop(logger);
        drop(lumberjack);
        assert!(origin.upgrade().is_none());
    }
}
