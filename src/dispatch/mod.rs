//! Fan-out of one log call to every registered sink.

pub mod completion;
pub mod dispatcher;

pub use completion::{Completion, CompletionJoin};
pub use dispatcher::Dispatcher;

use crate::domain::SinkError;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// What a sink reports for a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteReceipt {
    /// Written to a stream.
    Written,
    /// Appended to the given file.
    Appended(PathBuf),
    /// Skipped because the entry's level is above the sink's threshold.
    Filtered,
}

pub type SinkOutcome = Result<WriteReceipt, SinkError>;

/// Invoked once per log call with every sink's outcome, in registration order.
pub type AggregateCallback = Box<dyn FnOnce(Vec<SinkOutcome>) + Send + 'static>;

/// Resolves to the outcomes of one log call once every sink has completed.
///
/// The log call has already been dispatched when this is returned; dropping
/// it does not cancel anything.
pub struct Pending {
    rx: oneshot::Receiver<Vec<SinkOutcome>>,
}

impl Pending {
    /// Returns the pending handle and the callback that resolves it.
    pub fn channel() -> (Self, AggregateCallback) {
        let (tx, rx) = oneshot::channel();
        let callback: AggregateCallback = Box::new(move |outcomes| {
            // Receiver may already be gone; the outcomes are then unobserved.
            let _ = tx.send(outcomes);
        });
        (Self { rx }, callback)
    }
}

impl Future for Pending {
    type Output = Vec<SinkOutcome>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or_default())
    }
}
