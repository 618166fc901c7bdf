// Per-call join over N sink completions.
//
// Each log call owns one `JoinState`; nothing is shared between calls. Every
// sink gets a `Completion` for its slot. The last slot filled fires the
// aggregate callback, outside of any lock.

use super::{AggregateCallback, SinkOutcome};
use crate::domain::SinkError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, error};

struct JoinState {
    remaining: AtomicUsize,
    slots: Mutex<Vec<Option<SinkOutcome>>>,
    callback: Mutex<Option<AggregateCallback>>,
}

impl JoinState {
    fn record(&self, slot: usize, outcome: SinkOutcome) {
        {
            let mut slots = self.slots.lock();
            if let Some(cell) = slots.get_mut(slot) {
                *cell = Some(outcome);
            }
        }

        if self.remaining.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        let outcomes: Vec<SinkOutcome> = std::mem::take(&mut *self.slots.lock())
            .into_iter()
            .map(|cell| cell.unwrap_or_else(|| Err(SinkError::Abandoned(String::new()))))
            .collect();
        debug!(sinks = outcomes.len(), "All sinks completed");

        let callback = self.callback.lock().take();
        if let Some(callback) = callback {
            callback(outcomes);
        }
    }
}

/// Barrier that resolves once every slot has reported.
pub struct CompletionJoin {
    state: Arc<JoinState>,
    size: usize,
}

impl CompletionJoin {
    pub fn new(size: usize, callback: Option<AggregateCallback>) -> Self {
        Self {
            state: Arc::new(JoinState {
                remaining: AtomicUsize::new(size),
                slots: Mutex::new((0..size).map(|_| None).collect()),
                callback: Mutex::new(callback),
            }),
            size,
        }
    }

    /// Handle for `slot`. Each slot must be handed out exactly once.
    pub fn completion(&self, slot: usize, sink: impl Into<String>) -> Completion {
        debug_assert!(slot < self.size);
        Completion {
            state: Some(Arc::clone(&self.state)),
            slot,
            sink: sink.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// One sink's completion for one log call.
///
/// `complete` consumes the handle, so a sink reports at most once. A handle
/// dropped without reporting records `SinkError::Abandoned` for its slot.
pub struct Completion {
    state: Option<Arc<JoinState>>,
    slot: usize,
    sink: String,
}

impl Completion {
    /// Name of the sink this handle belongs to.
    pub fn sink(&self) -> &str {
        &self.sink
    }

    pub fn complete(mut self, outcome: SinkOutcome) {
        if let Some(state) = self.state.take() {
            debug!(sink = %self.sink, ok = outcome.is_ok(), "Sink completed");
            state.record(self.slot, outcome);
        }
    }

    /// A handle not attached to any join, for driving a sink directly.
    pub fn detached(sink: impl Into<String>) -> Self {
        Self {
            state: None,
            slot: 0,
            sink: sink.into(),
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(state) = self.state.take() {
            error!(sink = %self.sink, "Sink dropped its completion without reporting");
            state.record(self.slot, Err(SinkError::Abandoned(self.sink.clone())));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::WriteReceipt;
    use tracing_test::traced_test;

    type Observed = (CompletionJoin, Arc<AtomicUsize>, Arc<Mutex<Vec<SinkOutcome>>>);

    fn counting_join(size: usize) -> Observed {
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (f, s) = (fired.clone(), seen.clone());
        let join = CompletionJoin::new(
            size,
            Some(Box::new(move |outcomes: Vec<SinkOutcome>| {
                f.fetch_add(1, Ordering::SeqCst);
                *s.lock() = outcomes;
            })),
        );
        (join, fired, seen)
    }

    #[test]
    fn test_fires_once_after_all_slots() {
        let (join, fired, seen) = counting_join(3);
        let a = join.completion(0, "a");
        let b = join.completion(1, "b");
        let c = join.completion(2, "c");

        c.complete(Ok(WriteReceipt::Written));
        a.complete(Ok(WriteReceipt::Filtered));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        b.complete(Ok(WriteReceipt::Written));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        let outcomes = seen.lock();
        assert!(matches!(outcomes[0], Ok(WriteReceipt::Filtered)));
        assert!(matches!(outcomes[2], Ok(WriteReceipt::Written)));
    }

    #[traced_test]
    #[test]
    fn test_dropped_completion_counts_as_abandoned() {
        let (join, fired, seen) = counting_join(2);
        join.completion(0, "a").complete(Ok(WriteReceipt::Written));
        drop(join.completion(1, "lost"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(matches!(seen.lock()[1], Err(SinkError::Abandoned(ref s)) if s == "lost"));
        assert!(logs_contain("Sink dropped its completion without reporting"));
    }

    #[test]
    fn test_no_callback_still_counts() {
        let join = CompletionJoin::new(1, None);
        join.completion(0, "a").complete(Ok(WriteReceipt::Written));
    }

    #[test]
    fn test_completes_across_threads() {
        let (join, fired, _) = counting_join(8);
        let handles: Vec<_> = (0..8)
            .map(|slot| {
                let completion = join.completion(slot, format!("s{slot}"));
                std::thread::spawn(move || completion.complete(Ok(WriteReceipt::Written)))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
