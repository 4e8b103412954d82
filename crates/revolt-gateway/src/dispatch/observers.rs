//! Observer registry
//!
//! Observers run inline on the dispatch task after the cache mutation.
//! Observers registered for a specific kind run first, then catch-all
//! observers, each group in registration order. A panicking observer is
//! reported and skipped; the rest still run.

use dashmap::DashMap;
use parking_lot::RwLock;
use revolt_cache::Cache;
use revolt_common::{Diagnostic, DiagnosticSink};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::connection::GatewaySender;
use crate::events::{Event, EventKind};

/// What an observer can reach while handling an event
#[derive(Debug, Clone)]
pub struct Context {
    cache: Cache,
    sender: GatewaySender,
}

impl Context {
    pub fn new(cache: Cache, sender: GatewaySender) -> Self {
        Self { cache, sender }
    }

    /// The cache, already updated with the event being observed
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn sender(&self) -> &GatewaySender {
        &self.sender
    }
}

/// A registered event callback
pub type Observer = Arc<dyn Fn(&Context, &Event) + Send + Sync>;

/// Registered observers, by event kind
#[derive(Default)]
pub struct Observers {
    by_kind: DashMap<EventKind, Vec<Observer>>,
    all: RwLock<Vec<Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe events of one kind
    pub fn on<F>(&self, kind: EventKind, observer: F)
    where
        F: Fn(&Context, &Event) + Send + Sync + 'static,
    {
        self.by_kind.entry(kind).or_default().push(Arc::new(observer));
        tracing::trace!(kind = %kind, "Observer registered");
    }

    /// Observe every event
    pub fn on_all<F>(&self, observer: F)
    where
        F: Fn(&Context, &Event) + Send + Sync + 'static,
    {
        self.all.write().push(Arc::new(observer));
    }

    /// Total number of observers
    pub fn len(&self) -> usize {
        let specific: usize = self.by_kind.iter().map(|entry| entry.value().len()).sum();
        specific + self.all.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run the observers of `event`
    ///
    /// The observer lists are copied out first so no lock is held while
    /// user code runs; an observer may register further observers.
    pub fn notify(&self, context: &Context, event: &Event, sink: &dyn DiagnosticSink) {
        let specific: Vec<Observer> = self
            .by_kind
            .get(&event.kind())
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        let all: Vec<Observer> = self.all.read().clone();

        for observer in specific.iter().chain(all.iter()) {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer(context, event))) {
                let message = panic_message(payload.as_ref());
                tracing::error!(event = %event.type_name(), message = %message, "Observer panicked");
                sink.report(Diagnostic::ObserverPanicked {
                    event: event.type_name().to_string(),
                    message,
                });
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("by_kind", &self.by_kind.len())
            .field("all", &self.all.read().len())
            .finish()
    }
}
