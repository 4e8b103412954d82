//! Event dispatch
//!
//! Applies each event to the cache, then hands it to the observers.

mod apply;
mod observers;

pub use observers::{Context, Observer, Observers};

use revolt_cache::{CacheWriter, UpdateOutcome};
use revolt_common::SharedSink;
use std::sync::Arc;

use crate::connection::GatewaySender;
use crate::events::Event;

/// Owns the cache writer; lives on the dispatch task
pub struct Dispatcher {
    writer: CacheWriter,
    observers: Arc<Observers>,
    sink: SharedSink,
    context: Context,
}

impl Dispatcher {
    pub fn new(
        writer: CacheWriter,
        observers: Arc<Observers>,
        sink: SharedSink,
        sender: GatewaySender,
    ) -> Self {
        let context = Context::new(writer.reader(), sender);
        Self {
            writer,
            observers,
            sink,
            context,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Dispatch one event
    ///
    /// A `Bulk` event is flattened: each sub-event is dispatched on its own,
    /// in wire order.
    pub fn dispatch(&mut self, event: Event) {
        if let Event::Bulk(events) = event {
            for event in events {
                self.dispatch(event);
            }
            return;
        }

        self.apply(&event);
        self.observers.notify(&self.context, &event, self.sink.as_ref());
    }

    /// Apply the cache side of an event without notifying observers
    pub fn apply(&mut self, event: &Event) -> Option<UpdateOutcome> {
        apply::apply_event(&mut self.writer, self.sink.as_ref(), event)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("observers", &self.observers)
            .finish()
    }
}
