//! Pub/sub event center decoupling graph mutations from UI observers.
//!
//! Architecture:
//! - Observers subscribe with callbacks (immediate invocation)
//! - emit() invokes callbacks synchronously AND queues for deferred processing
//! - poll() returns queued events for batch processing in a host main loop
//!
//! Callback order: FIFO (first-subscribed, first-called). Every mutating
//! GraphModel call emits before returning, so a callback always observes
//! the model in its post-mutation state.

use std::sync::{Arc, Mutex, RwLock};

use log::warn;

use crate::config::MAX_EVENT_QUEUE;
use crate::entities::edge::FlowEdge;
use crate::entities::node::FlowNode;

/// Everything observable about the graph, as one tagged event type.
#[derive(Debug, Clone)]
pub enum GraphEvent {
    NodeAdded { node: FlowNode },
    NodeRemoved { node_id: String },
    NodeMoved { node_id: String, x: f64, y: f64 },
    PropertiesChanged { node_id: String },
    EdgeAdded { edge: FlowEdge },
    EdgeRemoved { edge_id: String },
    SelectionChanged { selected: Option<String> },
    /// Auto-placement surfaces the new node's context menu.
    ContextMenuRequested { node_id: String },
    /// The whole graph was replaced from a history snapshot.
    GraphRestored,
}

impl GraphEvent {
    /// Short event label for logging and dispatch tables.
    pub fn name(&self) -> &'static str {
        match self {
            GraphEvent::NodeAdded { .. } => "node:added",
            GraphEvent::NodeRemoved { .. } => "node:removed",
            GraphEvent::NodeMoved { .. } => "node:moved",
            GraphEvent::PropertiesChanged { .. } => "node:properties-changed",
            GraphEvent::EdgeAdded { .. } => "edge:added",
            GraphEvent::EdgeRemoved { .. } => "edge:removed",
            GraphEvent::SelectionChanged { .. } => "selection:changed",
            GraphEvent::ContextMenuRequested { .. } => "node:context-menu",
            GraphEvent::GraphRestored => "graph:restored",
        }
    }
}

type Callback = Arc<dyn Fn(&GraphEvent) + Send + Sync>;

/// Pub/sub event bus with deferred processing support.
///
/// Cloning is cheap and shares the subscriber list and queue, so the
/// same bus can be handed to a GraphModel and kept by the session
/// context.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Callback>>>,
    queue: Arc<Mutex<Vec<GraphEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to all graph events. Callbacks fire in subscription order.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&GraphEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(callback));
    }

    /// Emit event: invoke callbacks immediately AND queue for poll().
    pub fn emit(&self, event: GraphEvent) {
        {
            let subs = self.subscribers.read().unwrap_or_else(|e| e.into_inner());
            for cb in subs.iter() {
                cb(&event);
            }
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= MAX_EVENT_QUEUE {
            let evict = queue.len() / 2;
            warn!("event queue full ({} events), evicting oldest {}", queue.len(), evict);
            queue.drain(0..evict);
        }
        queue.push(event);
    }

    /// Drain all queued events since the last poll.
    pub fn poll(&self) -> Vec<GraphEvent> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Drop all subscribers and queued events.
    pub fn clear(&self) {
        self.subscribers.write().unwrap_or_else(|e| e.into_inner()).clear();
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("queue_len", &self.queue_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    #[test]
    fn test_subscribe_emit_immediate() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&counter);

        bus.subscribe(move |e| {
            if matches!(e, GraphEvent::NodeRemoved { .. }) {
                c.fetch_add(1, Ordering::SeqCst);
            }
        });

        bus.emit(GraphEvent::NodeRemoved { node_id: "a".into() });
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        bus.emit(GraphEvent::GraphRestored);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_order() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let log = Arc::clone(&seen);
            bus.subscribe(move |_| log.lock().unwrap().push(tag));
        }

        bus.emit(GraphEvent::GraphRestored);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_emit_queues_for_poll() {
        let bus = EventBus::new();
        bus.emit(GraphEvent::NodeRemoved { node_id: "a".into() });
        bus.emit(GraphEvent::GraphRestored);

        let events = bus.poll();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "node:removed");
        assert_eq!(bus.poll().len(), 0);
    }

    #[test]
    fn test_clone_shares_state() {
        let bus = EventBus::new();
        let counter = Arc::new(AtomicI32::new(0));
        let c = Arc::clone(&counter);
        bus.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let handle = bus.clone();
        handle.emit(GraphEvent::GraphRestored);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(bus.queue_len(), 1);
    }
}
