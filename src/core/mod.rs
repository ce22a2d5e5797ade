//! Core engine: event center and undo/redo history.

pub mod event_bus;
pub mod history;

pub use event_bus::{EventBus, GraphEvent};
pub use history::HistoryStack;
