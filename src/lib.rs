//! Logic-flow graph editor core.
//!
//! The authoritative graph model, its mutation and placement algorithms,
//! the conversion evaluation engine, undo/redo history and the flow
//! document persistence layer. Rendering and transport stay outside;
//! they plug in through the event bus, the widget-property source and
//! the flow-store contract.

// Core engine (events, history)
pub mod core;

// Editor modules
pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod convert;
pub mod document;
pub mod entities;
pub mod error;
pub mod runtime;

// Re-export commonly used types from core
pub use core::event_bus::{EventBus, GraphEvent};
pub use core::history::HistoryStack;

// Re-export entities and top-level surfaces
pub use context::Context;
pub use convert::{ConversionEngine, EvalReport, NoWidgets, WidgetPropertySource};
pub use document::{FlowDocument, LogicGraph};
pub use entities::{FlowEdge, FlowNode, GraphModel, NodeProperties, NodeRegistry, Point, Rect};
pub use error::FlowError;
