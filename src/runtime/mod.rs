//! Per-node runtime behavior: auto-placement and render gating.
//!
//! Everything here operates on an explicitly passed GraphModel; nodes
//! never hold an ambient reference to shared state.

pub mod placement;
pub mod render;

pub use placement::{add_next_node, NextNodeRequest};
pub use render::{RenderGate, RenderState};
