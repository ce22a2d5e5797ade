//! Re-render gating for node views.
//!
//! A node's visual state only depends on its properties and the
//! selected/hovered flags. The gate memoizes the last observed state and
//! lets a renderer skip work when nothing observable changed. Equality
//! is structural on the typed model, not on a serialized string, so it
//! is immune to key-ordering noise.

use crate::entities::node::FlowNode;
use crate::entities::properties::NodeProperties;

/// The observable slice of a node that a renderer depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    pub properties: NodeProperties,
    pub selected: bool,
    pub hovered: bool,
}

impl RenderState {
    pub fn of(node: &FlowNode) -> Self {
        Self {
            properties: node.properties.clone(),
            selected: node.selected,
            hovered: node.hovered,
        }
    }
}

/// Per-node memoization guard. One gate per rendered node view.
#[derive(Debug, Default)]
pub struct RenderGate {
    last: Option<RenderState>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the node's observable state differs from the previously
    /// rendered one; records the new state when it does.
    pub fn should_update(&mut self, node: &FlowNode) -> bool {
        let state = RenderState::of(node);
        if self.last.as_ref() == Some(&state) {
            return false;
        }
        self.last = Some(state);
        true
    }

    /// Forget the memoized state (forces the next check to pass).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
