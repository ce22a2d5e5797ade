//! GraphModel: authoritative store of nodes, edges, geometry and selection.
//!
//! Single-writer discipline: nothing mutates graph state except this
//! API. Every committed mutation emits a [`GraphEvent`] synchronously
//! before the call returns, so observers (UI, history) always see the
//! post-mutation state. Structural errors reject the whole mutation and
//! leave the model untouched.
//!
//! Ids are allocated here and never reused within a session, even after
//! deletion, which keeps stale edges from resurrecting against a
//! recycled id.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use uuid::Uuid;

use crate::config::{NODE_HEIGHT, NODE_WIDTH};
use crate::core::event_bus::{EventBus, GraphEvent};
use crate::error::FlowError;

use super::edge::FlowEdge;
use super::geometry::{AnchorKind, Point, Rect};
use super::node::FlowNode;
use super::properties::NodeProperties;
use super::registry::NodeRegistry;

/// Node creation request, as it arrives from the outside (wire-typed).
#[derive(Debug, Clone)]
pub struct NodeSpec {
    /// Node-level wire type (`event-node` / `common-node`).
    pub node_type: String,
    pub x: f64,
    pub y: f64,
    /// Raw properties payload, parsed through the node-type registry.
    pub properties: Value,
}

/// Edge creation request. Anchors describe the gesture: which anchor the
/// drag started from and which it was dropped on.
#[derive(Debug, Clone)]
pub struct EdgeSpec {
    pub source_node_id: String,
    pub target_node_id: String,
    pub source_anchor: AnchorKind,
    pub target_anchor: AnchorKind,
    pub start_point: Option<Point>,
    pub end_point: Option<Point>,
    pub points_list: Option<Vec<Point>>,
}

impl EdgeSpec {
    /// Spec for the normal gesture: outgoing anchor to incoming anchor,
    /// geometry derived from the endpoint nodes.
    pub fn between(source_node_id: impl Into<String>, target_node_id: impl Into<String>) -> Self {
        Self {
            source_node_id: source_node_id.into(),
            target_node_id: target_node_id.into(),
            source_anchor: AnchorKind::Outgoing,
            target_anchor: AnchorKind::Incoming,
            start_point: None,
            end_point: None,
            points_list: None,
        }
    }
}

/// Element reference returned by area queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaElement {
    Node(String),
    Edge(String),
}

/// Immutable capture of the full graph state, owned by the history stack.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSnapshot {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
    selected: Option<String>,
}

impl GraphSnapshot {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

pub struct GraphModel {
    nodes: IndexMap<String, FlowNode>,
    edges: IndexMap<String, FlowEdge>,
    selected: Option<String>,
    /// Every id ever handed out or loaded, live or deleted.
    used_ids: HashSet<String>,
    registry: &'static NodeRegistry,
    events: EventBus,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphModel {
    pub fn new() -> Self {
        Self::with_bus(EventBus::new())
    }

    /// Graph sharing an existing bus (the session context's).
    pub fn with_bus(events: EventBus) -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            selected: None,
            used_ids: HashSet::new(),
            registry: NodeRegistry::builtin(),
            events,
        }
    }

    /// Rebuild a graph from already-identified parts (document load).
    /// Validates edge endpoints; no events are emitted for bulk loads.
    pub fn from_parts(nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> Result<Self, FlowError> {
        let mut graph = Self::new();
        for node in nodes {
            if !graph.used_ids.insert(node.id.clone()) {
                return Err(FlowError::InvalidSpec(format!("duplicate node id '{}'", node.id)));
            }
            graph.nodes.insert(node.id.clone(), node);
        }
        for edge in edges {
            if !graph.nodes.contains_key(&edge.source_node_id) {
                return Err(FlowError::DanglingEndpoint(edge.source_node_id));
            }
            if !graph.nodes.contains_key(&edge.target_node_id) {
                return Err(FlowError::DanglingEndpoint(edge.target_node_id));
            }
            if !graph.used_ids.insert(edge.id.clone()) {
                return Err(FlowError::InvalidSpec(format!("duplicate edge id '{}'", edge.id)));
            }
            graph.edges.insert(edge.id.clone(), edge);
        }
        Ok(graph)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    // ========== Lookup ==========

    pub fn get_node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.get(id)
    }

    pub fn get_edge(&self, id: &str) -> Option<&FlowEdge> {
        self.edges.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.edges.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    // ========== Mutation ==========

    /// Insert a node from a wire-typed spec. Fails with `InvalidSpec`
    /// when the type or payload is unrecognized.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<FlowNode, FlowError> {
        let properties = self.registry.parse(&spec.node_type, &spec.properties)?;
        Ok(self.add_typed_node(properties, spec.x, spec.y))
    }

    /// Insert a node whose properties are already typed (internal
    /// callers: auto-placement, tests).
    pub fn add_typed_node(&mut self, properties: NodeProperties, x: f64, y: f64) -> FlowNode {
        let prefix = match properties {
            NodeProperties::Event(_) => "init",
            _ => "logic",
        };
        let id = self.alloc_id(prefix);
        let node = FlowNode::new(id.clone(), x, y, NODE_WIDTH, NODE_HEIGHT, properties);
        self.nodes.insert(id, node.clone());
        self.events.emit(GraphEvent::NodeAdded { node: node.clone() });
        node
    }

    /// Create an edge between two anchors. Endpoint nodes must exist and
    /// the gesture must run outgoing → incoming; otherwise the model is
    /// left unchanged.
    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<FlowEdge, FlowError> {
        let source = self
            .nodes
            .get(&spec.source_node_id)
            .ok_or_else(|| FlowError::DanglingEndpoint(spec.source_node_id.clone()))?;
        let target = self
            .nodes
            .get(&spec.target_node_id)
            .ok_or_else(|| FlowError::DanglingEndpoint(spec.target_node_id.clone()))?;

        if spec.target_anchor != AnchorKind::Incoming {
            return Err(FlowError::IllegalConnection(
                "an edge may only terminate at an incoming anchor".into(),
            ));
        }
        if spec.source_anchor != AnchorKind::Outgoing {
            return Err(FlowError::IllegalConnection(
                "an edge may only originate at an outgoing anchor".into(),
            ));
        }

        let start_point = spec.start_point.unwrap_or(source.outgoing_anchor().point);
        let end_point = spec.end_point.unwrap_or(target.incoming_anchor().point);
        let points_list = spec
            .points_list
            .unwrap_or_else(|| vec![start_point, end_point]);

        let id = self.alloc_id("logic");
        let edge = FlowEdge {
            id: id.clone(),
            source_node_id: spec.source_node_id,
            target_node_id: spec.target_node_id,
            start_point,
            end_point,
            points_list,
            properties: Value::Object(Default::default()),
        };
        self.edges.insert(id, edge.clone());
        self.events.emit(GraphEvent::EdgeAdded { edge: edge.clone() });
        Ok(edge)
    }

    /// Remove a node and cascade-remove every edge touching it. No-op
    /// when the id is absent.
    pub fn remove_node(&mut self, id: &str) {
        if !self.nodes.contains_key(id) {
            debug!("remove_node: '{}' not in graph, ignoring", id);
            return;
        }

        let attached: Vec<String> = self
            .edges
            .values()
            .filter(|e| e.source_node_id == id || e.target_node_id == id)
            .map(|e| e.id.clone())
            .collect();
        for edge_id in attached {
            self.remove_edge(&edge_id);
        }

        self.nodes.shift_remove(id);
        self.events.emit(GraphEvent::NodeRemoved { node_id: id.to_string() });

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.events.emit(GraphEvent::SelectionChanged { selected: None });
        }
    }

    /// Remove a single edge. No-op when the id is absent.
    pub fn remove_edge(&mut self, id: &str) {
        if self.edges.shift_remove(id).is_none() {
            debug!("remove_edge: '{}' not in graph, ignoring", id);
            return;
        }
        self.events.emit(GraphEvent::EdgeRemoved { edge_id: id.to_string() });
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
            self.events.emit(GraphEvent::SelectionChanged { selected: None });
        }
    }

    /// Move a node to new center coordinates, re-deriving the attached
    /// edges' endpoint geometry.
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<(), FlowError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| FlowError::NotFound(id.to_string()))?;
        node.x = x;
        node.y = y;
        let outgoing = node.outgoing_anchor().point;
        let incoming = node.incoming_anchor().point;

        for edge in self.edges.values_mut() {
            if edge.source_node_id == id {
                edge.start_point = outgoing;
                if let Some(first) = edge.points_list.first_mut() {
                    *first = outgoing;
                }
            }
            if edge.target_node_id == id {
                edge.end_point = incoming;
                if let Some(last) = edge.points_list.last_mut() {
                    *last = incoming;
                }
            }
        }

        self.events.emit(GraphEvent::NodeMoved { node_id: id.to_string(), x, y });
        Ok(())
    }

    /// Replace a node's typed properties (property-panel edits).
    pub fn set_node_properties(
        &mut self,
        id: &str,
        properties: NodeProperties,
    ) -> Result<(), FlowError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| FlowError::NotFound(id.to_string()))?;
        node.properties = properties;
        self.events.emit(GraphEvent::PropertiesChanged { node_id: id.to_string() });
        Ok(())
    }

    /// Transient hover flag; no event, hover is not model state worth
    /// notifying about.
    pub fn set_hovered(&mut self, id: &str, hovered: bool) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.hovered = hovered;
        }
    }

    /// Select exactly one element by id, or clear the selection with
    /// None. Unknown ids are rejected.
    pub fn select_element_by_id(&mut self, id: Option<&str>) -> Result<(), FlowError> {
        if let Some(id) = id {
            if !self.nodes.contains_key(id) && !self.edges.contains_key(id) {
                return Err(FlowError::NotFound(id.to_string()));
            }
        }
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
        if let Some(id) = id {
            if let Some(node) = self.nodes.get_mut(id) {
                node.selected = true;
            }
        }
        self.selected = id.map(str::to_string);
        self.events.emit(GraphEvent::SelectionChanged { selected: self.selected.clone() });
        Ok(())
    }

    // ========== Queries ==========

    /// Every element whose bounding box intersects the rectangle. Exact
    /// closed-interval intersection: placement correctness depends on no
    /// false negatives here.
    pub fn get_area_elements(&self, top_left: Point, bottom_right: Point) -> Vec<AreaElement> {
        let area = Rect::from_corners(top_left, bottom_right);
        let mut found = Vec::new();
        for node in self.nodes.values() {
            if node.bounds().intersects(&area) {
                found.push(AreaElement::Node(node.id.clone()));
            }
        }
        for edge in self.edges.values() {
            if edge.bounds().intersects(&area) {
                found.push(AreaElement::Edge(edge.id.clone()));
            }
        }
        found
    }

    // ========== History support ==========

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
            selected: self.selected.clone(),
        }
    }

    /// Replace the live state with a snapshot. Retired ids stay retired;
    /// restoring never makes an old id allocatable again.
    pub fn restore(&mut self, snapshot: &GraphSnapshot) {
        self.nodes = snapshot
            .nodes
            .iter()
            .cloned()
            .map(|n| (n.id.clone(), n))
            .collect();
        self.edges = snapshot
            .edges
            .iter()
            .cloned()
            .map(|e| (e.id.clone(), e))
            .collect();
        for node in &snapshot.nodes {
            self.used_ids.insert(node.id.clone());
        }
        for edge in &snapshot.edges {
            self.used_ids.insert(edge.id.clone());
        }
        self.selected = snapshot.selected.clone();
        self.events.emit(GraphEvent::GraphRestored);
    }

    // ========== Internals ==========

    fn alloc_id(&mut self, prefix: &str) -> String {
        loop {
            let tail = Uuid::new_v4().simple().to_string();
            let id = format!("{}_{}", prefix, &tail[..16]);
            if self.used_ids.insert(id.clone()) {
                return id;
            }
        }
    }
}

impl std::fmt::Debug for GraphModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphModel")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("selected", &self.selected)
            .finish()
    }
}
