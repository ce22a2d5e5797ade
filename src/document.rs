//! Flow-document persistence.
//!
//! The persisted document carries the rendered component tree, a list of
//! logic graphs, the component registry and a format version. Load and
//! save are a lossless pair: node and edge ids and property payloads come
//! back exactly as stored, with unrecognized fields preserved through
//! flattened extras maps.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{NODE_HEIGHT, NODE_WIDTH};
use crate::convert::WidgetPropertySource;
use crate::entities::edge::FlowEdge;
use crate::entities::geometry::Point;
use crate::entities::graph::GraphModel;
use crate::entities::node::FlowNode;
use crate::entities::registry::{NodeRegistry, WIRE_EDGE};
use crate::error::FlowError;

fn default_edge_type() -> String {
    WIRE_EDGE.to_string()
}

fn default_properties() -> Value {
    Value::Object(Default::default())
}

/// One node of the rendered component tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub id: String,
    pub component_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_properties")]
    pub props: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

/// Entry of the component registry (package + version pin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRef {
    pub package: String,
    pub component_name: String,
    pub version: String,
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

/// Wire form of a logic node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_properties")]
    pub properties: Value,
}

/// Wire form of a logic edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEdge {
    pub id: String,
    #[serde(rename = "type", default = "default_edge_type")]
    pub edge_type: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub start_point: Point,
    pub end_point: Point,
    #[serde(default = "default_properties")]
    pub properties: Value,
    #[serde(default)]
    pub points_list: Vec<Point>,
}

/// One logic graph as persisted: parallel node and edge arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogicGraph {
    #[serde(default)]
    pub nodes: Vec<WireNode>,
    #[serde(default)]
    pub edges: Vec<WireEdge>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

impl LogicGraph {
    /// Materialize the wire arrays into a validated in-memory graph.
    pub fn to_graph(&self) -> Result<GraphModel, FlowError> {
        let registry = NodeRegistry::builtin();
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for wire in &self.nodes {
            let properties = registry.parse(&wire.node_type, &wire.properties)?;
            nodes.push(FlowNode::new(
                wire.id.clone(),
                wire.x,
                wire.y,
                NODE_WIDTH,
                NODE_HEIGHT,
                properties,
            ));
        }
        let mut edges = Vec::with_capacity(self.edges.len());
        for wire in &self.edges {
            if wire.edge_type != WIRE_EDGE {
                return Err(FlowError::InvalidSpec(format!(
                    "unrecognized edge type '{}'",
                    wire.edge_type
                )));
            }
            edges.push(FlowEdge {
                id: wire.id.clone(),
                source_node_id: wire.source_node_id.clone(),
                target_node_id: wire.target_node_id.clone(),
                start_point: wire.start_point,
                end_point: wire.end_point,
                points_list: if wire.points_list.is_empty() {
                    vec![wire.start_point, wire.end_point]
                } else {
                    wire.points_list.clone()
                },
                properties: wire.properties.clone(),
            });
        }
        GraphModel::from_parts(nodes, edges)
    }

    /// Serialize a live graph back to the wire arrays.
    pub fn from_graph(graph: &GraphModel) -> Self {
        let registry = NodeRegistry::builtin();
        let nodes = graph
            .nodes()
            .map(|node| {
                let (node_type, properties) = registry.to_wire(&node.properties);
                WireNode {
                    id: node.id.clone(),
                    node_type,
                    x: node.x,
                    y: node.y,
                    properties,
                }
            })
            .collect();
        let edges = graph
            .edges()
            .map(|edge| WireEdge {
                id: edge.id.clone(),
                edge_type: WIRE_EDGE.to_string(),
                source_node_id: edge.source_node_id.clone(),
                target_node_id: edge.target_node_id.clone(),
                start_point: edge.start_point,
                end_point: edge.end_point,
                properties: edge.properties.clone(),
                points_list: edge.points_list.clone(),
            })
            .collect();
        Self {
            nodes,
            edges,
            extras: BTreeMap::new(),
        }
    }
}

/// The full persisted editor session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDocument {
    #[serde(default)]
    pub components_tree: Vec<ComponentNode>,
    #[serde(default)]
    pub logic_list: Vec<LogicGraph>,
    #[serde(default)]
    pub components_map: Vec<ComponentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utils: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extras: BTreeMap<String, Value>,
}

impl FlowDocument {
    pub fn from_json(text: &str) -> Result<Self, FlowError> {
        serde_json::from_str(text)
            .map_err(|e| FlowError::Document(format!("malformed flow document: {e}")))
    }

    pub fn to_json(&self) -> Result<String, FlowError> {
        serde_json::to_string_pretty(self).map_err(FlowError::from)
    }

    pub fn load(path: &Path) -> Result<Self, FlowError> {
        let text = fs::read_to_string(path)
            .map_err(|e| FlowError::Document(format!("{}: {e}", path.display())))?;
        let doc = Self::from_json(&text)?;
        info!(
            "loaded flow document from {}: {} component(s), {} logic graph(s)",
            path.display(),
            doc.components_tree.len(),
            doc.logic_list.len()
        );
        Ok(doc)
    }

    pub fn save(&self, path: &Path) -> Result<(), FlowError> {
        let text = self.to_json()?;
        fs::write(path, text)
            .map_err(|e| FlowError::Document(format!("{}: {e}", path.display())))
    }

    /// Look up a live widget property by walking the component tree.
    pub fn component_property(&self, component_id: &str, prop: &str) -> Option<Value> {
        fn walk<'a>(nodes: &'a [ComponentNode], id: &str) -> Option<&'a ComponentNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = walk(&node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.components_tree, component_id)?
            .props
            .get(prop)
            .cloned()
    }
}

impl WidgetPropertySource for FlowDocument {
    fn get_component_property(&self, component_id: &str, prop: &str) -> Option<Value> {
        self.component_property(component_id, prop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_document() -> Value {
        json!({
            "componentsTree": [
                {
                    "id": "Root_h1ep",
                    "componentName": "Root",
                    "props": { "style": {} },
                    "children": [
                        {
                            "id": "Input_l3l6",
                            "condition": true,
                            "componentName": "Input",
                            "name": "input",
                            "props": { "submitKey": "Input_l3l6", "value": "seed" }
                        }
                    ]
                }
            ],
            "logicList": [
                {
                    "nodes": [
                        {
                            "id": "init_1azos4vjtni8000",
                            "type": "event-node",
                            "x": 100.0,
                            "y": 80.0,
                            "properties": {
                                "componentId": "page_init",
                                "componentName": "pageInit",
                                "name": "page init"
                            }
                        },
                        {
                            "id": "logic_98ujn64fwy00000",
                            "type": "common-node",
                            "x": 260.0,
                            "y": 80.0,
                            "properties": {
                                "type": "dataSource",
                                "name": "fetch",
                                "componentName": "dataSource"
                            }
                        },
                        {
                            "id": "logic_fsygrbs67t4000",
                            "type": "common-node",
                            "x": 420.0,
                            "y": 140.0,
                            "properties": {
                                "type": "dataConvert",
                                "name": "convert 1",
                                "componentName": "dataConvert",
                                "dc": {
                                    "convertList": [
                                        { "key": "key1", "value": 3 },
                                        { "key": "key2" }
                                    ],
                                    "convertCode": "return [1, 2, 3]"
                                }
                            }
                        }
                    ],
                    "edges": [
                        {
                            "id": "logic_fz4h8dc8yds000",
                            "type": "logic-line",
                            "sourceNodeId": "init_1azos4vjtni8000",
                            "targetNodeId": "logic_98ujn64fwy00000",
                            "startPoint": { "x": 150.0, "y": 80.0 },
                            "endPoint": { "x": 210.0, "y": 80.0 },
                            "properties": {},
                            "pointsList": [
                                { "x": 150.0, "y": 80.0 },
                                { "x": 210.0, "y": 80.0 }
                            ]
                        }
                    ]
                }
            ],
            "componentsMap": [
                { "package": "suda-basic-material", "componentName": "Input", "version": "0.0.3" }
            ],
            "utils": [],
            "version": "1.0.0"
        })
    }

    #[test]
    fn test_document_round_trips_losslessly() {
        let raw = sample_document();
        let doc = FlowDocument::from_json(&raw.to_string()).unwrap();
        let back: Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn test_graph_round_trip_preserves_ids_and_properties() {
        let doc = FlowDocument::from_json(&sample_document().to_string()).unwrap();
        let graph = doc.logic_list[0].to_graph().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 1);

        let rebuilt = LogicGraph::from_graph(&graph);
        let before = serde_json::to_value(&doc.logic_list[0]).unwrap();
        let after = serde_json::to_value(&rebuilt).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_dangling_edge_rejected_on_load() {
        let mut raw = sample_document();
        raw["logicList"][0]["edges"][0]["targetNodeId"] = json!("logic_missing");
        let doc = FlowDocument::from_json(&raw.to_string()).unwrap();
        assert!(matches!(
            doc.logic_list[0].to_graph(),
            Err(FlowError::DanglingEndpoint(_))
        ));
    }

    #[test]
    fn test_component_property_lookup_walks_tree() {
        let doc = FlowDocument::from_json(&sample_document().to_string()).unwrap();
        assert_eq!(
            doc.component_property("Input_l3l6", "value"),
            Some(json!("seed"))
        );
        assert_eq!(doc.component_property("Input_l3l6", "missing"), None);
        assert_eq!(doc.component_property("ghost", "value"), None);
    }

    #[test]
    fn test_document_backs_conversion_evaluation() {
        use crate::convert::ConversionEngine;
        use crate::entities::properties::{ConvertEntry, ConvertRef, ConvertValue, NodeProperties};

        let doc = FlowDocument::from_json(&sample_document().to_string()).unwrap();
        let mut graph = doc.logic_list[0].to_graph().unwrap();

        // Rebind the conversion node to the Input widget's live value
        let mut props = match &graph.get_node("logic_fsygrbs67t4000").unwrap().properties {
            NodeProperties::DataConvert(p) => p.clone(),
            other => panic!("expected conversion node, got {:?}", other),
        };
        props.dc.convert_list = vec![ConvertEntry {
            key: "seed".into(),
            value: Some(ConvertValue::Ref(ConvertRef::ComponentProp {
                component_id: "Input_l3l6".into(),
                prop: "value".into(),
                extras: Default::default(),
            })),
        }];
        props.dc.convert_code = "return seed + \"!\"".into();
        graph
            .set_node_properties("logic_fsygrbs67t4000", NodeProperties::DataConvert(props))
            .unwrap();

        let engine = ConversionEngine::new();
        let out = engine.evaluate(&graph, "logic_fsygrbs67t4000", &doc).unwrap();
        assert_eq!(out, json!("seed!"));
    }

    #[test]
    fn test_loaded_ids_stay_reserved() {
        let doc = FlowDocument::from_json(&sample_document().to_string()).unwrap();
        let mut graph = doc.logic_list[0].to_graph().unwrap();
        let existing: Vec<String> = graph.nodes().map(|n| n.id.clone()).collect();

        graph.remove_node("logic_fsygrbs67t4000");
        for _ in 0..20 {
            let fresh = graph.add_typed_node(
                crate::entities::properties::NodeProperties::DataConvert(Default::default()),
                0.0,
                0.0,
            );
            assert!(!existing.contains(&fresh.id));
        }
    }
}
