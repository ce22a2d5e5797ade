//! Data-conversion evaluation.
//!
//! A conversion node's output is a function of its ordered binding list
//! and a user-authored expression body. Bindings resolve in list order:
//! literals directly, node-output references recursively (memoized per
//! evaluation pass, cycle-checked), widget-property references through
//! the injected read-only source. The body then runs in an operation-
//! limited script engine whose scope holds nothing but cloned resolved
//! inputs, so it cannot reach the graph or the document.
//!
//! Failures are per node: one failing body never aborts sibling nodes in
//! the same pass.

use std::collections::HashMap;

use log::{debug, warn};
use rhai::{Dynamic, Engine, Scope};
use serde_json::Value;

use crate::config::CONVERT_MAX_OPS;
use crate::entities::graph::GraphModel;
use crate::entities::properties::{ConvertRef, ConvertValue, DataConvert};
use crate::error::FlowError;

/// Read-only accessor for rendered widget properties, supplied by the
/// rendering layer.
pub trait WidgetPropertySource {
    fn get_component_property(&self, component_id: &str, prop: &str) -> Option<Value>;
}

/// Source with no rendered components; every widget binding is absent.
#[derive(Debug, Default)]
pub struct NoWidgets;

impl WidgetPropertySource for NoWidgets {
    fn get_component_property(&self, _component_id: &str, _prop: &str) -> Option<Value> {
        None
    }
}

/// Per-node result of an evaluation pass.
#[derive(Debug)]
pub struct NodeOutcome {
    pub node_id: String,
    pub name: Option<String>,
    pub outcome: Result<Value, FlowError>,
}

/// Results of evaluating every conversion node in a pass: successes and
/// failures side by side, so a preview can show partial results.
#[derive(Debug, Default)]
pub struct EvalReport {
    pub outcomes: Vec<NodeOutcome>,
}

impl EvalReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }
}

pub struct ConversionEngine {
    engine: Engine,
}

impl Default for ConversionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        // Runaway bodies hit the operation budget instead of hanging
        // the editor.
        engine.set_max_operations(CONVERT_MAX_OPS);
        engine.set_max_call_levels(16);
        engine.set_max_expr_depths(64, 64);
        Self { engine }
    }

    /// Evaluate one conversion node, resolving upstream references as
    /// needed. A fresh memo pass.
    pub fn evaluate(
        &self,
        graph: &GraphModel,
        node_id: &str,
        widgets: &dyn WidgetPropertySource,
    ) -> Result<Value, FlowError> {
        let mut memo = HashMap::new();
        self.eval_node(graph, node_id, widgets, &mut memo, &mut Vec::new())
    }

    /// Evaluate every conversion node in the graph as one pass, sharing
    /// the memo so common upstream nodes are computed once. Failures are
    /// isolated per node.
    pub fn evaluate_all(&self, graph: &GraphModel, widgets: &dyn WidgetPropertySource) -> EvalReport {
        let mut memo = HashMap::new();
        let targets: Vec<(String, Option<String>)> = graph
            .nodes()
            .filter(|n| n.properties.is_convert())
            .map(|n| (n.id.clone(), n.properties.display_name().map(str::to_string)))
            .collect();

        let mut report = EvalReport::default();
        for (node_id, name) in targets {
            let outcome = self.eval_node(graph, &node_id, widgets, &mut memo, &mut Vec::new());
            if let Err(err) = &outcome {
                debug!("conversion node {} failed: {}", node_id, err);
            }
            report.outcomes.push(NodeOutcome { node_id, name, outcome });
        }
        report
    }

    fn eval_node(
        &self,
        graph: &GraphModel,
        node_id: &str,
        widgets: &dyn WidgetPropertySource,
        memo: &mut HashMap<String, Value>,
        stack: &mut Vec<String>,
    ) -> Result<Value, FlowError> {
        if let Some(value) = memo.get(node_id) {
            return Ok(value.clone());
        }
        if stack.iter().any(|id| id == node_id) {
            return Err(FlowError::CyclicReference(node_id.to_string()));
        }

        let node = graph
            .get_node(node_id)
            .ok_or_else(|| FlowError::NotFound(node_id.to_string()))?;
        let dc = node
            .properties
            .as_convert()
            .cloned()
            .ok_or_else(|| FlowError::Conversion {
                node_id: node_id.to_string(),
                message: format!("'{}' node has no conversion output", node.properties.type_name()),
            })?;

        stack.push(node_id.to_string());
        let result = self.eval_convert(graph, node_id, &dc, widgets, memo, stack);
        stack.pop();

        if let Ok(value) = &result {
            memo.insert(node_id.to_string(), value.clone());
        }
        result
    }

    fn eval_convert(
        &self,
        graph: &GraphModel,
        node_id: &str,
        dc: &DataConvert,
        widgets: &dyn WidgetPropertySource,
        memo: &mut HashMap<String, Value>,
        stack: &mut Vec<String>,
    ) -> Result<Value, FlowError> {
        let mut scope = Scope::new();

        for entry in &dc.convert_list {
            if entry.key.is_empty() {
                // Dead configuration: no named slot, no positional slot.
                warn!("node {}: binding with empty key ignored", node_id);
                continue;
            }

            let resolved: Value = match &entry.value {
                None => Value::Null,
                Some(ConvertValue::Literal(value)) => value.clone(),
                Some(ConvertValue::Ref(ConvertRef::NodeOutput { node_id: target, .. })) => {
                    let target = target.as_deref().ok_or_else(|| FlowError::UnresolvedBinding {
                        node_id: node_id.to_string(),
                        key: entry.key.clone(),
                        reason: "node-output binding has no nodeId".into(),
                    })?;
                    self.eval_node(graph, target, widgets, memo, stack)?
                }
                Some(ConvertValue::Ref(ConvertRef::ComponentProp { component_id, prop, .. })) => {
                    widgets
                        .get_component_property(component_id, prop)
                        .ok_or_else(|| FlowError::UnresolvedBinding {
                            node_id: node_id.to_string(),
                            key: entry.key.clone(),
                            reason: format!("component '{component_id}' has no property '{prop}'"),
                        })?
                }
            };

            let dynamic = rhai::serde::to_dynamic(&resolved).map_err(|e| FlowError::Conversion {
                node_id: node_id.to_string(),
                message: format!("binding '{}': {e}", entry.key),
            })?;
            // Pushing a duplicate key shadows the earlier entry: later
            // duplicates win, matching binding-list semantics.
            scope.push_dynamic(entry.key.clone(), dynamic);
        }

        let output: Dynamic = self
            .engine
            .eval_with_scope(&mut scope, &dc.convert_code)
            .map_err(|e| FlowError::Conversion {
                node_id: node_id.to_string(),
                message: e.to_string(),
            })?;

        rhai::serde::from_dynamic(&output).map_err(|e| FlowError::Conversion {
            node_id: node_id.to_string(),
            message: format!("output not representable: {e}"),
        })
    }
}
