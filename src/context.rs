//! Editor session context: the composition root.
//!
//! One context owns one graph, the shared event bus, the history ledger
//! and the conversion engine. Everything is wired explicitly here; no
//! module reaches for globals.

use log::debug;

use crate::convert::{ConversionEngine, EvalReport, WidgetPropertySource};
use crate::core::event_bus::EventBus;
use crate::core::history::HistoryStack;
use crate::document::LogicGraph;
use crate::entities::graph::GraphModel;
use crate::error::FlowError;

pub struct Context {
    events: EventBus,
    graph: GraphModel,
    history: HistoryStack,
    engine: ConversionEngine,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Fresh session with an empty graph. The empty state is committed as
    /// the undo baseline.
    pub fn new() -> Self {
        let events = EventBus::new();
        let graph = GraphModel::with_bus(events.clone());
        let mut history = HistoryStack::new();
        history.commit(graph.snapshot());
        Self {
            events,
            graph,
            history,
            engine: ConversionEngine::new(),
        }
    }

    /// Session seeded from a persisted logic graph.
    pub fn from_logic(logic: &LogicGraph) -> Result<Self, FlowError> {
        let mut ctx = Self::new();
        ctx.graph = logic.to_graph()?;
        ctx.events = ctx.graph.events().clone();
        ctx.history.clear();
        ctx.history.commit(ctx.graph.snapshot());
        Ok(ctx)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut GraphModel {
        &mut self.graph
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Record the current graph state as an undoable step.
    pub fn commit(&mut self) {
        self.history.commit(self.graph.snapshot());
    }

    /// Step the graph back to the previous committed state. Returns false
    /// when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.graph.restore(&snapshot);
                true
            }
            None => {
                debug!("undo: at history floor");
                false
            }
        }
    }

    /// Step forward after an undo. Returns false when there is nothing to
    /// redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.graph.restore(&snapshot);
                true
            }
            None => false,
        }
    }

    /// Evaluate every conversion node in the graph.
    pub fn evaluate_all(&self, widgets: &dyn WidgetPropertySource) -> EvalReport {
        self.engine.evaluate_all(&self.graph, widgets)
    }

    /// Evaluate a single conversion node.
    pub fn evaluate(
        &self,
        node_id: &str,
        widgets: &dyn WidgetPropertySource,
    ) -> Result<serde_json::Value, FlowError> {
        self.engine.evaluate(&self.graph, node_id, widgets)
    }
}
