//! Downstream-node insertion with collision-avoiding auto-placement.
//!
//! Inserting the next node from an existing one puts the candidate a
//! fixed horizontal distance to the right, then probes downward in fixed
//! vertical steps until the padded candidate box overlaps nothing. The
//! probe terminates because the occupied elements are finite and each
//! step strictly lowers the scan line. Placement, edge creation and
//! selection run to completion as one unit; there is no cancellation
//! point that could leave a node without its connecting edge.

use log::debug;

use crate::config::{
    NEXT_X_DISTANCE, NEXT_Y_DISTANCE, NODE_HEIGHT, NODE_WIDTH, PLACEMENT_MARGIN_X,
    PLACEMENT_MARGIN_Y,
};
use crate::core::event_bus::GraphEvent;
use crate::entities::edge::FlowEdge;
use crate::entities::geometry::Point;
use crate::entities::graph::{EdgeSpec, GraphModel};
use crate::entities::node::FlowNode;
use crate::entities::properties::NodeProperties;
use crate::error::FlowError;

/// Request to insert a new node downstream of `source_id`.
#[derive(Debug, Clone)]
pub struct NextNodeRequest {
    pub source_id: String,
    pub properties: NodeProperties,
}

/// Insert a node downstream of an existing one: auto-place it, wire the
/// connecting edge, select it and surface its context menu.
///
/// Takes the graph as an explicit parameter; placement never reaches for
/// ambient shared state.
pub fn add_next_node(
    graph: &mut GraphModel,
    request: NextNodeRequest,
) -> Result<(FlowNode, FlowEdge), FlowError> {
    let source = graph
        .get_node(&request.source_id)
        .cloned()
        .ok_or_else(|| FlowError::NotFound(request.source_id.clone()))?;

    let x = source.x + NEXT_X_DISTANCE;
    let mut next_y = 0.0;
    loop {
        let cy = source.y + next_y;
        let top_left = Point::new(
            x - NODE_WIDTH / 2.0 - PLACEMENT_MARGIN_X,
            cy - NODE_HEIGHT / 2.0 - PLACEMENT_MARGIN_Y,
        );
        let bottom_right = Point::new(
            x + NODE_WIDTH / 2.0 + PLACEMENT_MARGIN_X,
            cy + NODE_HEIGHT / 2.0 + PLACEMENT_MARGIN_Y,
        );
        if graph.get_area_elements(top_left, bottom_right).is_empty() {
            break;
        }
        next_y += NEXT_Y_DISTANCE;
    }

    let is_deep = next_y != 0.0;
    debug!(
        "auto-placing downstream of {} at ({}, {}), deep={}",
        source.id,
        x,
        source.y + next_y,
        is_deep
    );

    let node = graph.add_typed_node(request.properties, x, source.y + next_y);

    let start = source.outgoing_anchor().point;
    let end = node.incoming_anchor().point;
    let points_list = if is_deep {
        // Orthogonal route with an explicit bend halfway between the
        // source's outgoing anchor and the new incoming anchor.
        let mid_x = (start.x + end.x) / 2.0;
        vec![
            start,
            Point::new(mid_x, start.y),
            Point::new(mid_x, end.y),
            end,
        ]
    } else {
        vec![start, end]
    };

    let mut spec = EdgeSpec::between(&source.id, &node.id);
    spec.start_point = Some(start);
    spec.end_point = Some(end);
    spec.points_list = Some(points_list);
    let edge = graph.add_edge(spec)?;

    graph.select_element_by_id(Some(&node.id))?;
    graph
        .events()
        .emit(GraphEvent::ContextMenuRequested { node_id: node.id.clone() });

    Ok((node, edge))
}
