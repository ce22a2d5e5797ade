//! FlowNode: one typed node on the canvas.
//!
//! (x, y) is the box center. Each node exposes exactly two anchors,
//! derived from geometry: incoming on the left edge midpoint, outgoing on
//! the right edge midpoint.

use super::geometry::{Anchor, AnchorKind, Point, Rect};
use super::properties::NodeProperties;

#[derive(Debug, Clone, PartialEq)]
pub struct FlowNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub properties: NodeProperties,
    /// Runtime-only UI flags, never persisted.
    pub selected: bool,
    pub hovered: bool,
}

impl FlowNode {
    pub fn new(id: String, x: f64, y: f64, width: f64, height: f64, properties: NodeProperties) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            properties,
            selected: false,
            hovered: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(Point::new(self.x, self.y), self.width, self.height)
    }

    pub fn incoming_anchor(&self) -> Anchor {
        Anchor {
            kind: AnchorKind::Incoming,
            point: Point::new(self.x - self.width / 2.0, self.y),
        }
    }

    pub fn outgoing_anchor(&self) -> Anchor {
        Anchor {
            kind: AnchorKind::Outgoing,
            point: Point::new(self.x + self.width / 2.0, self.y),
        }
    }

    pub fn anchors(&self) -> [Anchor; 2] {
        [self.incoming_anchor(), self.outgoing_anchor()]
    }
}
