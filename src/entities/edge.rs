//! FlowEdge: a directional connection between two node anchors.

use serde_json::Value;

use super::geometry::{Point, Rect};

#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    pub id: String,
    pub source_node_id: String,
    pub target_node_id: String,
    pub start_point: Point,
    pub end_point: Point,
    /// Full polyline including start and end; straight edges carry just
    /// those two points, deep auto-placements add explicit bends.
    pub points_list: Vec<Point>,
    /// Wire props carried verbatim (usually an empty object).
    pub properties: Value,
}

impl FlowEdge {
    /// Bounding box over the full polyline, for area queries.
    pub fn bounds(&self) -> Rect {
        Rect::around_points(&self.points_list)
            .unwrap_or_else(|| Rect::from_corners(self.start_point, self.end_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounds_cover_waypoints() {
        let edge = FlowEdge {
            id: "e1".into(),
            source_node_id: "a".into(),
            target_node_id: "b".into(),
            start_point: Point::new(0.0, 0.0),
            end_point: Point::new(100.0, 0.0),
            points_list: vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 80.0),
                Point::new(100.0, 0.0),
            ],
            properties: json!({}),
        };
        let b = edge.bounds();
        assert_eq!((b.left, b.top, b.right, b.bottom), (0.0, 0.0, 100.0, 80.0));
    }
}
