//! Editor-wide constants: canvas geometry, placement distances, limits.

/// Default node box width on the canvas.
pub const NODE_WIDTH: f64 = 100.0;
/// Default node box height on the canvas.
pub const NODE_HEIGHT: f64 = 80.0;

/// Horizontal distance between a node and an auto-placed downstream node.
pub const NEXT_X_DISTANCE: f64 = 200.0;
/// Vertical step of the placement probe when a candidate slot is occupied.
pub const NEXT_Y_DISTANCE: f64 = 100.0;

/// Horizontal clearance added around a placement candidate box.
pub const PLACEMENT_MARGIN_X: f64 = 10.0;
/// Vertical clearance added around a placement candidate box.
pub const PLACEMENT_MARGIN_Y: f64 = 8.0;

/// Undo depth before the oldest snapshots are evicted.
pub const HISTORY_DEPTH: usize = 100;

/// Operation budget for a single convert-code evaluation.
pub const CONVERT_MAX_OPS: u64 = 10_000;

/// Maximum queued events before oldest are evicted.
pub const MAX_EVENT_QUEUE: usize = 1000;
