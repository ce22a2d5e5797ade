//! Graph entities: nodes, edges, geometry, typed properties and the
//! authoritative GraphModel.

pub mod edge;
pub mod geometry;
pub mod graph;
pub mod node;
pub mod properties;
pub mod registry;

pub use edge::FlowEdge;
pub use geometry::{Anchor, AnchorKind, Point, Rect};
pub use graph::{AreaElement, EdgeSpec, GraphModel, GraphSnapshot, NodeSpec};
pub use node::FlowNode;
pub use properties::{ConvertEntry, ConvertRef, ConvertValue, DataConvert, NodeProperties};
pub use registry::NodeRegistry;
