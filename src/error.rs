//! Error taxonomy for graph mutations and conversion evaluation.
//!
//! Structural errors (node/edge creation) reject the offending mutation
//! and leave the model unchanged. Evaluation errors are per-node and
//! never abort sibling node evaluation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    /// Malformed node creation request (unknown type, bad payload).
    #[error("invalid node spec: {0}")]
    InvalidSpec(String),

    /// Edge endpoint references a node that is not in the model.
    #[error("dangling endpoint: node '{0}' is not in the graph")]
    DanglingEndpoint(String),

    /// Edge creation violated the anchor rule: edges originate at an
    /// outgoing anchor and terminate at an incoming anchor.
    #[error("illegal connection: {0}")]
    IllegalConnection(String),

    /// Element lookup by id failed.
    #[error("element '{0}' not found")]
    NotFound(String),

    /// A node-output binding chain references itself.
    #[error("cyclic reference through node '{0}'")]
    CyclicReference(String),

    /// A conversion binding could not be resolved to a value.
    #[error("unresolved binding '{key}' on node '{node_id}': {reason}")]
    UnresolvedBinding {
        node_id: String,
        key: String,
        reason: String,
    },

    /// The convert-code body failed to evaluate.
    #[error("conversion failed on node '{node_id}': {message}")]
    Conversion { node_id: String, message: String },

    /// Flow document could not be read or written.
    #[error("document error: {0}")]
    Document(String),
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Document(err.to_string())
    }
}
