//! Core error types for the relation graph
//!
//! Graph building, traversal and rendering never fail: absent metadata is an
//! ordinary outcome and simply contributes nothing. These errors only come
//! out of the boundaries, parsing user-supplied node references and loading
//! metadata snapshots.

use thiserror::Error;

/// Errors raised at the edges of the graph engine
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid node reference '{input}': {reason}")]
    InvalidNodeId { input: String, reason: String },

    #[error("Ambiguous node id: '{entity_type}' + '{bundle}' cannot be encoded as a diagram id")]
    AmbiguousNodeId { entity_type: String, bundle: String },

    #[error("Snapshot error: {message}")]
    Snapshot { message: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl GraphError {
    /// Create a new invalid node reference error
    pub fn invalid_node_id(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new ambiguous node id error
    pub fn ambiguous_node_id(entity_type: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self::AmbiguousNodeId {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
        }
    }

    /// Create a new snapshot error
    pub fn snapshot_error(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }
}
