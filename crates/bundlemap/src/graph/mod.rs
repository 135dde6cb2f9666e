//! Relation graph: discovery, storage and traversal
//!
//! The graph is rebuilt from metadata for every session and never mutated
//! after construction.

mod builder;
mod relation_graph;
pub mod traversal;

pub use builder::*;
pub use relation_graph::*;
pub use traversal::{
    ancestors, descendants, get_relations, relations, DirectRelations, UNLIMITED_DEPTH,
};
