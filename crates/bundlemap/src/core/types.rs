//! Core type definitions for the relation graph
//!
//! This module contains the value types shared by every stage of the
//! pipeline: the bundle node identifier, the field-labelled relation edge,
//! and the flow direction of a rendered diagram.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::GraphError;

/// Separator placed between entity type and bundle in a diagram id
pub const DIAGRAM_ID_SEPARATOR: &str = "__";

/// Identifies one graph vertex: a bundle of an entity type (`node/article`)
///
/// Equality, ordering and hashing are structural over
/// `(entity_type, bundle)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    entity_type: String,
    bundle: String,
}

impl NodeId {
    /// Create a node id from an entity type and one of its bundles
    pub fn new(entity_type: impl Into<String>, bundle: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
        }
    }

    /// Parse the human form `entity_type/bundle`
    ///
    /// Both halves must be non-empty and the pair must encode
    /// unambiguously as a diagram id.
    ///
    /// ```rust
    /// use bundlemap::NodeId;
    ///
    /// let id = NodeId::parse("node/article").unwrap();
    /// assert_eq!(id.entity_type(), "node");
    /// assert_eq!(id.bundle(), "article");
    /// assert!(NodeId::parse("node").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, GraphError> {
        let trimmed = input.trim();
        let (entity_type, bundle) = trimmed
            .split_once('/')
            .ok_or_else(|| GraphError::invalid_node_id(input, "expected entity_type/bundle"))?;

        if entity_type.is_empty() || bundle.is_empty() {
            return Err(GraphError::invalid_node_id(
                input,
                "entity type and bundle must both be non-empty",
            ));
        }
        if bundle.contains('/') {
            return Err(GraphError::invalid_node_id(input, "too many '/' separators"));
        }

        let id = Self::new(entity_type, bundle);
        if !id.is_diagram_safe() {
            return Err(GraphError::ambiguous_node_id(entity_type, bundle));
        }
        Ok(id)
    }

    /// The entity type half of the id
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The bundle half of the id
    pub fn bundle(&self) -> &str {
        &self.bundle
    }

    /// Returns true if [`NodeId::diagram_id`] is injective for this pair
    ///
    /// The diagram id is split back at the first separator, so the entity
    /// type must not contain the separator itself nor end in an underscore
    /// that would merge with it.
    pub fn is_diagram_safe(&self) -> bool {
        !self.entity_type.is_empty()
            && !self.entity_type.contains(DIAGRAM_ID_SEPARATOR)
            && !self.entity_type.ends_with('_')
    }

    /// Identifier used for this node inside flowchart text (`node__article`)
    pub fn diagram_id(&self) -> String {
        format!(
            "{}{}{}",
            self.entity_type, DIAGRAM_ID_SEPARATOR, self.bundle
        )
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.bundle)
    }
}

impl FromStr for NodeId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A directed edge: `source` has a reference field pointing at `dest`
///
/// Two relations with the same source, dest and label are duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    pub source: NodeId,
    pub dest: NodeId,
    /// Cleaned machine name of the referencing field (may be empty)
    pub field_label: String,
}

impl Relation {
    /// Create a new relation
    pub fn new(source: NodeId, dest: NodeId, field_label: impl Into<String>) -> Self {
        Self {
            source,
            dest,
            field_label: field_label.into(),
        }
    }

    /// Returns true if either end of the relation is `node`
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.dest == node
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field_label.is_empty() {
            write!(f, "{} --> {}", self.source, self.dest)
        } else {
            write!(f, "{} -[{}]-> {}", self.source, self.field_label, self.dest)
        }
    }
}

/// Flow direction for the rendered flowchart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Direction {
    /// Top to bottom (TD or TB)
    #[default]
    TopDown,
    /// Left to right (LR)
    LeftRight,
    /// Right to left (RL)
    RightLeft,
    /// Bottom to top (BT)
    BottomUp,
}

impl Direction {
    /// Parse direction from flowchart syntax (TD, TB, LR, RL, BT)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TD" | "TB" => Some(Direction::TopDown),
            "LR" => Some(Direction::LeftRight),
            "RL" => Some(Direction::RightLeft),
            "BT" => Some(Direction::BottomUp),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TopDown => write!(f, "TD"),
            Direction::LeftRight => write!(f, "LR"),
            Direction::RightLeft => write!(f, "RL"),
            Direction::BottomUp => write!(f, "BT"),
        }
    }
}
