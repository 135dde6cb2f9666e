//! Metadata boundary
//!
//! The graph builder never talks to a content system directly. Everything it
//! needs (entity types, their bundles, the field definitions on each bundle
//! and the targets of view-restricted references) comes through the
//! [`MetadataProvider`] trait, injected by reference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod snapshot;

pub use snapshot::*;

/// Source of entity type, bundle and field metadata
///
/// Unknown ids are not errors: implementations return empty maps or `None`
/// and the builder treats that as "no relation".
pub trait MetadataProvider {
    /// Entity types that carry configurable fields, keyed by id, valued by label
    fn fieldable_entity_types(&self) -> BTreeMap<String, String>;

    /// Bundles of an entity type, keyed by bundle id, valued by label
    fn bundles_of(&self, entity_type: &str) -> BTreeMap<String, String>;

    /// Field definitions attached to one bundle, keyed by field id
    fn field_definitions(&self, entity_type: &str, bundle: &str) -> BTreeMap<String, FieldDef>;

    /// Target type and bundles implied by a saved view display
    fn resolve_view_targets(&self, view_id: &str, display_id: &str) -> Option<ViewTargets>;
}

/// Storage kind of a field
///
/// Serialized as the plain storage type name (`entity_reference`,
/// `entity_reference_revisions`, or anything else).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldStorage {
    /// Plain entity reference
    EntityReference,
    /// Entity reference that pins a revision
    EntityReferenceRevisions,
    /// Any non-reference storage type
    Other(String),
}

impl FieldStorage {
    /// Returns true for the storage kinds that can produce a relation
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            FieldStorage::EntityReference | FieldStorage::EntityReferenceRevisions
        )
    }
}

impl From<String> for FieldStorage {
    fn from(value: String) -> Self {
        match value.as_str() {
            "entity_reference" => FieldStorage::EntityReference,
            "entity_reference_revisions" => FieldStorage::EntityReferenceRevisions,
            _ => FieldStorage::Other(value),
        }
    }
}

impl From<FieldStorage> for String {
    fn from(value: FieldStorage) -> Self {
        match value {
            FieldStorage::EntityReference => "entity_reference".to_string(),
            FieldStorage::EntityReferenceRevisions => "entity_reference_revisions".to_string(),
            FieldStorage::Other(name) => name,
        }
    }
}

/// How a reference field restricts the entities it may point at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionHandler {
    /// A static list of target bundles; empty means every bundle of the type
    Default {
        #[serde(default)]
        target_bundles: Vec<String>,
    },
    /// Choices come from a saved view display
    Views { view_id: String, display_id: String },
}

impl Default for SelectionHandler {
    fn default() -> Self {
        SelectionHandler::Default {
            target_bundles: Vec::new(),
        }
    }
}

/// Reference settings of an entity reference field
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferenceSettings {
    /// Fixed target entity type, if the field declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default)]
    pub handler: SelectionHandler,
}

/// One field definition on a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub storage: FieldStorage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSettings>,
}

impl FieldDef {
    /// A non-reference field with the given storage type name
    pub fn plain(storage: impl Into<String>) -> Self {
        Self {
            storage: FieldStorage::from(storage.into()),
            reference: None,
        }
    }

    /// An entity reference to a fixed type and bundle list
    pub fn reference<I, S>(target_type: impl Into<String>, target_bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            storage: FieldStorage::EntityReference,
            reference: Some(ReferenceSettings {
                target_type: Some(target_type.into()),
                handler: SelectionHandler::Default {
                    target_bundles: target_bundles.into_iter().map(Into::into).collect(),
                },
            }),
        }
    }

    /// A revisioned entity reference to a fixed type and bundle list
    pub fn revisions_reference<I, S>(target_type: impl Into<String>, target_bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            storage: FieldStorage::EntityReferenceRevisions,
            ..Self::reference(target_type, target_bundles)
        }
    }

    /// An entity reference whose choices come from a saved view display
    pub fn view_reference(view_id: impl Into<String>, display_id: impl Into<String>) -> Self {
        Self {
            storage: FieldStorage::EntityReference,
            reference: Some(ReferenceSettings {
                target_type: None,
                handler: SelectionHandler::Views {
                    view_id: view_id.into(),
                    display_id: display_id.into(),
                },
            }),
        }
    }
}

/// Target type and bundles resolved from a view display's filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTargets {
    pub target_type: String,
    #[serde(default)]
    pub bundles: Vec<String>,
}

impl ViewTargets {
    pub fn new<I, S>(target_type: impl Into<String>, bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_type: target_type.into(),
            bundles: bundles.into_iter().map(Into::into).collect(),
        }
    }
}
