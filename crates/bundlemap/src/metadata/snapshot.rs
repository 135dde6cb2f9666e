//! JSON-backed metadata provider
//!
//! A [`MetadataSnapshot`] is a frozen export of a site's entity types,
//! bundles, field definitions and view targets. It is what the CLI reads and
//! what tests build graphs from.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::debug;

use super::{FieldDef, MetadataProvider, ViewTargets};
use crate::core::GraphError;

/// One bundle of an entity type, with its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleEntry {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDef>,
}

/// One entity type and its bundles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeEntry {
    pub id: String,
    pub label: String,
    /// Whether the type carries configurable fields
    #[serde(default = "default_fieldable")]
    pub fieldable: bool,
    #[serde(default)]
    pub bundles: Vec<BundleEntry>,
}

fn default_fieldable() -> bool {
    true
}

/// The resolved targets of one view display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEntry {
    pub id: String,
    pub display_id: String,
    #[serde(flatten)]
    pub targets: ViewTargets,
}

/// In-memory metadata provider loaded from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    #[serde(default)]
    pub entity_types: Vec<EntityTypeEntry>,
    #[serde(default)]
    pub views: Vec<ViewEntry>,
}

impl MetadataSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a snapshot from JSON text
    pub fn from_json(input: &str) -> Result<Self, GraphError> {
        let snapshot: MetadataSnapshot = serde_json::from_str(input)?;
        snapshot.validate()?;
        debug!(
            entity_types = snapshot.entity_types.len(),
            views = snapshot.views.len(),
            "Loaded metadata snapshot"
        );
        Ok(snapshot)
    }

    /// Read, parse and validate a snapshot file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Serialize the snapshot as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, GraphError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject duplicate ids, which would make lookups order-dependent
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen_types = BTreeSet::new();
        for entity_type in &self.entity_types {
            if entity_type.id.is_empty() {
                return Err(GraphError::snapshot_error("entity type with empty id"));
            }
            if !seen_types.insert(entity_type.id.as_str()) {
                return Err(GraphError::snapshot_error(format!(
                    "duplicate entity type '{}'",
                    entity_type.id
                )));
            }

            let mut seen_bundles = BTreeSet::new();
            for bundle in &entity_type.bundles {
                if !seen_bundles.insert(bundle.id.as_str()) {
                    return Err(GraphError::snapshot_error(format!(
                        "duplicate bundle '{}' on entity type '{}'",
                        bundle.id, entity_type.id
                    )));
                }
            }
        }

        let mut seen_views = BTreeSet::new();
        for view in &self.views {
            if !seen_views.insert((view.id.as_str(), view.display_id.as_str())) {
                return Err(GraphError::snapshot_error(format!(
                    "duplicate view display '{}:{}'",
                    view.id, view.display_id
                )));
            }
        }

        Ok(())
    }

    /// Add a fieldable entity type (replaces the label if it already exists)
    pub fn entity_type(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        let label = label.into();
        match self.entity_types.iter_mut().find(|e| e.id == id) {
            Some(existing) => existing.label = label,
            None => self.entity_types.push(EntityTypeEntry {
                id,
                label,
                fieldable: true,
                bundles: Vec::new(),
            }),
        }
        self
    }

    /// Mark an existing entity type as not fieldable
    pub fn not_fieldable(mut self, id: &str) -> Self {
        if let Some(existing) = self.entity_types.iter_mut().find(|e| e.id == id) {
            existing.fieldable = false;
        }
        self
    }

    /// Add a bundle, creating its entity type with the id as label if needed
    pub fn bundle(
        mut self,
        entity_type: &str,
        id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        if !self.entity_types.iter().any(|e| e.id == entity_type) {
            self = self.entity_type(entity_type, entity_type);
        }
        let id = id.into();
        let label = label.into();
        if let Some(entry) = self.entity_types.iter_mut().find(|e| e.id == entity_type) {
            match entry.bundles.iter_mut().find(|b| b.id == id) {
                Some(existing) => existing.label = label,
                None => entry.bundles.push(BundleEntry {
                    id,
                    label,
                    fields: BTreeMap::new(),
                }),
            }
        }
        self
    }

    /// Attach a field to a bundle, creating the bundle if needed
    pub fn field(
        mut self,
        entity_type: &str,
        bundle: &str,
        field_id: impl Into<String>,
        def: FieldDef,
    ) -> Self {
        if self.find_bundle(entity_type, bundle).is_none() {
            self = self.bundle(entity_type, bundle, bundle);
        }
        if let Some(entry) = self
            .entity_types
            .iter_mut()
            .find(|e| e.id == entity_type)
            .and_then(|e| e.bundles.iter_mut().find(|b| b.id == bundle))
        {
            entry.fields.insert(field_id.into(), def);
        }
        self
    }

    /// Register the resolved targets of a view display
    pub fn view(
        mut self,
        id: impl Into<String>,
        display_id: impl Into<String>,
        targets: ViewTargets,
    ) -> Self {
        self.views.push(ViewEntry {
            id: id.into(),
            display_id: display_id.into(),
            targets,
        });
        self
    }

    fn find_entity_type(&self, id: &str) -> Option<&EntityTypeEntry> {
        self.entity_types.iter().find(|e| e.id == id)
    }

    fn find_bundle(&self, entity_type: &str, bundle: &str) -> Option<&BundleEntry> {
        self.find_entity_type(entity_type)
            .and_then(|e| e.bundles.iter().find(|b| b.id == bundle))
    }
}

impl MetadataProvider for MetadataSnapshot {
    fn fieldable_entity_types(&self) -> BTreeMap<String, String> {
        self.entity_types
            .iter()
            .filter(|e| e.fieldable)
            .map(|e| (e.id.clone(), e.label.clone()))
            .collect()
    }

    fn bundles_of(&self, entity_type: &str) -> BTreeMap<String, String> {
        self.find_entity_type(entity_type)
            .map(|e| {
                e.bundles
                    .iter()
                    .map(|b| (b.id.clone(), b.label.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn field_definitions(&self, entity_type: &str, bundle: &str) -> BTreeMap<String, FieldDef> {
        self.find_bundle(entity_type, bundle)
            .map(|b| b.fields.clone())
            .unwrap_or_default()
    }

    fn resolve_view_targets(&self, view_id: &str, display_id: &str) -> Option<ViewTargets> {
        self.views
            .iter()
            .find(|v| v.id == view_id && v.display_id == display_id)
            .map(|v| v.targets.clone())
    }
}
