// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only resource catalog consumed by nodes.
//!
//! The host editor owns asset loading; nodes only ever see already-resolved
//! descriptors and must tolerate names that are not present.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque description of a host resource (texture, mesh, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Editor-facing name, used for lookups
    pub name: String,
    /// Data kind of the resource (e.g. `Texture`)
    pub kind: String,
    /// Host-specific locator, never interpreted by the graph
    pub source: String,
}

impl ResourceDescriptor {
    /// Create a new descriptor
    pub fn new(name: impl Into<String>, kind: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            source: source.into(),
        }
    }
}

/// Name-based lookup of host resources
pub trait ResourceCatalog {
    /// Find a resource by name
    fn lookup(&self, name: &str) -> Option<&ResourceDescriptor>;

    /// Names of all resources, in catalog order
    fn names(&self) -> Vec<String>;

    /// Names of the resources of a given kind
    fn names_of_kind(&self, kind: &str) -> Vec<String> {
        self.names()
            .into_iter()
            .filter(|name| self.lookup(name).is_some_and(|r| r.kind == kind))
            .collect()
    }
}

/// Catalog backed by an in-memory map
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryCatalog {
    resources: IndexMap<String, ResourceDescriptor>,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource
    pub fn insert(&mut self, resource: ResourceDescriptor) {
        self.resources.insert(resource.name.clone(), resource);
    }

    /// Builder-style insert
    pub fn with(mut self, resource: ResourceDescriptor) -> Self {
        self.insert(resource);
        self
    }

    /// Remove a resource by name
    pub fn remove(&mut self, name: &str) -> Option<ResourceDescriptor> {
        self.resources.shift_remove(name)
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Parse a catalog from RON text supplied by the host
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn lookup(&self, name: &str) -> Option<&ResourceDescriptor> {
        self.resources.get(name)
    }

    fn names(&self) -> Vec<String> {
        self.resources.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with(ResourceDescriptor::new("brick", "Texture", "textures/brick.png"))
            .with(ResourceDescriptor::new("grass", "Texture", "textures/grass.png"))
            .with(ResourceDescriptor::new("box", "Mesh", "meshes/box.glb"))
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.lookup("brick").map(|r| r.source.as_str()), Some("textures/brick.png"));
        assert!(catalog.lookup("missing").is_none());
    }

    #[test]
    fn test_names_keep_catalog_order() {
        let catalog = catalog();
        assert_eq!(catalog.names(), vec!["brick", "grass", "box"]);
        assert_eq!(catalog.names_of_kind("Texture"), vec!["brick", "grass"]);
    }

    #[test]
    fn test_from_ron() {
        let text = r#"(
            resources: {
                "brick": (name: "brick", kind: "Texture", source: "brick.png"),
            },
        )"#;
        let catalog = InMemoryCatalog::from_ron(text).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.lookup("brick").is_some());
    }
}
