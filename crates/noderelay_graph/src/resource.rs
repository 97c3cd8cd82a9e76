// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named external resources (materials, objects, images) that sockets and
//! settings can point at.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of an external resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Material data-block
    Material,
    /// Scene object
    Object,
    /// Image data-block
    Image,
    /// Object collection
    Collection,
}

impl ResourceKind {
    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Material => "Material",
            Self::Object => "Object",
            Self::Image => "Image",
            Self::Collection => "Collection",
        }
    }
}

/// Lookup of resources by name, supplied by the host
pub trait ResourceLibrary {
    /// Return the canonical name of the resource if it exists
    fn find(&self, kind: ResourceKind, name: &str) -> Option<String>;
}

/// In-memory resource library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    entries: HashMap<ResourceKind, IndexSet<String>>,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource
    pub fn insert(&mut self, kind: ResourceKind, name: impl Into<String>) {
        self.entries.entry(kind).or_default().insert(name.into());
    }

    /// Builder form of [`Library::insert`]
    pub fn with(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        self.insert(kind, name);
        self
    }

    /// Names of every resource of a kind
    pub fn names(&self, kind: ResourceKind) -> impl Iterator<Item = &str> {
        self.entries
            .get(&kind)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }
}

impl ResourceLibrary for Library {
    fn find(&self, kind: ResourceKind, name: &str) -> Option<String> {
        self.entries.get(&kind)?.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_lookup_is_per_kind() {
        let library = Library::new()
            .with(ResourceKind::Material, "Steel")
            .with(ResourceKind::Object, "Cube");

        assert_eq!(library.find(ResourceKind::Material, "Steel"), Some("Steel".to_string()));
        assert_eq!(library.find(ResourceKind::Object, "Steel"), None);
        assert_eq!(library.names(ResourceKind::Object).collect::<Vec<_>>(), vec!["Cube"]);
        assert_eq!(library.names(ResourceKind::Image).count(), 0);
    }
}
