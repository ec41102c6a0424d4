//! Component registry: the per-build table of named, reusable schemas.
//!
//! Owned by the build session, never a process-wide singleton; titles are
//! unique within a document and insertion overwrites, so re-deriving a type
//! is idempotent. The existence check is what breaks cycles during the
//! walker's descent.

use std::collections::BTreeMap;

use papyra_core::schema::Schema;

#[derive(Debug, Default)]
pub struct ComponentRegistry {
    schemas: BTreeMap<String, Schema>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a schema is already registered under the title.
    #[must_use]
    pub fn contains(&self, title: &str) -> bool {
        self.schemas.contains_key(title)
    }

    /// Register a schema; an existing entry under the same title is
    /// overwritten.
    pub fn insert(&mut self, title: impl Into<String>, schema: Schema) {
        let title = title.into();
        tracing::debug!(title = %title, "registering schema component");
        self.schemas.insert(title, schema);
    }

    #[must_use]
    pub fn get(&self, title: &str) -> Option<&Schema> {
        self.schemas.get(title)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Consume the registry into the document's schema table.
    #[must_use]
    pub fn into_schemas(self) -> BTreeMap<String, Schema> {
        self.schemas
    }
}
