//! In-memory metadata and relationship registry.

use super::entity::{EntityMetadata, Property};
use super::provider::MetadataProvider;
use crate::error::{Result, TranslateError};
use crate::relation::{Relationship, RelationshipProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// Entity metadata and relationships registered at startup
///
/// The registry is built with the consuming `with_*` methods and then shared
/// behind an `Arc`; it is never mutated afterwards.
#[derive(Debug, Default, Clone)]
pub struct EntityRegistry {
    entities: HashMap<String, Arc<EntityMetadata>>,
    relationships: HashMap<(String, String), Arc<Relationship>>,
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity(mut self, metadata: impl Into<Arc<EntityMetadata>>) -> Self {
        let metadata = metadata.into();
        log::trace!(
            "registering entity {} (table {}, {} properties)",
            metadata.entity_type,
            metadata.table_name,
            metadata.properties.len()
        );
        self.entities
            .insert(metadata.entity_type.clone(), metadata);
        self
    }

    /// Register the relationship behind `entity_type.property`
    #[must_use]
    pub fn with_relationship(
        mut self,
        entity_type: impl Into<String>,
        property: impl Into<String>,
        relationship: Relationship,
    ) -> Self {
        self.relationships
            .insert((entity_type.into(), property.into()), Arc::new(relationship));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl MetadataProvider for EntityRegistry {
    fn entity_metadata(&self, entity_type: &str) -> Result<Arc<EntityMetadata>> {
        self.entities
            .get(entity_type)
            .cloned()
            .ok_or_else(|| TranslateError::UnknownEntity(entity_type.to_string()))
    }
}

impl RelationshipProvider for EntityRegistry {
    fn relationship(&self, property: &Property) -> Option<Arc<Relationship>> {
        self.relationships
            .get(&(property.entity_type.clone(), property.name.clone()))
            .cloned()
    }
}
