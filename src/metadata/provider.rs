//! Metadata lookup seam.

use super::entity::{EntityMetadata, Property};
use crate::error::{Result, TranslateError};
use std::sync::Arc;

/// Source of entity metadata
///
/// Only `entity_metadata` is required; the property queries derive from it.
/// Implementations must be fully populated before the first compilation.
pub trait MetadataProvider: Send + Sync {
    /// Metadata for the named entity type
    ///
    /// # Errors
    ///
    /// Returns `TranslateError::UnknownEntity` if the type is not registered.
    fn entity_metadata(&self, entity_type: &str) -> Result<Arc<EntityMetadata>>;

    /// Primary-key properties in declared order
    fn primary_properties(&self, entity_type: &str) -> Result<Vec<Arc<Property>>> {
        let metadata = self.entity_metadata(entity_type)?;
        Ok(metadata.primary_properties().cloned().collect())
    }

    /// Properties stored in the entity's table
    fn persistent_properties(&self, entity_type: &str) -> Result<Vec<Arc<Property>>> {
        let metadata = self.entity_metadata(entity_type)?;
        Ok(metadata.persistent_properties().cloned().collect())
    }

    /// Properties bound when the entity is projected
    fn loaded_properties(&self, entity_type: &str) -> Result<Vec<Arc<Property>>> {
        let metadata = self.entity_metadata(entity_type)?;
        Ok(metadata.loaded_properties().cloned().collect())
    }

    /// Property by name, `None` if the entity does not declare it
    fn property(&self, entity_type: &str, name: &str) -> Result<Option<Arc<Property>>> {
        let metadata = self.entity_metadata(entity_type)?;
        Ok(metadata.property(name).cloned())
    }

    /// Property by name, failing if the entity does not declare it
    fn require_property(&self, entity_type: &str, name: &str) -> Result<Arc<Property>> {
        self.property(entity_type, name)?
            .ok_or_else(|| TranslateError::UnknownProperty {
                entity: entity_type.to_string(),
                property: name.to_string(),
            })
    }
}
