//! Relationship definitions.
//!
//! A `Relationship` links a `this` entity type to an `other` entity type
//! through ordered key pairs. The join predicate built from it equates each
//! `this_property` with the matching `other_property`; composite keys are
//! joined with logical AND.

use crate::metadata::Property;
use std::sync::Arc;

/// Type of relationship between entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// One-to-one relationship
    HasOne,
    /// One-to-many relationship
    HasMany,
    /// Many-to-one relationship (`belongs_to`)
    BelongsTo,
}

impl RelationType {
    /// Relationship type seen from the other end
    #[must_use]
    pub fn rev(self) -> Self {
        match self {
            RelationType::HasOne => RelationType::HasOne,
            RelationType::HasMany => RelationType::BelongsTo,
            RelationType::BelongsTo => RelationType::HasMany,
        }
    }
}

/// One key pair of a relationship
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationshipKey {
    /// Property on `this_type`
    pub this_property: String,
    /// Property on `other_type`
    pub other_property: String,
}

impl RelationshipKey {
    #[must_use]
    pub fn new(this_property: impl Into<String>, other_property: impl Into<String>) -> Self {
        Self {
            this_property: this_property.into(),
            other_property: other_property.into(),
        }
    }
}

/// Defines a relationship between two entity types
///
/// # Example
///
/// ```no_run
/// use lifeguard_translate::relation::{Relationship, RelationshipKey, RelationType};
///
/// // Customer has_many Orders: customers.Id = orders.CustomerId
/// let ship = Relationship::new(RelationType::HasMany, "Customer", "Order")
///     .key(RelationshipKey::new("Id", "CustomerId"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub rel_type: RelationType,
    /// Principal side of the key pairs
    pub this_type: String,
    /// Dependent side of the key pairs
    pub other_type: String,
    pub keys: Vec<RelationshipKey>,
}

impl Relationship {
    #[must_use]
    pub fn new(rel_type: RelationType, this_type: impl Into<String>, other_type: impl Into<String>) -> Self {
        Self {
            rel_type,
            this_type: this_type.into(),
            other_type: other_type.into(),
            keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(mut self, key: RelationshipKey) -> Self {
        self.keys.push(key);
        self
    }

    /// Reverse this relationship (swap this and other)
    #[must_use]
    pub fn rev(self) -> Self {
        Self {
            rel_type: self.rel_type.rev(),
            this_type: self.other_type,
            other_type: self.this_type,
            keys: self
                .keys
                .into_iter()
                .map(|k| RelationshipKey {
                    this_property: k.other_property,
                    other_property: k.this_property,
                })
                .collect(),
        }
    }
}

/// Source of relationships for navigation properties
pub trait RelationshipProvider: Send + Sync {
    /// Relationship behind a navigation property, `None` if it cannot be resolved
    fn relationship(&self, property: &Property) -> Option<Arc<Relationship>>;
}
