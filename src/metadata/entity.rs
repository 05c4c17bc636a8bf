//! Entity and property metadata.
//!
//! Metadata is registered once at startup and read concurrently by every
//! compilation afterwards, so everything here is plain immutable data behind
//! `Arc`.

use crate::expression::{DbType, ScalarType, ValueType};
use std::sync::Arc;

/// How a primary-key value is produced on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IdentityGenerateType {
    /// The caller supplies the value
    #[default]
    None,
    /// The database assigns the value
    AutoIncrement,
    /// An external generator assigns the value at execution time
    Generator,
}

/// Navigation from one entity type to another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationProperty {
    /// Entity type on the other end of the navigation
    pub relational_type: String,
}

/// What a property binds to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    /// One column of the entity's table
    Scalar,
    /// Read-only computed column backed by a subquery fragment
    Subquery(String),
    /// Navigation to another entity type
    Relation(RelationProperty),
}

/// Mapping and persistence flags of a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Column name in the entity's table
    pub field_name: String,
    /// Provider type; `None` leaves the choice to the provider
    pub data_type: Option<DbType>,
    pub is_primary_key: bool,
    pub generate_type: IdentityGenerateType,
    pub is_nullable: bool,
    /// Stored in the entity's table and written by INSERT/UPDATE
    pub is_persistent: bool,
    /// Bound when the entity is projected
    pub is_loaded: bool,
    /// Flag column used for logical deletion
    pub is_delete_flag: bool,
}

/// One property of an entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    /// Declaring entity type
    pub entity_type: String,
    pub ty: ValueType,
    pub info: PropertyInfo,
    pub kind: PropertyKind,
}

impl Property {
    /// Persistent, loaded scalar property stored in a column of the same name
    #[must_use]
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        let name = name.into();
        Self {
            info: PropertyInfo {
                field_name: name.clone(),
                data_type: None,
                is_primary_key: false,
                generate_type: IdentityGenerateType::None,
                is_nullable: false,
                is_persistent: true,
                is_loaded: true,
                is_delete_flag: false,
            },
            name,
            entity_type: String::new(),
            ty: ValueType::Scalar(ty),
            kind: PropertyKind::Scalar,
        }
    }

    /// Loaded navigation property declared as `ty`
    #[must_use]
    pub fn relation(name: impl Into<String>, relational_type: impl Into<String>, ty: ValueType) -> Self {
        let mut property = Self::scalar(name, ScalarType::Int32);
        property.ty = ty;
        property.info.is_persistent = false;
        property.kind = PropertyKind::Relation(RelationProperty {
            relational_type: relational_type.into(),
        });
        property
    }

    /// Computed read-only column
    #[must_use]
    pub fn subquery(name: impl Into<String>, ty: ScalarType, subquery: impl Into<String>) -> Self {
        let mut property = Self::scalar(name, ty);
        property.info.is_persistent = false;
        property.kind = PropertyKind::Subquery(subquery.into());
        property
    }

    #[must_use]
    pub fn column(mut self, field_name: impl Into<String>) -> Self {
        self.info.field_name = field_name.into();
        self
    }

    #[must_use]
    pub fn db_type(mut self, data_type: DbType) -> Self {
        self.info.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.info.is_primary_key = true;
        self
    }

    #[must_use]
    pub fn generated(mut self, generate_type: IdentityGenerateType) -> Self {
        self.info.generate_type = generate_type;
        self
    }

    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.info.is_nullable = true;
        self
    }

    /// Not projected unless explicitly requested
    #[must_use]
    pub fn lazy(mut self) -> Self {
        self.info.is_loaded = false;
        self
    }

    /// Not stored in the table
    #[must_use]
    pub fn transient(mut self) -> Self {
        self.info.is_persistent = false;
        self
    }

    #[must_use]
    pub fn delete_flag(mut self) -> Self {
        self.info.is_delete_flag = true;
        self
    }

    #[must_use]
    pub fn is_relation(&self) -> bool {
        matches!(self.kind, PropertyKind::Relation(_))
    }

    #[must_use]
    pub fn as_relation(&self) -> Option<&RelationProperty> {
        match &self.kind {
            PropertyKind::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    #[must_use]
    pub fn scalar_type(&self) -> Option<ScalarType> {
        self.ty.as_scalar()
    }

    /// Candidate for INSERT/UPDATE diffing: persistent, and either not a key
    /// or a key the caller supplies
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.info.is_persistent
            && (!self.info.is_primary_key
                || self.info.generate_type == IdentityGenerateType::None)
    }
}

/// Static description of a persistent type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    pub entity_type: String,
    pub table_name: String,
    pub properties: Vec<Arc<Property>>,
}

impl EntityMetadata {
    #[must_use]
    pub fn new(entity_type: impl Into<String>, table_name: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            table_name: table_name.into(),
            properties: Vec::new(),
        }
    }

    /// Append a property, stamping it with this entity as its declaring type
    #[must_use]
    pub fn with_property(mut self, mut property: Property) -> Self {
        property.entity_type = self.entity_type.clone();
        self.properties.push(Arc::new(property));
        self
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Arc<Property>> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn primary_properties(&self) -> impl Iterator<Item = &Arc<Property>> {
        self.properties.iter().filter(|p| p.info.is_primary_key)
    }

    pub fn persistent_properties(&self) -> impl Iterator<Item = &Arc<Property>> {
        self.properties.iter().filter(|p| p.info.is_persistent)
    }

    pub fn loaded_properties(&self) -> impl Iterator<Item = &Arc<Property>> {
        self.properties.iter().filter(|p| p.info.is_loaded)
    }

    #[must_use]
    pub fn delete_property(&self) -> Option<&Arc<Property>> {
        self.properties.iter().find(|p| p.info.is_delete_flag)
    }

    #[must_use]
    pub fn has_auto_increment(&self) -> bool {
        self.primary_properties()
            .any(|p| p.info.generate_type == IdentityGenerateType::AutoIncrement)
    }

    #[must_use]
    pub fn has_generate_value(&self) -> bool {
        self.primary_properties()
            .any(|p| p.info.generate_type == IdentityGenerateType::Generator)
    }
}
