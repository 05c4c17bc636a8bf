//! Entity metadata: types, properties and the registry that serves them.

pub mod entity;
pub mod provider;
pub mod registry;

#[doc(inline)]
pub use entity::{
    EntityMetadata, IdentityGenerateType, Property, PropertyInfo, PropertyKind, RelationProperty,
};
#[doc(inline)]
pub use provider::MetadataProvider;
#[doc(inline)]
pub use registry::EntityRegistry;
