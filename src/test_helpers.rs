//! Shared fixtures for unit tests.
//!
//! Model:
//! - `Customer` (soft-deletable) has many `Order`s and a computed order count
//! - `Order` has an auto-increment key
//! - `OrderLine` has a generated UUID key and belongs to an `Order`
//! - `Category` has many child `Category`s (self relation)

use crate::context::{ProviderSyntax, TranslateContext};
use crate::expression::{DbType, ScalarType, ValueType};
use crate::metadata::{EntityMetadata, EntityRegistry, IdentityGenerateType, Property};
use crate::query::QueryPolicy;
use crate::relation::{RelationType, Relationship, RelationshipKey};
use std::sync::Arc;

pub const IDENTITY_SELECT: &str = "SELECT LASTVAL()";

pub fn order_metadata() -> Arc<EntityMetadata> {
    Arc::new(
        EntityMetadata::new("Order", "orders")
            .with_property(
                Property::scalar("Id", ScalarType::Int32)
                    .primary_key()
                    .generated(IdentityGenerateType::AutoIncrement),
            )
            .with_property(Property::scalar("CustomerId", ScalarType::Int32).column("customer_id"))
            .with_property(Property::scalar("Note", ScalarType::String).nullable())
            .with_property(Property::scalar("Cached", ScalarType::String).transient().lazy()),
    )
}

pub fn customer_metadata() -> Arc<EntityMetadata> {
    Arc::new(
        EntityMetadata::new("Customer", "customers")
            .with_property(Property::scalar("Id", ScalarType::Int32).primary_key())
            .with_property(Property::scalar("Name", ScalarType::String))
            .with_property(
                Property::scalar("IsDeleted", ScalarType::Bool)
                    .column("is_deleted")
                    .db_type(DbType::Int16)
                    .delete_flag(),
            )
            .with_property(Property::subquery(
                "OrderCount",
                ScalarType::Int64,
                "SELECT COUNT(*) FROM orders o WHERE o.customer_id = customers.Id",
            ))
            .with_property(Property::relation(
                "Orders",
                "Order",
                ValueType::list_of(ValueType::entity("Order")),
            )),
    )
}

pub fn order_line_metadata() -> Arc<EntityMetadata> {
    Arc::new(
        EntityMetadata::new("OrderLine", "order_lines")
            .with_property(
                Property::scalar("Id", ScalarType::Guid)
                    .primary_key()
                    .generated(IdentityGenerateType::Generator)
                    .db_type(DbType::String),
            )
            .with_property(Property::scalar("OrderId", ScalarType::Int32))
            .with_property(Property::scalar("Quantity", ScalarType::Int32))
            .with_property(Property::relation("Order", "Order", ValueType::entity("Order"))),
    )
}

pub fn category_metadata() -> Arc<EntityMetadata> {
    Arc::new(
        EntityMetadata::new("Category", "categories")
            .with_property(Property::scalar("Id", ScalarType::Int32).primary_key())
            .with_property(Property::scalar("ParentId", ScalarType::Int32).nullable())
            .with_property(Property::relation(
                "Children",
                "Category",
                ValueType::list_of(ValueType::entity("Category")),
            )),
    )
}

pub fn registry() -> Arc<EntityRegistry> {
    Arc::new(
        EntityRegistry::new()
            .with_entity(order_metadata())
            .with_entity(customer_metadata())
            .with_entity(order_line_metadata())
            .with_entity(category_metadata())
            .with_relationship(
                "Customer",
                "Orders",
                Relationship::new(RelationType::HasMany, "Customer", "Order")
                    .key(RelationshipKey::new("Id", "CustomerId")),
            )
            .with_relationship(
                "OrderLine",
                "Order",
                Relationship::new(RelationType::HasMany, "Order", "OrderLine")
                    .key(RelationshipKey::new("Id", "OrderId")),
            )
            .with_relationship(
                "Category",
                "Children",
                Relationship::new(RelationType::HasMany, "Category", "Category")
                    .key(RelationshipKey::new("Id", "ParentId")),
            ),
    )
}

pub fn context() -> TranslateContext {
    let registry = registry();
    TranslateContext::builder(registry.clone(), registry).build()
}

pub fn context_with_policy(policy: Arc<dyn QueryPolicy>) -> TranslateContext {
    let registry = registry();
    TranslateContext::builder(registry.clone(), registry)
        .policy(policy)
        .build()
}

/// Context for a provider that can read back auto-increment identities
pub fn identity_context() -> TranslateContext {
    let registry = registry();
    TranslateContext::builder(registry.clone(), registry)
        .syntax(Arc::new(
            ProviderSyntax::new().with_identity_select(IDENTITY_SELECT),
        ))
        .build()
}

pub fn context_with_bag(properties: &[&str]) -> TranslateContext {
    let registry = registry();
    TranslateContext::builder(registry.clone(), registry)
        .temporary_bag(properties.iter().copied())
        .build()
}
