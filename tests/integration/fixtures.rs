//! Shop model shared by the integration tests
//!
//! - `Customer` (soft-deletable, auto-increment key) has many `Invoice`s
//! - `Invoice` has a caller-supplied UUID key stored as text and a decimal
//!   total stored as text

use lifeguard_translate::expression::{DbType, ScalarType, TableAlias, ValueType};
use lifeguard_translate::relation::{RelationType, RelationshipKey};
use lifeguard_translate::{
    EntityMetadata, EntityRegistry, Expr, IdentityGenerateType, Property, ProviderSyntax,
    Relationship, TranslateContext,
};
use std::collections::HashSet;
use std::sync::Arc;

pub fn customer() -> Arc<EntityMetadata> {
    Arc::new(
        EntityMetadata::new("Customer", "customers")
            .with_property(
                Property::scalar("Id", ScalarType::Int64)
                    .primary_key()
                    .generated(IdentityGenerateType::AutoIncrement),
            )
            .with_property(Property::scalar("Name", ScalarType::String).column("name"))
            .with_property(Property::scalar("Email", ScalarType::String).column("email"))
            .with_property(
                Property::scalar("Deleted", ScalarType::Bool)
                    .column("deleted")
                    .db_type(DbType::Int16)
                    .delete_flag(),
            )
            .with_property(Property::relation(
                "Invoices",
                "Invoice",
                ValueType::list_of(ValueType::entity("Invoice")),
            )),
    )
}

pub fn invoice() -> Arc<EntityMetadata> {
    Arc::new(
        EntityMetadata::new("Invoice", "invoices")
            .with_property(
                Property::scalar("Id", ScalarType::Guid)
                    .primary_key()
                    .db_type(DbType::String),
            )
            .with_property(Property::scalar("CustomerId", ScalarType::Int64).column("customer_id"))
            .with_property(
                Property::scalar("Total", ScalarType::Decimal)
                    .db_type(DbType::String)
                    .nullable(),
            ),
    )
}

pub fn registry() -> Arc<EntityRegistry> {
    Arc::new(
        EntityRegistry::new()
            .with_entity(customer())
            .with_entity(invoice())
            .with_relationship(
                "Customer",
                "Invoices",
                Relationship::new(RelationType::HasMany, "Customer", "Invoice")
                    .key(RelationshipKey::new("Id", "CustomerId")),
            ),
    )
}

pub fn context() -> TranslateContext {
    let registry = registry();
    TranslateContext::builder(registry.clone(), registry).build()
}

pub fn identity_context() -> TranslateContext {
    let registry = registry();
    TranslateContext::builder(registry.clone(), registry)
        .syntax(Arc::new(
            ProviderSyntax::new().with_identity_select("SELECT LAST_INSERT_ID()"),
        ))
        .build()
}

/// Aliases introduced by tables and selects anywhere in `expr`
pub fn declared_aliases(expr: &Expr) -> Vec<TableAlias> {
    let mut aliases = Vec::new();
    expr.walk(&mut |node| match node {
        Expr::Table(table) => aliases.push(table.alias),
        Expr::Select(select) => aliases.push(select.alias),
        Expr::Projection(projection) => aliases.push(projection.select.alias),
        _ => {}
    });
    aliases
}

pub fn assert_unique<T: std::hash::Hash + Eq + std::fmt::Debug>(items: &[T]) {
    let mut seen = HashSet::new();
    for item in items {
        assert!(seen.insert(item), "{item:?} appears more than once");
    }
}
