//! # Lifeguard Translate
//!
//! Translation core for the Lifeguard ORM: compiles entity projections,
//! relationship navigation and mutation requests into relational command
//! trees (`SELECT` / `INSERT` / `UPDATE` / `DELETE`) ready for SQL rendering.
//!
//! The crate performs no I/O. A [`TranslateContext`] bundles the read-only
//! collaborators (entity metadata, relationships, query policy, provider
//! syntax, value converters) for one compilation; the entry points in
//! [`query`] and [`command`] build immutable [`expression`] trees from it.
//!
//! ```no_run
//! use std::sync::Arc;
//! use lifeguard_translate::{EntityRegistry, TranslateContext, query};
//!
//! # fn main() -> lifeguard_translate::Result<()> {
//! let registry = Arc::new(EntityRegistry::new());
//! let ctx = TranslateContext::builder(registry.clone(), registry).build();
//! let orders = ctx.metadata().entity_metadata("Order")?;
//! let projection = query::get_table_query(&ctx, &orders, false, false)?;
//! # let _ = projection;
//! # Ok(())
//! # }
//! ```

pub mod active_model;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod expression;
pub mod metadata;
pub mod query;
pub mod relation;
pub mod telemetry;
pub mod value;

#[cfg(test)]
mod test_helpers;

pub use active_model::{ActiveValue, EntityInstance, PlainEntity, TrackedEntity, TrackingKind};
pub use command::{BatchCheckModifiedKinds, BatchOperateOptions, MutationSource};
pub use config::TranslatorConfig;
pub use context::{ProviderSyntax, SyntaxProvider, TranslateContext, TranslateOptions};
pub use error::{Result, TranslateError};
pub use expression::{Expr, TableAlias};
pub use metadata::{
    EntityMetadata, EntityRegistry, IdentityGenerateType, MetadataProvider, Property, PropertyKind,
};
pub use query::{NoPolicy, QueryPolicy, SoftDeletePolicy};
pub use relation::{Relationship, RelationshipProvider};
pub use value::{ConverterRegistry, ValueConverter};
