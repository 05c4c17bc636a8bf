//! Query-side translation: entity projections over tables.
//!
//! # Architecture
//!
//! - **Projection**: type projections, member expressions and table queries
//!   (`get_table_query`, `get_type_projection`, `get_member_expression`)
//! - **Column projector**: hoisting projector expressions into a select list
//! - **Binder**: reading a property back out of a projector
//! - **Policy**: the `QueryPolicy` hook every projection passes through
//!
//! Relationship navigation lives in [`crate::relation`]; it is reached from
//! here whenever a loaded property is a relation.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use lifeguard_translate::{EntityMetadata, EntityRegistry, Property, TranslateContext};
//! use lifeguard_translate::expression::ScalarType;
//! use lifeguard_translate::query::get_table_query;
//!
//! # fn main() -> lifeguard_translate::Result<()> {
//! let orders = Arc::new(
//!     EntityMetadata::new("Order", "orders")
//!         .with_property(Property::scalar("Id", ScalarType::Int32).primary_key())
//!         .with_property(Property::scalar("CustomerId", ScalarType::Int32)),
//! );
//! let registry = Arc::new(EntityRegistry::new().with_entity(orders.clone()));
//! let ctx = TranslateContext::builder(registry.clone(), registry).build();
//!
//! // SELECT t1.Id, t1.CustomerId FROM orders AS t0
//! let projection = get_table_query(&ctx, &orders, false, false)?;
//! assert_eq!(projection.select.columns.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod column_projector;
pub mod policy;
pub mod projection;

#[doc(inline)]
pub use binder::{bind_member, bind_members, bind_select_member};
#[doc(inline)]
pub use column_projector::{can_be_column, project_columns, ProjectedColumns};
#[doc(inline)]
pub use policy::{NoPolicy, PolicyBinder, PolicyScope, QueryPolicy, SoftDeletePolicy};
#[doc(inline)]
pub use projection::{get_member_expression, get_table_query, get_type_projection};
