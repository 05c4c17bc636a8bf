//! Relation module for entity relationships.
//!
//! Navigation properties are projected as nested, correlated projections:
//! - belongs_to / has_one: a singleton projection (single-or-default)
//! - has_many: a sequence projection reshaped to the declared container
//!
//! # Architecture
//!
//! - **Def**: relationship definitions (`Relationship`, `RelationType`) and
//!   the `RelationshipProvider` lookup seam
//! - **Resolver**: builds the nested projection for a navigation property
//! - **Aggregator**: picks how the nested rows are reshaped

// Relation definitions
pub mod def;
#[doc(inline)]
pub use def::{RelationType, Relationship, RelationshipKey, RelationshipProvider};

pub mod resolver;
#[doc(inline)]
pub use resolver::get_relation_member_expression;

pub mod aggregator;
#[doc(inline)]
pub use aggregator::get_aggregator;
