//! Mutation command builders.
//!
//! Each builder takes a [`MutationSource`] (or the entity metadata for
//! deletes) and produces an immutable command root over a freshly aliased
//! table:
//!
//! - **Insert**: value assignments followed by key generator assignments
//! - **Update**: assignments from a parameter, an instance diff or a
//!   calculator, plus the logical-delete variant
//! - **Delete**: optional predicate, rebound to the row or taken as given
//! - **Primary key**: key predicates and generation-strategy resolution
//! - **Modified**: which properties an instance or a batch writes
//!
//! Assignments never target the same column twice; the first one wins.

pub mod delete;
pub mod insert;
pub mod modified;
pub mod primary_key;
pub mod source;
pub mod update;

#[doc(inline)]
pub use delete::get_delete_expression;
#[doc(inline)]
pub use insert::get_insert_expression;
#[doc(inline)]
pub use modified::{
    get_bag_properties, get_batch_modified_properties, get_modified_properties,
    BatchCheckModifiedKinds, BatchOperateOptions,
};
#[doc(inline)]
pub use primary_key::{get_primary_key_expression, get_primary_value_expression};
#[doc(inline)]
pub use source::MutationSource;
#[doc(inline)]
pub use update::{get_logical_delete_expression, get_update_expression};
