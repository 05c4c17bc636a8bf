//! Query policy hooks.
//!
//! Every projection built from a table or a relationship passes through a
//! [`QueryPolicy`] before it is returned, so an application can add
//! filters (tenancy, soft deletion) in one place.

use crate::error::Result;
use crate::expression::{Expr, ProjectionExpr};
use crate::metadata::{EntityMetadata, Property};

/// What a projection was built for
#[derive(Debug, Clone, Copy)]
pub enum PolicyScope<'a> {
    /// All rows of an entity's table
    Entity(&'a EntityMetadata),
    /// The rows reached through a navigation property
    Relation {
        property: &'a Property,
        related: &'a EntityMetadata,
    },
}

impl<'a> PolicyScope<'a> {
    /// Entity whose rows the projection yields
    #[must_use]
    pub fn entity(&self) -> &'a EntityMetadata {
        match self {
            PolicyScope::Entity(metadata) => metadata,
            PolicyScope::Relation { related, .. } => related,
        }
    }
}

/// Resolves a property of the scoped entity to an expression usable in
/// the projection's where clause
pub type PolicyBinder<'a> = dyn Fn(&Property) -> Option<Expr> + 'a;

/// Hook applied to every table and relation projection
pub trait QueryPolicy: Send + Sync {
    /// Return the projection to use in place of `projection`
    ///
    /// # Errors
    ///
    /// Implementations may reject a projection with any `TranslateError`.
    fn apply_policy(
        &self,
        projection: ProjectionExpr,
        scope: PolicyScope<'_>,
        bind: &PolicyBinder<'_>,
    ) -> Result<ProjectionExpr>;
}

/// Identity policy
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPolicy;

impl QueryPolicy for NoPolicy {
    fn apply_policy(
        &self,
        projection: ProjectionExpr,
        _scope: PolicyScope<'_>,
        _bind: &PolicyBinder<'_>,
    ) -> Result<ProjectionExpr> {
        Ok(projection)
    }
}

/// Hides logically deleted rows
///
/// Table projections of an entity with a delete flag get
/// `flag = false` AND-ed onto their where clause. Relation projections wrap
/// a table projection that is already filtered and pass through.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftDeletePolicy;

impl QueryPolicy for SoftDeletePolicy {
    fn apply_policy(
        &self,
        mut projection: ProjectionExpr,
        scope: PolicyScope<'_>,
        bind: &PolicyBinder<'_>,
    ) -> Result<ProjectionExpr> {
        let PolicyScope::Entity(metadata) = scope else {
            return Ok(projection);
        };
        let Some(flag) = metadata.delete_property() else {
            return Ok(projection);
        };
        let Some(column) = bind(flag) else {
            log::warn!(
                "delete flag {}.{} is not bound by the projection, rows are not filtered",
                metadata.entity_type,
                flag.name
            );
            return Ok(projection);
        };

        let filter = Expr::equal(column, Expr::bool(false));
        let where_clause = match projection.select.where_clause.take() {
            Some(existing) => Expr::and(*existing, filter),
            None => filter,
        };
        projection.select.where_clause = Some(Box::new(where_clause));
        Ok(projection)
    }
}
