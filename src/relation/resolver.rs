//! Relationship resolution.
//!
//! Turns a navigation property into a nested projection correlated with the
//! root it is read from:
//!
//! ```text
//! Projection(
//!   Select(new_alias, columns, from: <related table query>, where: keys match),
//!   projector,
//!   aggregator for the declared property type,
//! )
//! ```

use super::aggregator::get_aggregator;
use super::def::Relationship;
use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::expression::{Expr, ProjectionExpr, SelectExpr, ValueType};
use crate::metadata::Property;
use crate::query::policy::PolicyScope;
use crate::query::projection::projection_binder;
use crate::query::{get_member_expression, get_table_query, project_columns};

#[cfg(feature = "tracing")]
use crate::telemetry::tracing_helpers;

/// Nested projection for the relation `property` read from `root`
///
/// `None` when the related type is already being expanded further up the
/// navigation path, or the context's relation depth is exhausted; the
/// property is then left out of the enclosing projector.
///
/// # Errors
///
/// Returns `TranslateError::UnmappableProperty` when no relationship is
/// registered for the property, and propagates metadata failures for the
/// related entity or key properties.
pub fn get_relation_member_expression(
    ctx: &TranslateContext,
    root: &Expr,
    property: &Property,
) -> Result<Option<Expr>> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::relation_span(&property.entity_type, &property.name).entered();

    let Some(relation) = property.as_relation() else {
        return Err(unmappable(property));
    };
    let Some(ship) = ctx.relationships().relationship(property) else {
        return Err(unmappable(property));
    };
    if ctx.closes_relation_cycle(&property.entity_type, &relation.relational_type) {
        log::debug!(
            "relation {}.{} leads back to {}, skipped",
            property.entity_type,
            property.name,
            relation.relational_type
        );
        return Ok(None);
    }
    let Some(_depth) = ctx.enter_relation(&property.entity_type) else {
        log::warn!(
            "relation {}.{} skipped, max_relation_depth {} reached",
            property.entity_type,
            property.name,
            ctx.options().max_relation_depth
        );
        return Ok(None);
    };

    let related = ctx.metadata().entity_metadata(&relation.relational_type)?;
    let projection = get_table_query(ctx, &related, ctx.options().no_tracking, false)?;

    let (parent, child) = if ship.this_type != property.entity_type {
        (projection.projector.as_ref(), root)
    } else {
        (root, projection.projector.as_ref())
    };
    let where_clause = join_predicate(ctx, &ship, parent, child)?;

    let new_alias = ctx.next_alias();
    let pc = project_columns(&projection.projector, &[], new_alias, &[projection.select.alias]);
    let aggregator = get_aggregator(&property.ty, &ValueType::sequence_of(pc.projector.ty()));
    log::debug!(
        "relation {}.{} -> {} as {new_alias}, aggregator {:?}",
        property.entity_type,
        property.name,
        related.entity_type,
        aggregator
    );

    let is_no_tracking = projection.is_no_tracking;
    let nested = ProjectionExpr::new(
        SelectExpr::new(
            new_alias,
            pc.columns,
            Expr::Select(Box::new(projection.select)),
            where_clause,
        ),
        pc.projector,
        false,
        is_no_tracking,
    )
    .with_aggregator(aggregator);

    let scope = PolicyScope::Relation {
        property,
        related: related.as_ref(),
    };
    let reference = nested.clone();
    let bind = projection_binder(&reference);
    let nested = ctx.policy().apply_policy(nested, scope, &bind)?;
    Ok(Some(Expr::Projection(Box::new(nested))))
}

/// AND over the key pairs of `parent.this_property == child.other_property`
fn join_predicate(
    ctx: &TranslateContext,
    ship: &Relationship,
    parent: &Expr,
    child: &Expr,
) -> Result<Option<Expr>> {
    let mut predicate: Option<Expr> = None;
    for key in &ship.keys {
        let this_property = ctx
            .metadata()
            .require_property(&ship.this_type, &key.this_property)?;
        let other_property = ctx
            .metadata()
            .require_property(&ship.other_type, &key.other_property)?;
        let equal = Expr::equal(
            key_member(ctx, parent, &this_property)?,
            key_member(ctx, child, &other_property)?,
        );
        predicate = Some(match predicate {
            Some(existing) => Expr::and(existing, equal),
            None => equal,
        });
    }
    Ok(predicate)
}

fn key_member(ctx: &TranslateContext, root: &Expr, property: &Property) -> Result<Expr> {
    get_member_expression(ctx, root, property)?.ok_or_else(|| unmappable(property))
}

fn unmappable(property: &Property) -> TranslateError {
    TranslateError::UnmappableProperty {
        entity: property.entity_type.clone(),
        property: property.name.clone(),
    }
}
