//! Type projection and table queries.
//!
//! A type projection is an [`Expr::Entity`] binding each loaded property of
//! an entity to the expression that reads it from some root. Over a table
//! root that means columns, computed subquery columns and nested relation
//! projections.

use super::binder::{bind_member, bind_select_member};
use super::column_projector::project_columns;
use super::policy::PolicyScope;
use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::expression::{
    ColumnExpr, EntityExpr, Expr, MemberBinding, MemberInitExpr, ProjectionExpr, SelectExpr,
    SubqueryColumnExpr, TableExpr, ValueType,
};
use crate::metadata::{EntityMetadata, Property, PropertyKind};
use crate::relation;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::telemetry::tracing_helpers;

/// Projection of every row of an entity's table
///
/// Allocates a table alias and a select alias, projects the entity over the
/// table, hoists its columns into the select and hands the result to the
/// context's query policy.
///
/// # Errors
///
/// Returns `TranslateError::UnmappableProperty` if a loaded property cannot
/// be bound, and propagates metadata and policy failures.
pub fn get_table_query(
    ctx: &TranslateContext,
    metadata: &Arc<EntityMetadata>,
    no_tracking: bool,
    is_async: bool,
) -> Result<ProjectionExpr> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::table_query_span(&metadata.entity_type).entered();

    let table_alias = ctx.next_alias();
    let select_alias = ctx.next_alias();
    let table = TableExpr {
        alias: table_alias,
        name: metadata.table_name.clone(),
        entity_type: metadata.entity_type.clone(),
    };

    let projector = get_type_projection(ctx, &Expr::Table(table.clone()), metadata)?;
    let pc = project_columns(&projector, &[], select_alias, &[table_alias]);
    log::debug!(
        "table query for {} over {} as {table_alias}, {} columns",
        metadata.entity_type,
        metadata.table_name,
        pc.columns.len()
    );

    let projection = ProjectionExpr::new(
        SelectExpr::new(select_alias, pc.columns, Expr::Table(table), None),
        pc.projector,
        is_async,
        no_tracking,
    );
    let bind = |property: &Property| table_column(table_alias, property);
    let scope = PolicyScope::Entity(metadata.as_ref());
    ctx.policy().apply_policy(projection, scope, &bind)
}

fn table_column(alias: crate::expression::TableAlias, property: &Property) -> Option<Expr> {
    if property.is_relation() || !property.info.is_persistent {
        return None;
    }
    Some(Expr::Column(ColumnExpr {
        ty: property.ty.clone(),
        alias,
        name: property.info.field_name.clone(),
        property: Some(property.name.clone()),
    }))
}

/// Entity expression binding every loaded property against `root`
///
/// Relations nested deeper than the context allows are left out.
///
/// # Errors
///
/// Returns `TranslateError::UnmappableProperty` if a loaded property cannot
/// be bound.
pub fn get_type_projection(
    ctx: &TranslateContext,
    root: &Expr,
    metadata: &Arc<EntityMetadata>,
) -> Result<Expr> {
    let mut bindings = Vec::new();
    for property in ctx.metadata().loaded_properties(&metadata.entity_type)? {
        if let Some(expr) = get_member_expression(ctx, root, &property)? {
            bindings.push(MemberBinding {
                member: property.name.clone(),
                expr,
            });
        }
    }
    Ok(Expr::Entity(Box::new(EntityExpr {
        metadata: metadata.clone(),
        member_init: MemberInitExpr::new(ValueType::entity(&metadata.entity_type), bindings),
    })))
}

/// Expression reading `property` from `root`
///
/// `None` means the property was deliberately skipped (relation nesting
/// limit).
///
/// # Errors
///
/// Returns `TranslateError::UnmappableProperty` for a non-persistent scalar
/// over a table root or a relation without a registered relationship.
pub fn get_member_expression(
    ctx: &TranslateContext,
    root: &Expr,
    property: &Property,
) -> Result<Option<Expr>> {
    if property.is_relation() {
        return relation::get_relation_member_expression(ctx, root, property);
    }

    let Expr::Table(table) = root else {
        return Ok(Some(bind_member(root, property)));
    };

    match &property.kind {
        PropertyKind::Subquery(subquery) => Ok(Some(Expr::Subquery(SubqueryColumnExpr {
            ty: property.ty.clone(),
            alias: table.alias,
            name: property.info.field_name.clone(),
            subquery: subquery.clone(),
        }))),
        _ => match table_column(table.alias, property) {
            Some(column) => Ok(Some(column)),
            None => Err(TranslateError::UnmappableProperty {
                entity: property.entity_type.clone(),
                property: property.name.clone(),
            }),
        },
    }
}

/// Binder for policies applied to a finished projection
pub(crate) fn projection_binder(
    projection: &ProjectionExpr,
) -> impl Fn(&Property) -> Option<Expr> + '_ {
    move |property| bind_select_member(projection, property)
}
