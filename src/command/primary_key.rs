//! Primary-key expressions and generation-strategy resolution.

use crate::context::{SyntaxProvider, TranslateContext};
use crate::error::{Result, TranslateError};
use crate::expression::{
    ColumnAssignment, ColumnExpr, Expr, GeneratorExpr, ParameterExpr, TableExpr, ValueType,
};
use crate::metadata::{EntityMetadata, IdentityGenerateType, Property};
use crate::query::get_member_expression;

/// Column of `table` that `property` is stored in
pub(crate) fn table_column(
    ctx: &TranslateContext,
    table: &TableExpr,
    property: &Property,
) -> Result<ColumnExpr> {
    match get_member_expression(ctx, &Expr::Table(table.clone()), property)? {
        Some(Expr::Column(column)) => Ok(column),
        _ => Err(TranslateError::UnmappableProperty {
            entity: property.entity_type.clone(),
            property: property.name.clone(),
        }),
    }
}

/// Value expression for a key the caller does not supply
///
/// A `Generator` when the key is generator-assigned, or auto-increment on a
/// provider that cannot read the identity back. `None` leaves the key to
/// the database.
#[must_use]
pub fn get_primary_value_expression(
    syntax: &dyn SyntaxProvider,
    table: &TableExpr,
    key_source: &Expr,
    property: &Property,
) -> Option<Expr> {
    let generated = match property.info.generate_type {
        IdentityGenerateType::Generator => true,
        IdentityGenerateType::AutoIncrement => syntax.identity_select().is_none(),
        IdentityGenerateType::None => false,
    };
    if !generated {
        return None;
    }
    log::debug!(
        "key {}.{} ({:?}) is produced by a generator",
        property.entity_type,
        property.name,
        property.info.generate_type
    );
    Some(Expr::Generator(Box::new(GeneratorExpr {
        table: table.clone(),
        key_source: Box::new(key_source.clone()),
        property: property.name.clone(),
        ty: property.ty.clone(),
    })))
}

/// Generator assignments for every key of `metadata` that needs one
pub(crate) fn get_assignments_for_primary_keys(
    ctx: &TranslateContext,
    table: &TableExpr,
    key_source: &Expr,
    metadata: &EntityMetadata,
) -> Result<Vec<ColumnAssignment>> {
    let mut assignments = Vec::new();
    for property in ctx.metadata().primary_properties(&metadata.entity_type)? {
        if let Some(value) =
            get_primary_value_expression(ctx.syntax(), table, key_source, &property)
        {
            assignments.push(ColumnAssignment::new(
                table_column(ctx, table, &property)?,
                value,
            ));
        }
    }
    Ok(assignments)
}

/// `|p| t.k1 == p.k1 && t.k2 == p.k2 ...` over a fresh table of the
/// parameter's entity
///
/// # Errors
///
/// Returns `TranslateError::MissingPrimaryKey` if the entity declares no
/// key, `TranslateError::UnsupportedInstanceKind` if the parameter is not
/// entity-typed.
pub fn get_primary_key_expression(ctx: &TranslateContext, parameter: &ParameterExpr) -> Result<Expr> {
    let ValueType::Entity(entity_type) = &parameter.ty else {
        return Err(TranslateError::UnsupportedInstanceKind(format!(
            "parameter of type {}",
            parameter.ty
        )));
    };
    let metadata = ctx.metadata().entity_metadata(entity_type)?;
    let table = TableExpr {
        alias: ctx.next_alias(),
        name: metadata.table_name.clone(),
        entity_type: metadata.entity_type.clone(),
    };

    let mut predicate: Option<Expr> = None;
    for property in ctx.metadata().primary_properties(&metadata.entity_type)? {
        let equal = Expr::equal(
            Expr::Column(table_column(ctx, &table, &property)?),
            Expr::member(
                Expr::Parameter(parameter.clone()),
                property.name.clone(),
                property.ty.clone(),
            ),
        );
        predicate = Some(match predicate {
            Some(existing) => Expr::and(existing, equal),
            None => equal,
        });
    }

    match predicate {
        Some(body) => Ok(Expr::lambda(vec![parameter.clone()], body)),
        None => Err(TranslateError::MissingPrimaryKey {
            entity: metadata.entity_type.clone(),
        }),
    }
}
