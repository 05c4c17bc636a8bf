//! UPDATE and logical-delete command construction.

use super::modified::{get_bag_properties, get_modified_properties};
use super::primary_key::table_column;
use super::source::MutationSource;
use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::expression::command::dedupe_assignments;
use crate::expression::{
    replace, ColumnAssignment, Expr, LambdaExpr, ScalarType, TableExpr, UpdateCommand,
};
use crate::metadata::EntityMetadata;
use crate::query::{bind_members, get_type_projection};
use crate::value::get_convertable_value;
use sea_query::Value;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::telemetry::tracing_helpers;

fn new_table(ctx: &TranslateContext, metadata: &EntityMetadata) -> TableExpr {
    TableExpr {
        alias: ctx.next_alias(),
        name: metadata.table_name.clone(),
        entity_type: metadata.entity_type.clone(),
    }
}

/// `body` of `lambda` with its parameter replaced by the row projection of
/// `table`, member accesses folded into columns
pub(crate) fn bind_to_row(
    ctx: &TranslateContext,
    table: &TableExpr,
    metadata: &Arc<EntityMetadata>,
    lambda: &LambdaExpr,
) -> Result<Expr> {
    let body = lambda.body.as_ref().clone();
    let Some(parameter) = lambda.parameter() else {
        return Ok(body);
    };
    let row = get_type_projection(ctx, &Expr::Table(table.clone()), metadata)?;
    Ok(bind_members(replace(
        body,
        &Expr::Parameter(parameter.clone()),
        &row,
    )))
}

/// Compile an UPDATE for `source`
///
/// - parameter: the temporary bag's properties, read from the parameter;
///   the predicate body is used as-is
/// - instance: the instance's modified properties as converted constants;
///   the predicate reads the row
/// - calculator: each member-init binding, reading the row; bindings to
///   unknown or non-persistent properties are ignored
///
/// # Errors
///
/// Returns `TranslateError::UnsupportedInstanceKind` for an invalid source
/// and propagates metadata and converter failures.
pub fn get_update_expression(
    ctx: &TranslateContext,
    source: MutationSource,
    predicate: Option<&LambdaExpr>,
    is_async: bool,
) -> Result<UpdateCommand> {
    let metadata = source.metadata(ctx)?;

    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::update_span(&metadata.entity_type).entered();

    let table = new_table(ctx, &metadata);

    let (assignments, where_clause) = match &source {
        MutationSource::Parameter(parameter) => {
            let properties = match ctx.temporary_bag() {
                Some(bag) => get_bag_properties(ctx, &metadata.entity_type, bag)?,
                None => Vec::new(),
            };
            let target = Expr::Parameter(parameter.clone());
            let mut assignments = Vec::with_capacity(properties.len());
            for property in properties {
                assignments.push(ColumnAssignment::new(
                    table_column(ctx, &table, &property)?,
                    Expr::member(target.clone(), property.name.clone(), property.ty.clone()),
                ));
            }
            (assignments, predicate.map(|p| p.body.as_ref().clone()))
        }
        MutationSource::Instance(instance) => {
            let properties =
                get_modified_properties(ctx, &metadata.entity_type, instance.instance())?;
            let mut assignments = Vec::with_capacity(properties.len());
            for property in properties {
                let value = get_convertable_value(ctx.converters(), instance.instance(), &property)?;
                assignments.push(ColumnAssignment::new(
                    table_column(ctx, &table, &property)?,
                    Expr::constant(value, property.ty.clone()),
                ));
            }
            let where_clause = predicate
                .map(|p| bind_to_row(ctx, &table, &metadata, p))
                .transpose()?;
            (assignments, where_clause)
        }
        MutationSource::Calculator(calculator) => {
            let Expr::MemberInit(init) = calculator.body.as_ref() else {
                return Err(TranslateError::UnsupportedInstanceKind(
                    "calculator must build a member-init".to_string(),
                ));
            };
            let rebind = match calculator.parameter() {
                Some(parameter) => Some((
                    Expr::Parameter(parameter.clone()),
                    get_type_projection(ctx, &Expr::Table(table.clone()), &metadata)?,
                )),
                None => None,
            };

            let mut assignments = Vec::with_capacity(init.bindings.len());
            for binding in &init.bindings {
                let property = match metadata.property(&binding.member) {
                    Some(property) if property.info.is_persistent => property,
                    _ => {
                        log::debug!(
                            "calculator binding {}.{} has no column, ignored",
                            metadata.entity_type,
                            binding.member
                        );
                        continue;
                    }
                };
                let value = match &rebind {
                    Some((parameter, row)) => {
                        bind_members(replace(binding.expr.clone(), parameter, row))
                    }
                    None => binding.expr.clone(),
                };
                assignments.push(ColumnAssignment::new(
                    table_column(ctx, &table, property)?,
                    value,
                ));
            }
            let where_clause = predicate
                .map(|p| bind_to_row(ctx, &table, &metadata, p))
                .transpose()?;
            (assignments, where_clause)
        }
    };

    let assignments = dedupe_assignments(assignments);
    log::debug!(
        "update {} from {}: {} assignments, filtered={}",
        metadata.table_name,
        source.kind(),
        assignments.len(),
        where_clause.is_some()
    );

    Ok(UpdateCommand {
        table,
        where_clause,
        assignments,
        is_async,
    })
}

/// Compile an UPDATE that sets the delete flag of the matching rows
///
/// # Errors
///
/// Returns `TranslateError::MissingDeleteFlag` if the entity declares no
/// delete flag.
pub fn get_logical_delete_expression(
    ctx: &TranslateContext,
    metadata: &Arc<EntityMetadata>,
    predicate: Option<&LambdaExpr>,
    is_async: bool,
) -> Result<UpdateCommand> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::update_span(&metadata.entity_type).entered();

    let Some(flag) = metadata.delete_property() else {
        return Err(TranslateError::MissingDeleteFlag {
            entity: metadata.entity_type.clone(),
        });
    };
    let table = new_table(ctx, metadata);
    let assignment = ColumnAssignment::new(
        table_column(ctx, &table, flag)?,
        Expr::constant(Value::Bool(Some(true)), ScalarType::Bool),
    );
    let where_clause = predicate
        .map(|p| bind_to_row(ctx, &table, metadata, p))
        .transpose()?;
    log::debug!(
        "logical delete on {} sets {}",
        metadata.table_name,
        assignment.column.name
    );

    Ok(UpdateCommand {
        table,
        where_clause,
        assignments: vec![assignment],
        is_async,
    })
}
