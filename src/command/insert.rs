//! INSERT command construction.

use super::modified::{get_bag_properties, get_modified_properties};
use super::primary_key::{get_assignments_for_primary_keys, table_column};
use super::source::MutationSource;
use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::expression::command::dedupe_assignments;
use crate::expression::{ColumnAssignment, Expr, InsertCommand, TableExpr};
use crate::value::get_convertable_value;

#[cfg(feature = "tracing")]
use crate::telemetry::tracing_helpers;

/// Compile an INSERT for `source`
///
/// Parameter sources write the properties named in the context's temporary
/// bag as member accesses on the parameter, except keys with a generation
/// strategy. Instance sources write their
/// modified properties as converted constants. Key generator assignments
/// follow the value assignments.
///
/// # Errors
///
/// Returns `TranslateError::UnsupportedInstanceKind` for calculator
/// sources, and propagates metadata and converter failures.
pub fn get_insert_expression(
    ctx: &TranslateContext,
    source: MutationSource,
    is_async: bool,
) -> Result<InsertCommand> {
    let metadata = source.metadata(ctx)?;

    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::insert_span(&metadata.entity_type).entered();

    let table = TableExpr {
        alias: ctx.next_alias(),
        name: metadata.table_name.clone(),
        entity_type: metadata.entity_type.clone(),
    };

    let (mut assignments, key_source) = match &source {
        MutationSource::Parameter(parameter) => {
            let key_source = Expr::Parameter(parameter.clone());
            let properties = match ctx.temporary_bag() {
                Some(bag) => get_bag_properties(ctx, &metadata.entity_type, bag)?,
                None => Vec::new(),
            };
            let mut assignments = Vec::with_capacity(properties.len());
            // generated keys are assigned below
            for property in properties.into_iter().filter(|p| p.is_writable()) {
                assignments.push(ColumnAssignment::new(
                    table_column(ctx, &table, &property)?,
                    Expr::member(key_source.clone(), property.name.clone(), property.ty.clone()),
                ));
            }
            (assignments, key_source)
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
            (assignments, Expr::Instance(instance.clone()))
        }
        MutationSource::Calculator(_) => {
            return Err(TranslateError::UnsupportedInstanceKind(
                "calculator cannot be inserted".to_string(),
            ))
        }
    };

    assignments.extend(get_assignments_for_primary_keys(
        ctx,
        &table,
        &key_source,
        &metadata,
    )?);
    let assignments = dedupe_assignments(assignments);

    let with_auto_increment =
        ctx.syntax().identity_select().is_some() && metadata.has_auto_increment();
    let with_generate_value = assignments
        .iter()
        .any(|a| matches!(a.expression, Expr::Generator(_)));
    log::debug!(
        "insert into {} from {}: {} assignments, auto_increment={with_auto_increment}, generate_value={with_generate_value}",
        metadata.table_name,
        source.kind(),
        assignments.len()
    );

    Ok(InsertCommand {
        table,
        assignments,
        is_async,
        with_auto_increment,
        with_generate_value,
    })
}
