//! DELETE command construction.

use super::update::bind_to_row;
use crate::context::TranslateContext;
use crate::error::Result;
use crate::expression::{DeleteCommand, LambdaExpr, TableExpr};
use crate::metadata::EntityMetadata;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use crate::telemetry::tracing_helpers;

/// Compile a DELETE over the entity's table
///
/// With `replace` the predicate's parameter is rebound to the row of the
/// new table; without it the predicate body is used as given (it already
/// reads columns). No predicate deletes every row.
///
/// # Errors
///
/// Propagates projection failures while rebinding the predicate.
pub fn get_delete_expression(
    ctx: &TranslateContext,
    metadata: &Arc<EntityMetadata>,
    predicate: Option<&LambdaExpr>,
    replace: bool,
    is_async: bool,
) -> Result<DeleteCommand> {
    #[cfg(feature = "tracing")]
    let _span = tracing_helpers::delete_span(&metadata.entity_type).entered();

    let table = TableExpr {
        alias: ctx.next_alias(),
        name: metadata.table_name.clone(),
        entity_type: metadata.entity_type.clone(),
    };
    let where_clause = match predicate {
        Some(predicate) if replace => Some(bind_to_row(ctx, &table, metadata, predicate)?),
        Some(predicate) => Some(predicate.body.as_ref().clone()),
        None => None,
    };
    log::debug!(
        "delete from {} as {}, filtered={}",
        metadata.table_name,
        table.alias,
        where_clause.is_some()
    );

    Ok(DeleteCommand {
        table,
        where_clause,
        is_async,
    })
}
