//! Modified-property diffing.
//!
//! Candidates for INSERT/UPDATE are the persistent properties that are not
//! keys, plus keys the caller supplies (no generation strategy). Whether a
//! candidate counts as modified depends on the instance:
//!
//! - plain holder: the value is non-empty
//! - tracking proxy: the property was flagged dirty
//!
//! Property lists come from the context's [`MetadataProvider`], so a
//! provider that narrows them narrows what the commands write.
//!
//! [`MetadataProvider`]: crate::metadata::MetadataProvider

use crate::active_model::{EntityInstance, TrackingKind};
use crate::context::TranslateContext;
use crate::error::Result;
use crate::metadata::Property;
use serde::Deserialize;
use std::sync::Arc;

/// Which entities of a batch decide the shared property set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchCheckModifiedKinds {
    /// Only the first entity
    #[default]
    First,
    /// The union over every entity
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOperateOptions {
    pub check_modified_kinds: BatchCheckModifiedKinds,
}

fn is_modified(instance: &dyn EntityInstance, property: &Property) -> bool {
    match instance.tracking_kind() {
        TrackingKind::Plain => !instance.get(&property.name).is_empty(),
        TrackingKind::Proxy => instance.is_modified(&property.name),
    }
}

/// Properties of `instance` an INSERT/UPDATE writes, in declared order
///
/// # Errors
///
/// Returns `TranslateError::UnknownEntity` if `entity_type` is not
/// registered.
pub fn get_modified_properties(
    ctx: &TranslateContext,
    entity_type: &str,
    instance: &dyn EntityInstance,
) -> Result<Vec<Arc<Property>>> {
    Ok(ctx
        .metadata()
        .persistent_properties(entity_type)?
        .into_iter()
        .filter(|p| p.is_writable() && is_modified(instance, p))
        .collect())
}

/// Persistent properties named in a temporary property bag
///
/// # Errors
///
/// Returns `TranslateError::UnknownEntity` if `entity_type` is not
/// registered.
pub fn get_bag_properties(
    ctx: &TranslateContext,
    entity_type: &str,
    bag: &[String],
) -> Result<Vec<Arc<Property>>> {
    Ok(ctx
        .metadata()
        .persistent_properties(entity_type)?
        .into_iter()
        .filter(|p| bag.iter().any(|name| name == &p.name))
        .collect())
}

/// Property names a shared batch command writes
///
/// `options` falls back to the context's configured batch options. With
/// [`BatchCheckModifiedKinds::All`] this is the union of every entity's
/// modified properties, in first-seen order. Otherwise (including when no
/// options are set anywhere) only the first entity is inspected.
///
/// # Errors
///
/// Returns `TranslateError::UnknownEntity` if `entity_type` is not
/// registered.
pub fn get_batch_modified_properties(
    ctx: &TranslateContext,
    entity_type: &str,
    instances: &[Arc<dyn EntityInstance>],
    options: Option<&BatchOperateOptions>,
) -> Result<Vec<String>> {
    let options = options.or(ctx.options().batch.as_ref());
    let check_all = matches!(
        options.map(|o| o.check_modified_kinds),
        Some(BatchCheckModifiedKinds::All)
    );

    let mut names: Vec<String> = Vec::new();
    for instance in instances {
        for property in get_modified_properties(ctx, entity_type, instance.as_ref())? {
            if !names.contains(&property.name) {
                names.push(property.name.clone());
            }
        }
        if !check_all {
            break;
        }
    }
    log::debug!(
        "batch of {} {} writes {:?}",
        instances.len(),
        entity_type,
        names
    );
    Ok(names)
}
