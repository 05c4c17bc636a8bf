//! Entity instance capability.
//!
//! The translator never inspects a concrete entity struct. It reads values
//! and dirty state through [`EntityInstance`], which each representation
//! strategy implements:
//!
//! - [`PlainEntity`]: a plain value holder. "Modified" means "has a
//!   non-empty value".
//! - [`TrackedEntity`]: a change-tracking proxy. "Modified" means "assigned
//!   since the instance was loaded or last reset".

use super::value::ActiveValue;
use sea_query::Value;
use std::collections::BTreeMap;
use std::fmt;

/// How an instance reports modifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingKind {
    /// Plain value holder; non-empty values count as modified
    Plain,
    /// Change-tracking proxy; only explicitly dirtied properties count
    Proxy,
}

/// Property access and dirty tracking for one entity instance
pub trait EntityInstance: Send + Sync {
    /// Entity type name the instance belongs to
    fn entity_type(&self) -> &str;

    fn tracking_kind(&self) -> TrackingKind;

    /// Current value of a property
    fn get(&self, property: &str) -> ActiveValue;

    /// Assign a property
    fn set(&mut self, property: &str, value: Value);

    /// Whether the property was explicitly flagged dirty
    fn is_modified(&self, property: &str) -> bool;

    /// Names of the properties flagged dirty, in assignment order
    fn modified_properties(&self) -> Vec<String>;
}

impl fmt::Debug for dyn EntityInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityInstance")
            .field("entity_type", &self.entity_type())
            .field("tracking_kind", &self.tracking_kind())
            .finish()
    }
}

/// Plain value holder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlainEntity {
    entity_type: String,
    values: BTreeMap<String, Value>,
}

impl PlainEntity {
    #[must_use]
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            values: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: Value) -> Self {
        self.values.insert(property.into(), value);
        self
    }
}

impl EntityInstance for PlainEntity {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn tracking_kind(&self) -> TrackingKind {
        TrackingKind::Plain
    }

    fn get(&self, property: &str) -> ActiveValue {
        match self.values.get(property) {
            Some(value) => ActiveValue::Set(value.clone()),
            None => ActiveValue::Unset,
        }
    }

    fn set(&mut self, property: &str, value: Value) {
        self.values.insert(property.to_string(), value);
    }

    fn is_modified(&self, property: &str) -> bool {
        !self.get(property).is_empty()
    }

    fn modified_properties(&self) -> Vec<String> {
        self.values
            .iter()
            .filter(|(_, v)| !crate::value::is_null(v))
            .map(|(k, _)| k.clone())
            .collect()
    }
}

/// Change-tracking proxy
///
/// Values passed to [`TrackedEntity::loaded`] form the clean baseline;
/// every later `set` flags the property dirty, whatever the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedEntity {
    entity_type: String,
    values: BTreeMap<String, Value>,
    dirty: Vec<String>,
}

impl TrackedEntity {
    #[must_use]
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            values: BTreeMap::new(),
            dirty: Vec::new(),
        }
    }

    /// Instance whose values were read from the store and are not dirty
    #[must_use]
    pub fn loaded(entity_type: impl Into<String>, values: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entity_type: entity_type.into(),
            values: values.into_iter().collect(),
            dirty: Vec::new(),
        }
    }

    /// Builder form of [`EntityInstance::set`]
    #[must_use]
    pub fn with(mut self, property: &str, value: Value) -> Self {
        self.set(property, value);
        self
    }

    /// Forget all dirty flags, keeping the values
    pub fn reset_modified(&mut self) {
        self.dirty.clear();
    }
}

impl EntityInstance for TrackedEntity {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn tracking_kind(&self) -> TrackingKind {
        TrackingKind::Proxy
    }

    fn get(&self, property: &str) -> ActiveValue {
        match self.values.get(property) {
            Some(value) => ActiveValue::Set(value.clone()),
            None => ActiveValue::Unset,
        }
    }

    fn set(&mut self, property: &str, value: Value) {
        self.values.insert(property.to_string(), value);
        if !self.dirty.iter().any(|p| p == property) {
            self.dirty.push(property.to_string());
        }
    }

    fn is_modified(&self, property: &str) -> bool {
        self.dirty.iter().any(|p| p == property)
    }

    fn modified_properties(&self) -> Vec<String> {
        self.dirty.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_entity_modified_means_non_empty() {
        let entity = PlainEntity::new("Order")
            .with("CustomerId", Value::Int(Some(7)))
            .with("Note", Value::String(None));

        assert!(entity.is_modified("CustomerId"));
        assert!(!entity.is_modified("Note"));
        assert!(!entity.is_modified("Id"));
        assert_eq!(entity.modified_properties(), vec!["CustomerId".to_string()]);
    }

    #[test]
    fn test_tracked_entity_modified_means_dirty() {
        let mut entity = TrackedEntity::loaded(
            "Order",
            vec![("CustomerId".to_string(), Value::Int(Some(7)))],
        );
        assert!(!entity.is_modified("CustomerId"));

        entity.set("Note", Value::String(None));
        entity.set("Note", Value::String(Some("x".into())));
        assert!(entity.is_modified("Note"));
        assert_eq!(entity.modified_properties(), vec!["Note".to_string()]);

        entity.reset_modified();
        assert!(entity.modified_properties().is_empty());
        assert_eq!(entity.get("Note"), ActiveValue::Set(Value::String(Some("x".into()))));
    }
}
