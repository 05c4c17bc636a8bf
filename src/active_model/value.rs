//! `ActiveValue` enum for property value state.
//!
//! Wraps a property value read from an entity instance with whether it was
//! ever assigned. Unlike a bare `Option<Value>`, this distinguishes a
//! property explicitly set to null from one that was never touched.

use crate::value::is_null;
use sea_query::Value;

/// Property value with assignment state
///
/// # Example
///
/// ```no_run
/// use lifeguard_translate::ActiveValue;
///
/// let value = ActiveValue::Set(sea_query::Value::Int(Some(42)));
/// assert!(!value.is_empty());
///
/// let unset = ActiveValue::Unset;
/// assert!(unset.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveValue {
    /// Value is set (may still be a null variant)
    Set(Value),
    /// Value is explicitly absent
    NotSet,
    /// Value was never assigned
    Unset,
}

impl ActiveValue {
    /// Convert to `Option<Value>`
    ///
    /// Returns `Some(Value)` if the value is `Set`, `None` otherwise.
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            ActiveValue::Set(v) => Some(v),
            ActiveValue::NotSet | ActiveValue::Unset => None,
        }
    }

    /// Convert from `Option<Value>`
    ///
    /// - `Some(value)` → `ActiveValue::Set(value)`
    /// - `None` → `ActiveValue::NotSet`
    #[must_use]
    pub fn from_value(value: Option<Value>) -> Self {
        match value {
            Some(v) => ActiveValue::Set(v),
            None => ActiveValue::NotSet,
        }
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, ActiveValue::Set(_))
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, ActiveValue::Unset)
    }

    /// Whether the value carries no data: never assigned, absent, or a null variant
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ActiveValue::Set(v) => is_null(v),
            ActiveValue::NotSet | ActiveValue::Unset => true,
        }
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ActiveValue::Set(v) => Some(v),
            ActiveValue::NotSet | ActiveValue::Unset => None,
        }
    }
}

impl From<Value> for ActiveValue {
    fn from(value: Value) -> Self {
        ActiveValue::Set(value)
    }
}

impl From<Option<Value>> for ActiveValue {
    fn from(value: Option<Value>) -> Self {
        ActiveValue::from_value(value)
    }
}

impl From<ActiveValue> for Option<Value> {
    fn from(value: ActiveValue) -> Self {
        value.into_value()
    }
}
