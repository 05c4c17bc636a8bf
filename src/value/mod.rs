//! Value conversion layer.
//!
//! Property values are carried as `sea_query::Value`. Before a value becomes
//! a literal in a command tree it passes through the [`ConverterRegistry`],
//! which maps it to the representation the provider column expects.
//!
//! - **Converter**: `ValueConverter` trait, registry and built-in converters
//! - **Named value**: literal-vs-parameter node construction and the
//!   empty/default rules for instance values

pub mod converter;
pub mod named_value;

#[doc(inline)]
pub use converter::{
    BooleanConverter, ConverterRegistry, DateTimeConverter, DecimalConverter, GuidConverter,
    JsonConverter, ValueConverter,
};
#[doc(inline)]
pub use named_value::{get_convertable_value, get_named_value_expression};

use crate::expression::ScalarType;
use sea_query::Value;

/// Whether the value is a null variant
#[must_use]
pub fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Bytes(None)
            | Value::Json(None)
            | Value::Uuid(None)
            | Value::Decimal(None)
            | Value::ChronoDateTimeUtc(None)
    )
}

/// Logical scalar type a value variant carries, if it maps to one
#[must_use]
pub fn scalar_type_of(value: &Value) -> Option<ScalarType> {
    let scalar = match value {
        Value::Bool(_) => ScalarType::Bool,
        Value::TinyInt(_) => ScalarType::Int8,
        Value::SmallInt(_) => ScalarType::Int16,
        Value::Int(_) => ScalarType::Int32,
        Value::BigInt(_) => ScalarType::Int64,
        Value::Float(_) => ScalarType::Float32,
        Value::Double(_) => ScalarType::Float64,
        Value::Decimal(_) => ScalarType::Decimal,
        Value::String(_) => ScalarType::String,
        Value::Bytes(_) => ScalarType::Bytes,
        Value::Uuid(_) => ScalarType::Guid,
        Value::ChronoDateTimeUtc(_) => ScalarType::DateTime,
        Value::Json(_) => ScalarType::Json,
        _ => return None,
    };
    Some(scalar)
}
