//! Value converters and their registry.
//!
//! A converter maps an in-memory value of one logical type to the
//! representation a provider column of a given `DbType` stores. Converters
//! are idempotent: feeding a value that is already in provider form returns
//! it unchanged. A value of an unexpected shape is a
//! `TranslateError::ConverterMismatch`.

use crate::error::{Result, TranslateError};
use crate::expression::{DbType, ScalarType};
use once_cell::sync::Lazy;
use rust_decimal::prelude::ToPrimitive;
use sea_query::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps in-memory values to provider values
pub trait ValueConverter: Send + Sync {
    /// Convert `value` to the representation stored in a `db_type` column
    ///
    /// `value` is never a null variant; the registry short-circuits nulls.
    ///
    /// # Errors
    ///
    /// Returns `TranslateError::ConverterMismatch` if the value has a shape
    /// this converter does not understand.
    fn convert_to(&self, value: &Value, db_type: DbType) -> Result<Value>;
}

fn mismatch(logical: ScalarType, provider: DbType, value: &Value) -> TranslateError {
    TranslateError::ConverterMismatch {
        logical: logical.to_string(),
        provider: provider.to_string(),
        value: format!("{value:?}"),
    }
}

/// UUIDs as text or 16 raw bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct GuidConverter;

impl ValueConverter for GuidConverter {
    fn convert_to(&self, value: &Value, db_type: DbType) -> Result<Value> {
        match (value, db_type) {
            (Value::Uuid(Some(uuid)), t) if t.is_textual() => {
                Ok(Value::String(Some(uuid.to_string())))
            }
            (Value::Uuid(Some(uuid)), DbType::Binary) => {
                Ok(Value::Bytes(Some(uuid.as_bytes().to_vec())))
            }
            (Value::Uuid(Some(_)), _)
            | (Value::String(Some(_)), _)
            | (Value::Bytes(Some(_)), _) => Ok(value.clone()),
            _ => Err(mismatch(ScalarType::Guid, db_type, value)),
        }
    }
}

/// Booleans as numeric flags or `"1"`/`"0"` text
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanConverter;

impl ValueConverter for BooleanConverter {
    fn convert_to(&self, value: &Value, db_type: DbType) -> Result<Value> {
        let flag = match value {
            Value::Bool(Some(flag)) => *flag,
            Value::TinyInt(Some(_))
            | Value::SmallInt(Some(_))
            | Value::Int(Some(_))
            | Value::BigInt(Some(_))
            | Value::String(Some(_)) => return Ok(value.clone()),
            _ => return Err(mismatch(ScalarType::Bool, db_type, value)),
        };
        let converted = match db_type {
            DbType::Byte => Value::TinyInt(Some(i8::from(flag))),
            DbType::Int16 => Value::SmallInt(Some(i16::from(flag))),
            DbType::Int32 => Value::Int(Some(i32::from(flag))),
            DbType::Int64 => Value::BigInt(Some(i64::from(flag))),
            t if t.is_textual() => Value::String(Some(if flag { "1" } else { "0" }.to_string())),
            _ => value.clone(),
        };
        Ok(converted)
    }
}

/// JSON documents as serialized text
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConverter;

impl ValueConverter for JsonConverter {
    fn convert_to(&self, value: &Value, db_type: DbType) -> Result<Value> {
        match value {
            Value::Json(Some(json)) if db_type.is_textual() => {
                let text = serde_json::to_string(&**json)
                    .map_err(|_| mismatch(ScalarType::Json, db_type, value))?;
                Ok(Value::String(Some(text)))
            }
            Value::Json(Some(_)) | Value::String(Some(_)) => Ok(value.clone()),
            _ => Err(mismatch(ScalarType::Json, db_type, value)),
        }
    }
}

/// Decimals as text or doubles
#[derive(Debug, Default, Clone, Copy)]
pub struct DecimalConverter;

impl ValueConverter for DecimalConverter {
    fn convert_to(&self, value: &Value, db_type: DbType) -> Result<Value> {
        match (value, db_type) {
            (Value::Decimal(Some(decimal)), t) if t.is_textual() => {
                Ok(Value::String(Some(decimal.to_string())))
            }
            (Value::Decimal(Some(decimal)), DbType::Double) => decimal
                .to_f64()
                .map(|d| Value::Double(Some(d)))
                .ok_or_else(|| mismatch(ScalarType::Decimal, db_type, value)),
            (Value::Decimal(Some(_)), _)
            | (Value::String(Some(_)), _)
            | (Value::Double(Some(_)), _) => Ok(value.clone()),
            _ => Err(mismatch(ScalarType::Decimal, db_type, value)),
        }
    }
}

/// UTC timestamps as RFC 3339 text or Unix seconds
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeConverter;

impl ValueConverter for DateTimeConverter {
    fn convert_to(&self, value: &Value, db_type: DbType) -> Result<Value> {
        match (value, db_type) {
            (Value::ChronoDateTimeUtc(Some(at)), t) if t.is_textual() => {
                Ok(Value::String(Some(at.to_rfc3339())))
            }
            (Value::ChronoDateTimeUtc(Some(at)), DbType::Int64) => {
                Ok(Value::BigInt(Some(at.timestamp())))
            }
            (Value::ChronoDateTimeUtc(Some(_)), _)
            | (Value::String(Some(_)), _)
            | (Value::BigInt(Some(_)), _) => Ok(value.clone()),
            _ => Err(mismatch(ScalarType::DateTime, db_type, value)),
        }
    }
}

static GLOBAL: Lazy<ConverterRegistry> = Lazy::new(ConverterRegistry::with_defaults);

/// Converters keyed by logical type
///
/// Populated at startup and read-only afterwards. Pass one into the
/// translate context; [`ConverterRegistry::global`] is the process-wide
/// default holding the built-in converters.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<ScalarType, Arc<dyn ValueConverter>>,
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.converters.keys().map(ToString::to_string).collect();
        types.sort();
        f.debug_struct("ConverterRegistry")
            .field("converters", &types)
            .finish()
    }
}

impl ConverterRegistry {
    /// Empty registry: every value passes through unconverted
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in converters
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new()
            .with_converter(ScalarType::Guid, Arc::new(GuidConverter))
            .with_converter(ScalarType::Bool, Arc::new(BooleanConverter))
            .with_converter(ScalarType::Json, Arc::new(JsonConverter))
            .with_converter(ScalarType::Decimal, Arc::new(DecimalConverter))
            .with_converter(ScalarType::DateTime, Arc::new(DateTimeConverter))
    }

    /// Process-wide default registry
    #[must_use]
    pub fn global() -> &'static ConverterRegistry {
        &GLOBAL
    }

    /// Register (or replace) the converter for a logical type
    #[must_use]
    pub fn with_converter(mut self, logical: ScalarType, converter: Arc<dyn ValueConverter>) -> Self {
        self.converters.insert(logical, converter);
        self
    }

    #[must_use]
    pub fn converter(&self, logical: ScalarType) -> Option<&Arc<dyn ValueConverter>> {
        self.converters.get(&logical)
    }

    /// Convert `value` of logical type `logical` for a `provider` column
    ///
    /// Null values and types without a converter pass through unchanged.
    ///
    /// # Errors
    ///
    /// Propagates `TranslateError::ConverterMismatch` from the converter.
    pub fn convert(&self, value: &Value, logical: ScalarType, provider: DbType) -> Result<Value> {
        if super::is_null(value) {
            return Ok(value.clone());
        }
        match self.converter(logical) {
            Some(converter) => {
                log::trace!("converting {logical} value for {provider} column");
                converter.convert_to(value, provider)
            }
            None => Ok(value.clone()),
        }
    }
}
