//! Logical and provider type descriptors.
//!
//! `ValueType` describes the in-memory shape of an expression or property:
//! a scalar, an entity, or one of the sequence shapes a navigation property
//! may be declared as. `DbType` is the provider-side column type a value is
//! converted to before it is bound as a parameter.

use rust_decimal::Decimal;
use sea_query::Value;
use std::fmt;
use uuid::Uuid;

/// Scalar (column-storable) logical type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    String,
    Bytes,
    Guid,
    DateTime,
    Json,
}

impl ScalarType {
    /// Null variant of the `sea_query::Value` this type is stored as
    #[must_use]
    pub fn null_value(self) -> Value {
        match self {
            ScalarType::Bool => Value::Bool(None),
            ScalarType::Int8 => Value::TinyInt(None),
            ScalarType::Int16 => Value::SmallInt(None),
            ScalarType::Int32 => Value::Int(None),
            ScalarType::Int64 => Value::BigInt(None),
            ScalarType::Float32 => Value::Float(None),
            ScalarType::Float64 => Value::Double(None),
            ScalarType::Decimal => Value::Decimal(None),
            ScalarType::String => Value::String(None),
            ScalarType::Bytes => Value::Bytes(None),
            ScalarType::Guid => Value::Uuid(None),
            ScalarType::DateTime => Value::ChronoDateTimeUtc(None),
            ScalarType::Json => Value::Json(None),
        }
    }

    /// Whether an unset value of this type is null rather than a zero value
    #[must_use]
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            ScalarType::String | ScalarType::Bytes | ScalarType::Json | ScalarType::DateTime
        )
    }

    /// The value an unset property of this type takes
    ///
    /// Numeric and boolean types default to zero/false, the nil UUID stands in
    /// for an unset `Guid`, everything else is null. Nullable properties
    /// always default to null.
    #[must_use]
    pub fn default_value(self, nullable: bool) -> Value {
        if nullable || self.is_reference() {
            return self.null_value();
        }
        match self {
            ScalarType::Bool => Value::Bool(Some(false)),
            ScalarType::Int8 => Value::TinyInt(Some(0)),
            ScalarType::Int16 => Value::SmallInt(Some(0)),
            ScalarType::Int32 => Value::Int(Some(0)),
            ScalarType::Int64 => Value::BigInt(Some(0)),
            ScalarType::Float32 => Value::Float(Some(0.0)),
            ScalarType::Float64 => Value::Double(Some(0.0)),
            ScalarType::Decimal => Value::from(Decimal::ZERO),
            ScalarType::Guid => Value::from(Uuid::nil()),
            other => other.null_value(),
        }
    }

    /// Provider type used when a property does not declare one
    #[must_use]
    pub fn default_db_type(self) -> DbType {
        match self {
            ScalarType::Bool => DbType::Boolean,
            ScalarType::Int8 => DbType::Byte,
            ScalarType::Int16 => DbType::Int16,
            ScalarType::Int32 => DbType::Int32,
            ScalarType::Int64 => DbType::Int64,
            ScalarType::Float32 => DbType::Single,
            ScalarType::Float64 => DbType::Double,
            ScalarType::Decimal => DbType::Decimal,
            ScalarType::String => DbType::String,
            ScalarType::Bytes => DbType::Binary,
            ScalarType::Guid => DbType::Guid,
            ScalarType::DateTime => DbType::DateTime,
            ScalarType::Json => DbType::String,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Provider-side column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbType {
    AnsiString,
    String,
    Binary,
    Boolean,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Guid,
    Date,
    DateTime,
    Object,
}

impl DbType {
    /// Whether values of this type are sent as text
    #[must_use]
    pub fn is_textual(self) -> bool {
        matches!(self, DbType::AnsiString | DbType::String)
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Shape of an expression or property value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Column-storable scalar
    Scalar(ScalarType),
    /// A single entity of the named type
    Entity(String),
    /// Plain enumerable sequence of elements
    Sequence(Box<ValueType>),
    /// Deferred, composable query over elements
    Queryable(Box<ValueType>),
    /// Array of the given rank
    Array(Box<ValueType>, usize),
    /// Change-tracked entity set
    EntitySet(Box<ValueType>),
    /// Concrete growable list
    List(Box<ValueType>),
    /// Collection interface satisfied by lists, entity sets and 1-D arrays
    Collection(Box<ValueType>),
    /// User container; `from_sequence` marks a constructor taking the raw sequence
    Custom {
        name: String,
        element: Box<ValueType>,
        from_sequence: bool,
    },
    /// Accepts anything
    Object,
}

impl ValueType {
    #[must_use]
    pub fn entity(name: impl Into<String>) -> Self {
        ValueType::Entity(name.into())
    }

    #[must_use]
    pub fn sequence_of(element: ValueType) -> Self {
        ValueType::Sequence(Box::new(element))
    }

    #[must_use]
    pub fn list_of(element: ValueType) -> Self {
        ValueType::List(Box::new(element))
    }

    #[must_use]
    pub fn array_of(element: ValueType) -> Self {
        ValueType::Array(Box::new(element), 1)
    }

    #[must_use]
    pub fn queryable_of(element: ValueType) -> Self {
        ValueType::Queryable(Box::new(element))
    }

    #[must_use]
    pub fn entity_set_of(element: ValueType) -> Self {
        ValueType::EntitySet(Box::new(element))
    }

    #[must_use]
    pub fn collection_of(element: ValueType) -> Self {
        ValueType::Collection(Box::new(element))
    }

    /// Element type of a sequence shape, `None` for scalars and entities
    #[must_use]
    pub fn element_type(&self) -> Option<&ValueType> {
        match self {
            ValueType::Sequence(e)
            | ValueType::Queryable(e)
            | ValueType::Array(e, _)
            | ValueType::EntitySet(e)
            | ValueType::List(e)
            | ValueType::Collection(e) => Some(e),
            ValueType::Custom { element, .. } => Some(element),
            ValueType::Scalar(_) | ValueType::Entity(_) | ValueType::Object => None,
        }
    }

    /// Whether the type can be stored in a single provider column
    #[must_use]
    pub fn is_db_type_supported(&self) -> bool {
        matches!(self, ValueType::Scalar(_))
    }

    #[must_use]
    pub fn as_scalar(&self) -> Option<ScalarType> {
        match self {
            ValueType::Scalar(s) => Some(*s),
            _ => None,
        }
    }

    /// Whether a value of `other` can be stored in a slot of this type
    ///
    /// Plain sequences and queryables are covariant in their element type,
    /// arrays are covariant over entity elements, the collection interface
    /// accepts any invariant list-like shape. Everything else requires an
    /// exact match.
    #[must_use]
    pub fn is_assignable_from(&self, other: &ValueType) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (ValueType::Object, _) => true,
            (ValueType::Sequence(e), other) => other
                .element_type()
                .is_some_and(|oe| e.is_assignable_from(oe)),
            (ValueType::Queryable(e), ValueType::Queryable(oe)) => e.is_assignable_from(oe),
            (ValueType::Collection(e), ValueType::List(oe))
            | (ValueType::Collection(e), ValueType::EntitySet(oe))
            | (ValueType::Collection(e), ValueType::Collection(oe))
            | (ValueType::Collection(e), ValueType::Array(oe, 1)) => e == oe,
            (ValueType::Array(e, rank), ValueType::Array(oe, orank)) => {
                rank == orank && matches!(**oe, ValueType::Entity(_)) && e.is_assignable_from(oe)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Scalar(s) => write!(f, "{s}"),
            ValueType::Entity(name) => write!(f, "{name}"),
            ValueType::Sequence(e) => write!(f, "Sequence<{e}>"),
            ValueType::Queryable(e) => write!(f, "Queryable<{e}>"),
            ValueType::Array(e, 1) => write!(f, "{e}[]"),
            ValueType::Array(e, rank) => {
                write!(f, "{e}[{}]", ",".repeat(rank.saturating_sub(1)))
            }
            ValueType::EntitySet(e) => write!(f, "EntitySet<{e}>"),
            ValueType::List(e) => write!(f, "List<{e}>"),
            ValueType::Collection(e) => write!(f, "Collection<{e}>"),
            ValueType::Custom { name, element, .. } => write!(f, "{name}<{element}>"),
            ValueType::Object => write!(f, "Object"),
        }
    }
}

impl From<ScalarType> for ValueType {
    fn from(value: ScalarType) -> Self {
        ValueType::Scalar(value)
    }
}
