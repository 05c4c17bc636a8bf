//! Error type for translation.
//!
//! Every failure is raised synchronously while the command tree is being
//! built; a compilation either yields a complete tree or one of these errors.

use std::fmt;

/// Translation error type
#[derive(Debug, Clone, PartialEq)]
pub enum TranslateError {
    /// The mutation source is not a parameter, an entity instance or a
    /// member-init calculator (or the calculator is not valid for the command)
    UnsupportedInstanceKind(String),
    /// Primary key requested on an entity with no declared key
    MissingPrimaryKey {
        entity: String,
    },
    /// A loaded property could not be bound to a column or relationship
    UnmappableProperty {
        entity: String,
        property: String,
    },
    /// A registered converter rejected the runtime value
    ConverterMismatch {
        logical: String,
        provider: String,
        value: String,
    },
    /// No metadata registered for the entity type
    UnknownEntity(String),
    /// Property name not declared on the entity type
    UnknownProperty {
        entity: String,
        property: String,
    },
    /// Logical delete requested on an entity without a delete flag
    MissingDeleteFlag {
        entity: String,
    },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::UnsupportedInstanceKind(kind) => {
                write!(f, "Unsupported mutation source: {kind}")
            }
            TranslateError::MissingPrimaryKey { entity } => {
                write!(f, "Entity {entity} does not define a primary key")
            }
            TranslateError::UnmappableProperty { entity, property } => {
                write!(
                    f,
                    "Property {entity}.{property} cannot be bound to a column or relationship"
                )
            }
            TranslateError::ConverterMismatch {
                logical,
                provider,
                value,
            } => write!(
                f,
                "Converter for {logical} cannot convert {value} to {provider}"
            ),
            TranslateError::UnknownEntity(entity) => {
                write!(f, "No metadata registered for entity {entity}")
            }
            TranslateError::UnknownProperty { entity, property } => {
                write!(f, "Entity {entity} has no property {property}")
            }
            TranslateError::MissingDeleteFlag { entity } => {
                write!(f, "Entity {entity} does not define a logical delete flag")
            }
        }
    }
}

impl std::error::Error for TranslateError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TranslateError>;
