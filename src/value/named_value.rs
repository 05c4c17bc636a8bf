//! Literal and parameter construction for command trees.

use super::converter::ConverterRegistry;
use super::scalar_type_of;
use crate::active_model::EntityInstance;
use crate::error::{Result, TranslateError};
use crate::expression::{DbType, Expr, NamedValueExpr, ValueType};
use crate::metadata::Property;
use sea_query::Value;

/// Wrap `value` as a named value for a `db_type` column
///
/// `Convert` wrappers are stripped first. A non-constant value stays
/// deferred: it becomes a `NamedValue` without a provider type and is bound
/// at execution time. A constant whose logical type has a registered
/// converter is converted now and wrapped in a `Convert` to `Object`; any
/// other constant is kept as-is. Constants always carry `db_type`.
///
/// # Errors
///
/// Propagates `TranslateError::ConverterMismatch` from the converter.
pub fn get_named_value_expression(
    registry: &ConverterRegistry,
    name: impl Into<String>,
    value: Expr,
    db_type: DbType,
) -> Result<Expr> {
    let name = name.into();
    let value = strip_convert(value);

    let Expr::Constant { value: constant, ty } = value else {
        return Ok(Expr::NamedValue(NamedValueExpr {
            name,
            value: Box::new(value),
            db_type: None,
        }));
    };

    let logical = ty.as_scalar().or_else(|| scalar_type_of(&constant));
    let value = match logical {
        Some(logical) if registry.converter(logical).is_some() => {
            let converted = registry.convert(&constant, logical, db_type)?;
            Expr::convert(Expr::constant(converted, ty), ValueType::Object)
        }
        _ => Expr::Constant {
            value: constant,
            ty,
        },
    };
    Ok(Expr::NamedValue(NamedValueExpr {
        name,
        value: Box::new(value),
        db_type: Some(db_type),
    }))
}

fn strip_convert(expr: Expr) -> Expr {
    match expr {
        Expr::Convert { operand, .. } => strip_convert(*operand),
        other => other,
    }
}

/// Value of `property` on `instance`, ready to be written
///
/// A non-empty value is converted when the property declares a provider
/// type and a converter is registered for its logical type. An empty value
/// falls back to the type default (null for nullable properties).
///
/// # Errors
///
/// Returns `TranslateError::UnmappableProperty` for a non-scalar property
/// and propagates converter mismatches.
pub fn get_convertable_value(
    registry: &ConverterRegistry,
    instance: &dyn EntityInstance,
    property: &Property,
) -> Result<Value> {
    let Some(logical) = property.scalar_type() else {
        return Err(TranslateError::UnmappableProperty {
            entity: property.entity_type.clone(),
            property: property.name.clone(),
        });
    };

    let current = instance.get(&property.name);
    if current.is_empty() {
        return Ok(logical.default_value(property.info.is_nullable));
    }
    let Some(value) = current.into_value() else {
        return Ok(logical.default_value(property.info.is_nullable));
    };

    match property.info.data_type {
        Some(db_type) if registry.converter(logical).is_some() => {
            registry.convert(&value, logical, db_type)
        }
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::active_model::PlainEntity;
    use crate::expression::ScalarType;
    use uuid::Uuid;

    #[test]
    fn test_non_constant_stays_deferred() {
        let registry = ConverterRegistry::with_defaults();
        let member = Expr::member(
            Expr::parameter("o", ValueType::entity("Order")),
            "Id",
            ValueType::Scalar(ScalarType::Guid),
        );
        let named = get_named_value_expression(
            &registry,
            "p0",
            Expr::convert(member.clone(), ValueType::Object),
            DbType::String,
        )
        .unwrap();

        assert_eq!(
            named,
            Expr::NamedValue(NamedValueExpr {
                name: "p0".into(),
                value: Box::new(member),
                db_type: None,
            })
        );
    }

    #[test]
    fn test_constant_with_converter_is_converted() {
        let registry = ConverterRegistry::with_defaults();
        let id = Uuid::new_v4();
        let named = get_named_value_expression(
            &registry,
            "p0",
            Expr::constant(Value::from(id), ScalarType::Guid),
            DbType::String,
        )
        .unwrap();

        let Expr::NamedValue(named) = named else {
            panic!("expected named value");
        };
        assert_eq!(named.db_type, Some(DbType::String));
        let Expr::Convert { operand, ty } = *named.value else {
            panic!("expected convert wrapper");
        };
        assert_eq!(ty, ValueType::Object);
        assert_eq!(
            *operand,
            Expr::constant(Value::String(Some(id.to_string())), ScalarType::Guid)
        );
    }

    #[test]
    fn test_constant_without_converter_kept() {
        let registry = ConverterRegistry::with_defaults();
        let constant = Expr::constant(Value::Int(Some(3)), ScalarType::Int32);
        let named =
            get_named_value_expression(&registry, "p1", constant.clone(), DbType::Int32).unwrap();
        let Expr::NamedValue(named) = named else {
            panic!("expected named value");
        };
        assert_eq!(*named.value, constant);
        assert_eq!(named.db_type, Some(DbType::Int32));
    }

    #[test]
    fn test_convertable_value_defaults_when_empty() {
        let registry = ConverterRegistry::with_defaults();
        let entity = PlainEntity::new("Order");
        let count = Property::scalar("Count", ScalarType::Int32);
        let note = Property::scalar("Note", ScalarType::Int32).nullable();

        assert_eq!(
            get_convertable_value(&registry, &entity, &count).unwrap(),
            Value::Int(Some(0))
        );
        assert_eq!(
            get_convertable_value(&registry, &entity, &note).unwrap(),
            Value::Int(None)
        );
    }

    #[test]
    fn test_convertable_value_uses_declared_db_type() {
        let registry = ConverterRegistry::with_defaults();
        let entity = PlainEntity::new("Order").with("Shipped", Value::Bool(Some(true)));
        let declared = Property::scalar("Shipped", ScalarType::Bool).db_type(DbType::Int16);
        let undeclared = Property::scalar("Shipped", ScalarType::Bool);

        assert_eq!(
            get_convertable_value(&registry, &entity, &declared).unwrap(),
            Value::SmallInt(Some(1))
        );
        assert_eq!(
            get_convertable_value(&registry, &entity, &undeclared).unwrap(),
            Value::Bool(Some(true))
        );
    }

    #[test]
    fn test_convertable_value_rejects_relation() {
        let registry = ConverterRegistry::with_defaults();
        let entity = PlainEntity::new("Customer");
        let orders = Property::relation(
            "Orders",
            "Order",
            ValueType::list_of(ValueType::entity("Order")),
        );
        assert!(matches!(
            get_convertable_value(&registry, &entity, &orders),
            Err(TranslateError::UnmappableProperty { .. })
        ));
    }
}
