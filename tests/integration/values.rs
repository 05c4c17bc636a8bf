//! Value conversion through the public registry

use lifeguard_translate::expression::{DbType, Expr, ScalarType, ValueType};
use lifeguard_translate::value::{get_named_value_expression, BooleanConverter};
use lifeguard_translate::{ConverterRegistry, TranslateError};
use sea_query::Value;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn test_global_registry_is_idempotent() {
    let registry = ConverterRegistry::global();
    let samples = vec![
        (Value::from(Uuid::new_v4()), ScalarType::Guid, DbType::AnsiString),
        (Value::Bool(Some(true)), ScalarType::Bool, DbType::Byte),
        (
            Value::from(serde_json::json!({"tags": ["a", "b"]})),
            ScalarType::Json,
            DbType::String,
        ),
        (
            Value::from(rust_decimal::Decimal::new(-5, 1)),
            ScalarType::Decimal,
            DbType::Double,
        ),
        (
            Value::from(chrono::Utc::now()),
            ScalarType::DateTime,
            DbType::String,
        ),
    ];

    for (value, logical, provider) in samples {
        let once = registry.convert(&value, logical, provider).unwrap();
        let twice = registry.convert(&once, logical, provider).unwrap();
        assert_eq!(once, twice, "{logical} -> {provider}");
    }
}

#[test]
fn test_named_value_for_constant_and_parameter() {
    let registry = ConverterRegistry::new().with_converter(ScalarType::Bool, Arc::new(BooleanConverter));

    let constant = Expr::convert(Expr::bool(true), ValueType::Object);
    let Expr::NamedValue(named) =
        get_named_value_expression(&registry, "p0", constant, DbType::Int32).unwrap()
    else {
        panic!("expected named value");
    };
    assert_eq!(named.name, "p0");
    assert_eq!(named.db_type, Some(DbType::Int32));
    assert_eq!(
        *named.value,
        Expr::convert(
            Expr::constant(Value::Int(Some(1)), ScalarType::Bool),
            ValueType::Object
        )
    );

    let deferred = Expr::parameter("flag", ValueType::Scalar(ScalarType::Bool));
    let Expr::NamedValue(named) =
        get_named_value_expression(&registry, "p1", deferred.clone(), DbType::Int32).unwrap()
    else {
        panic!("expected named value");
    };
    assert_eq!(named.db_type, None);
    assert_eq!(*named.value, deferred);
}

#[test]
fn test_converter_mismatch_surfaces() {
    let registry = ConverterRegistry::global();
    let err = registry
        .convert(&Value::Double(Some(1.5)), ScalarType::Json, DbType::String)
        .unwrap_err();
    assert!(matches!(err, TranslateError::ConverterMismatch { .. }));
}
