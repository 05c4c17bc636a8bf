//! INSERT / UPDATE / DELETE compilation

use crate::fixtures::{self, assert_unique, declared_aliases};
use lifeguard_translate::command::{
    get_batch_modified_properties, get_delete_expression, get_insert_expression,
    get_logical_delete_expression, get_primary_key_expression, get_update_expression,
};
use lifeguard_translate::expression::{
    BinaryOp, Expr, LambdaExpr, ParameterExpr, ScalarType, ValueType,
};
use lifeguard_translate::{
    BatchCheckModifiedKinds, BatchOperateOptions, EntityInstance, MutationSource, PlainEntity,
    TrackedEntity, TranslateContext, TranslateError, TranslatorConfig,
};
use rust_decimal::Decimal;
use sea_query::Value;
use std::sync::Arc;
use uuid::Uuid;

fn customer_batch() -> Vec<Arc<dyn EntityInstance>> {
    vec![
        Arc::new(PlainEntity::new("Customer").with("Name", Value::String(Some("a".into())))),
        Arc::new(TrackedEntity::new("Customer").with("Email", Value::String(None))),
        Arc::new(PlainEntity::new("Customer").with("Name", Value::String(None))),
    ]
}

fn instance(entity: impl EntityInstance + 'static) -> MutationSource {
    MutationSource::from_expr(Expr::instance(Arc::new(entity))).unwrap()
}

fn customer_named(name: &str) -> LambdaExpr {
    let parameter = ParameterExpr::new("c", ValueType::entity("Customer"));
    LambdaExpr::new(
        vec![parameter.clone()],
        Expr::equal(
            Expr::member(
                Expr::Parameter(parameter),
                "Name",
                ValueType::Scalar(ScalarType::String),
            ),
            Expr::constant(Value::String(Some(name.to_string())), ScalarType::String),
        ),
    )
}

// ============================================================================
// Insert
// ============================================================================

#[test]
fn test_insert_converts_instance_values() {
    let ctx = fixtures::identity_context();
    let id = Uuid::new_v4();
    let invoice = PlainEntity::new("Invoice")
        .with("Id", Value::from(id))
        .with("CustomerId", Value::BigInt(Some(5)))
        .with("Total", Value::from(Decimal::new(1234, 2)));

    let command = get_insert_expression(&ctx, instance(invoice), false).unwrap();
    let values: Vec<_> = command
        .assignments
        .iter()
        .map(|a| (a.column.name.as_str(), a.expression.clone()))
        .collect();
    assert_eq!(
        values,
        vec![
            (
                "Id",
                Expr::constant(Value::String(Some(id.to_string())), ScalarType::Guid)
            ),
            (
                "customer_id",
                Expr::constant(Value::BigInt(Some(5)), ScalarType::Int64)
            ),
            (
                "Total",
                Expr::constant(Value::String(Some("12.34".to_string())), ScalarType::Decimal)
            ),
        ]
    );
    assert!(!command.with_auto_increment);
    assert!(!command.with_generate_value);
}

#[test]
fn test_insert_auto_increment_key() {
    let customer = PlainEntity::new("Customer")
        .with("Name", Value::String(Some("Ada".into())))
        .with("Deleted", Value::Bool(Some(false)));

    let with_identity = get_insert_expression(
        &fixtures::identity_context(),
        instance(customer.clone()),
        false,
    )
    .unwrap();
    assert!(with_identity.with_auto_increment);
    assert!(!with_identity.with_generate_value);
    assert_eq!(
        with_identity.assignments[1].expression,
        Expr::constant(Value::SmallInt(Some(0)), ScalarType::Bool)
    );

    let without_identity =
        get_insert_expression(&fixtures::context(), instance(customer), false).unwrap();
    assert!(!without_identity.with_auto_increment);
    assert!(without_identity.with_generate_value);
    let last = without_identity.assignments.last().unwrap();
    assert_eq!(last.column.name, "Id");
    assert!(matches!(last.expression, Expr::Generator(_)));
}

#[test]
fn test_assignment_columns_unique() {
    let ctx = fixtures::context();
    let customer = TrackedEntity::new("Customer")
        .with("Name", Value::String(Some("a".into())))
        .with("Name", Value::String(Some("b".into())))
        .with("Email", Value::String(Some("a@example.com".into())));

    let command = get_insert_expression(&ctx, instance(customer), false).unwrap();
    let names: Vec<_> = command
        .assignments
        .iter()
        .map(|a| a.column.name.as_str())
        .collect();
    assert_unique(&names);
    assert_eq!(names, vec!["name", "email", "Id"]);
}

// ============================================================================
// Update / delete
// ============================================================================

#[test]
fn test_update_tracked_instance() {
    let ctx = fixtures::context();
    let mut customer = TrackedEntity::loaded(
        "Customer",
        vec![
            ("Id".to_string(), Value::BigInt(Some(1))),
            ("Name".to_string(), Value::String(Some("Ada".into()))),
        ],
    );
    customer.set("Email", Value::String(Some("ada@example.com".into())));

    let predicate = customer_named("Ada");
    let command =
        get_update_expression(&ctx, instance(customer), Some(&predicate), false).unwrap();
    assert_eq!(command.assignments.len(), 1);
    assert_eq!(command.assignments[0].column.name, "email");

    let where_clause = command.where_clause.unwrap();
    assert!(!where_clause.any(&|e| matches!(e, Expr::Parameter(_))));
    let Expr::Binary { left, .. } = where_clause else {
        panic!("expected comparison");
    };
    assert_eq!(left.as_column().map(|c| c.name.as_str()), Some("name"));
}

#[test]
fn test_logical_and_physical_delete() {
    let ctx = fixtures::context();
    let customer = fixtures::customer();
    let predicate = customer_named("Ada");

    let logical =
        get_logical_delete_expression(&ctx, &customer, Some(&predicate), false).unwrap();
    assert_eq!(logical.assignments[0].column.name, "deleted");
    assert_eq!(logical.assignments[0].expression, Expr::bool(true));
    assert!(logical.where_clause.is_some());

    let physical = get_delete_expression(&ctx, &customer, Some(&predicate), true, false).unwrap();
    assert_ne!(physical.table.alias, logical.table.alias);

    let err = get_logical_delete_expression(&ctx, &fixtures::invoice(), None, false).unwrap_err();
    assert_eq!(
        err,
        TranslateError::MissingDeleteFlag {
            entity: "Invoice".into()
        }
    );
}

#[test]
fn test_command_tables_get_fresh_aliases() {
    let ctx = fixtures::context();
    let customer = fixtures::customer();
    let insert = get_insert_expression(
        &ctx,
        instance(PlainEntity::new("Customer").with("Name", Value::String(Some("x".into())))),
        false,
    )
    .unwrap();
    let delete = get_delete_expression(&ctx, &customer, None, false, false).unwrap();
    let key = get_primary_key_expression(
        &ctx,
        &ParameterExpr::new("c", ValueType::entity("Customer")),
    )
    .unwrap();

    let mut aliases = vec![insert.table.alias, delete.table.alias];
    aliases.extend(declared_aliases(&key));
    let Expr::Lambda(lambda) = &key else {
        panic!("expected lambda");
    };
    let Expr::Binary { op, left, .. } = lambda.body.as_ref() else {
        panic!("expected key comparison");
    };
    assert_eq!(*op, BinaryOp::Equal);
    aliases.push(left.as_column().unwrap().alias);
    assert_unique(&aliases);
}

// ============================================================================
// Batches
// ============================================================================

#[test]
fn test_batch_union_versus_first() {
    let ctx = fixtures::context();
    let batch = customer_batch();

    let all = BatchOperateOptions {
        check_modified_kinds: BatchCheckModifiedKinds::All,
    };
    let first = BatchOperateOptions {
        check_modified_kinds: BatchCheckModifiedKinds::First,
    };
    assert_eq!(
        get_batch_modified_properties(&ctx, "Customer", &batch, Some(&all)).unwrap(),
        vec!["Name", "Email"]
    );
    assert_eq!(
        get_batch_modified_properties(&ctx, "Customer", &batch, Some(&first)).unwrap(),
        vec!["Name"]
    );
    assert_eq!(
        get_batch_modified_properties(&ctx, "Customer", &batch, None).unwrap(),
        vec!["Name"]
    );
}

#[test]
fn test_configured_batch_mode_applies_without_explicit_options() {
    let config = TranslatorConfig::from_toml("[translator]\nbatch_check_modified = \"all\"\n")
        .unwrap();
    let registry = fixtures::registry();
    let ctx = TranslateContext::builder(registry.clone(), registry)
        .options(config.translate_options())
        .build();

    assert_eq!(
        get_batch_modified_properties(&ctx, "Customer", &customer_batch(), None).unwrap(),
        vec!["Name", "Email"]
    );
}

#[test]
fn test_insert_from_bag_generates_customer_key() {
    let registry = fixtures::registry();
    let ctx = TranslateContext::builder(registry.clone(), registry)
        .temporary_bag(["Id", "Name"])
        .build();
    let parameter = ParameterExpr::new("c", ValueType::entity("Customer"));
    let command = get_insert_expression(&ctx, MutationSource::Parameter(parameter), false).unwrap();

    let columns: Vec<_> = command
        .assignments
        .iter()
        .map(|a| a.column.name.as_str())
        .collect();
    assert_eq!(columns, vec!["name", "Id"]);
    assert!(matches!(command.assignments[1].expression, Expr::Generator(_)));
    assert!(command.with_generate_value);
}

#[test]
fn test_insert_from_bag_keeps_supplied_invoice_key() {
    let registry = fixtures::registry();
    let ctx = TranslateContext::builder(registry.clone(), registry)
        .temporary_bag(["Id", "CustomerId"])
        .build();
    let parameter = ParameterExpr::new("i", ValueType::entity("Invoice"));
    let command = get_insert_expression(&ctx, MutationSource::Parameter(parameter), false).unwrap();

    assert_eq!(command.assignments.len(), 2);
    assert!(command
        .assignments
        .iter()
        .all(|a| matches!(a.expression, Expr::Member { .. })));
    assert!(!command.with_generate_value);
}
