//! Table queries, relation navigation and column projection

use crate::fixtures::{self, assert_unique, declared_aliases};
use lifeguard_translate::expression::{
    Aggregator, BinaryOp, ColumnDeclaration, ColumnExpr, Expr, ScalarType, ValueType,
};
use lifeguard_translate::query::{bind_member, get_table_query, project_columns};
use lifeguard_translate::relation::get_aggregator;
use lifeguard_translate::{SoftDeletePolicy, TranslateContext};
use std::sync::Arc;

// ============================================================================
// Table queries
// ============================================================================

#[test]
fn test_aliases_unique_across_one_compilation() {
    let ctx = fixtures::context();
    let customers = get_table_query(&ctx, &fixtures::customer(), false, false).unwrap();
    let invoices = get_table_query(&ctx, &fixtures::invoice(), false, false).unwrap();

    let mut aliases = declared_aliases(&Expr::Projection(Box::new(customers)));
    aliases.extend(declared_aliases(&Expr::Projection(Box::new(invoices))));
    assert_unique(&aliases);
}

#[test]
fn test_select_column_names_unique() {
    let ctx = fixtures::context();
    let projection = get_table_query(&ctx, &fixtures::customer(), false, false).unwrap();

    let names: Vec<_> = projection.select.columns.iter().map(|c| &c.name).collect();
    assert_unique(&names);
    assert_eq!(names, vec!["Id", "name", "email", "deleted"]);
}

#[test]
fn test_projector_reads_back_every_scalar() {
    let ctx = fixtures::context();
    let customer = fixtures::customer();
    let projection = get_table_query(&ctx, &customer, true, false).unwrap();
    assert!(projection.is_no_tracking);

    for property in customer.loaded_properties().filter(|p| !p.is_relation()) {
        let bound = bind_member(&projection.projector, property);
        let column = bound
            .as_column()
            .unwrap_or_else(|| panic!("{} is not a column", property.name));
        assert_eq!(column.alias, projection.select.alias);

        let declared = projection.select.column(&column.name).unwrap();
        let source = declared.expr.as_column().unwrap();
        assert_eq!(source.name, property.info.field_name);
        assert_eq!(source.property.as_deref(), Some(property.name.as_str()));
    }
}

#[test]
fn test_has_many_navigation() {
    let ctx = fixtures::context();
    let projection = get_table_query(&ctx, &fixtures::customer(), false, false).unwrap();
    let entity = projection.projector.as_entity().unwrap();

    let invoices = entity
        .member_init
        .binding("Invoices")
        .and_then(Expr::as_projection)
        .unwrap();
    assert_eq!(
        invoices.aggregator,
        Some(Aggregator::ToList {
            element: ValueType::entity("Invoice"),
            cast: false,
        })
    );
    assert_eq!(invoices.ty(), ValueType::list_of(ValueType::entity("Invoice")));
    assert!(matches!(
        invoices.select.where_clause.as_deref(),
        Some(Expr::Binary {
            op: BinaryOp::Equal,
            ..
        })
    ));
}

#[test]
fn test_soft_delete_filters_root_only() {
    let registry = fixtures::registry();
    let ctx = TranslateContext::builder(registry.clone(), registry)
        .policy(Arc::new(SoftDeletePolicy))
        .build();
    let projection = get_table_query(&ctx, &fixtures::customer(), false, false).unwrap();

    let Some(Expr::Binary { left, .. }) = projection.select.where_clause.as_deref() else {
        panic!("expected delete-flag filter");
    };
    assert_eq!(left.as_column().map(|c| c.name.as_str()), Some("deleted"));
}

// ============================================================================
// Column projection
// ============================================================================

#[test]
fn test_project_columns_suffixes_clashing_names() {
    let ctx = fixtures::context();
    let a = ctx.next_alias();
    let b = ctx.next_alias();
    let new_alias = ctx.next_alias();
    let id = |alias| {
        Expr::Column(ColumnExpr {
            ty: ValueType::Scalar(ScalarType::Int64),
            alias,
            name: "Id".to_string(),
            property: None,
        })
    };
    let projector = Expr::equal(id(a), id(b));

    let pc = project_columns(&projector, &[], new_alias, &[a, b]);
    let names: Vec<_> = pc.columns.iter().map(|c: &ColumnDeclaration| c.name.as_str()).collect();
    assert_eq!(names, vec!["Id", "Id1"]);
    assert!(!pc
        .projector
        .any(&|e| matches!(e, Expr::Column(c) if c.alias != new_alias)));
}

// ============================================================================
// Aggregators
// ============================================================================

#[test]
fn test_aggregator_precedence() {
    let invoice = ValueType::entity("Invoice");
    let rows = ValueType::sequence_of(invoice.clone());

    assert_eq!(get_aggregator(&rows, &rows), None);
    assert_eq!(
        get_aggregator(&invoice, &rows),
        Some(Aggregator::SingleOrDefault {
            element: invoice.clone()
        })
    );
    assert!(matches!(
        get_aggregator(&ValueType::queryable_of(invoice.clone()), &rows),
        Some(Aggregator::AsQueryable { .. })
    ));
    assert!(matches!(
        get_aggregator(&ValueType::array_of(invoice.clone()), &rows),
        Some(Aggregator::ToArray { .. })
    ));
    assert!(matches!(
        get_aggregator(&ValueType::entity_set_of(invoice.clone()), &rows),
        Some(Aggregator::ToEntitySet { .. })
    ));
    assert!(matches!(
        get_aggregator(&ValueType::collection_of(invoice.clone()), &rows),
        Some(Aggregator::ToList { .. })
    ));
    let custom = ValueType::Custom {
        name: "InvoiceBook".to_string(),
        element: Box::new(invoice),
        from_sequence: true,
    };
    assert_eq!(
        get_aggregator(&custom, &rows),
        Some(Aggregator::Construct { target: custom })
    );
}
