//! Column projection.
//!
//! Splits a projector into the select list a row source must produce and a
//! rewritten projector that reads those columns back from a new alias.

use crate::expression::{ColumnDeclaration, ColumnExpr, Expr, TableAlias};
use std::collections::{HashMap, HashSet};

/// Result of [`project_columns`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedColumns {
    /// Projector reading from the new alias
    pub projector: Expr,
    /// Select list, existing columns first
    pub columns: Vec<ColumnDeclaration>,
}

/// Whether a node can be computed in a select list
///
/// Column references, computed subquery columns, scalar and `EXISTS`
/// subqueries, aggregates, and singleton projections of a provider
/// scalar type qualify.
#[must_use]
pub fn can_be_column(expr: &Expr) -> bool {
    match expr {
        Expr::Column(_)
        | Expr::Subquery(_)
        | Expr::Scalar(_)
        | Expr::Exists(_)
        | Expr::Aggregate(_)
        | Expr::AggregateSubquery(_) => true,
        Expr::Projection(projection) => {
            projection.is_singleton() && projection.ty().is_db_type_supported()
        }
        _ => false,
    }
}

/// Hoist every column-eligible node of `projector` into a select list
///
/// Each eligible node becomes a declaration under a unique name and is
/// replaced by a column on `new_alias`. Columns whose alias is not in
/// `existing_aliases` belong to an outer scope and are left alone; a
/// source column is declared once however often it is referenced. Within
/// nested selects only column references are remapped.
///
/// Names come from the source column (suffixed `1`, `2`, ... on clash);
/// other computed nodes are named `c0`, `c1`, ...
#[must_use]
pub fn project_columns(
    projector: &Expr,
    existing_columns: &[ColumnDeclaration],
    new_alias: TableAlias,
    existing_aliases: &[TableAlias],
) -> ProjectedColumns {
    let mut projector_state = ColumnProjector {
        new_alias,
        existing_aliases,
        columns: existing_columns.to_vec(),
        names: existing_columns.iter().map(|c| c.name.clone()).collect(),
        hoisted: HashMap::new(),
        next_computed: 0,
    };
    let projector = projector_state.visit(projector.clone(), false);
    ProjectedColumns {
        projector,
        columns: projector_state.columns,
    }
}

struct ColumnProjector<'a> {
    new_alias: TableAlias,
    existing_aliases: &'a [TableAlias],
    columns: Vec<ColumnDeclaration>,
    names: HashSet<String>,
    /// Source column -> declared name
    hoisted: HashMap<(TableAlias, String), String>,
    next_computed: usize,
}

impl ColumnProjector<'_> {
    fn visit(&mut self, expr: Expr, nested: bool) -> Expr {
        match expr {
            Expr::Column(column) => self.map_column(column),
            Expr::Select(_) | Expr::Projection(_) if !can_be_column(&expr) || nested => {
                expr.map_children(|child| self.visit(child, true))
            }
            expr if !nested && can_be_column(&expr) => self.hoist_computed(expr),
            expr => expr.map_children(|child| self.visit(child, nested)),
        }
    }

    fn map_column(&mut self, column: ColumnExpr) -> Expr {
        if !self.existing_aliases.contains(&column.alias) {
            return Expr::Column(column);
        }
        let key = (column.alias, column.name.clone());
        let name = match self.hoisted.get(&key) {
            Some(name) => name.clone(),
            None => {
                let name = self.unique_name(&column.name);
                self.hoisted.insert(key, name.clone());
                self.columns.push(ColumnDeclaration {
                    name: name.clone(),
                    expr: Expr::Column(column.clone()),
                });
                name
            }
        };
        Expr::Column(ColumnExpr {
            ty: column.ty,
            alias: self.new_alias,
            name,
            property: column.property,
        })
    }

    fn hoist_computed(&mut self, expr: Expr) -> Expr {
        let ty = expr.ty();
        if let Some(existing) = self.columns.iter().find(|c| c.expr == expr) {
            return Expr::Column(ColumnExpr {
                ty,
                alias: self.new_alias,
                name: existing.name.clone(),
                property: None,
            });
        }
        let name = match &expr {
            Expr::Subquery(subquery) => self.unique_name(&subquery.name),
            _ => self.computed_name(),
        };
        self.columns.push(ColumnDeclaration {
            name: name.clone(),
            expr,
        });
        Expr::Column(ColumnExpr {
            ty,
            alias: self.new_alias,
            name,
            property: None,
        })
    }

    fn unique_name(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut suffix = 1;
        while self.names.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.names.insert(name.clone());
        name
    }

    fn computed_name(&mut self) -> String {
        loop {
            let name = format!("c{}", self.next_computed);
            self.next_computed += 1;
            if self.names.insert(name.clone()) {
                return name;
            }
        }
    }
}
