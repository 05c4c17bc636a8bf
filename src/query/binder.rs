//! Member binding against projectors.

use crate::expression::{Expr, ProjectionExpr};
use crate::metadata::Property;

/// Expression reading `property` from `root`
///
/// An entity or member-init root that binds the property yields the bound
/// expression; anything else yields a member access on the root.
#[must_use]
pub fn bind_member(root: &Expr, property: &Property) -> Expr {
    let bound = match root {
        Expr::Entity(entity) => entity.member_init.binding(&property.name),
        Expr::MemberInit(init) => init.binding(&property.name),
        _ => None,
    };
    match bound {
        Some(expr) => expr.clone(),
        None => Expr::member(root.clone(), property.name.clone(), property.ty.clone()),
    }
}

/// Expression reading `property` inside the projection's own select
///
/// The projector reads columns of the select's alias; a predicate added to
/// the select must read the declared column source instead. `None` when
/// the projector does not bind the property to a column.
#[must_use]
pub fn bind_select_member(projection: &ProjectionExpr, property: &Property) -> Option<Expr> {
    match bind_member(&projection.projector, property) {
        Expr::Column(column) if column.alias == projection.select.alias => projection
            .select
            .column(&column.name)
            .map(|declared| declared.expr.clone()),
        Expr::Column(column) => Some(Expr::Column(column)),
        _ => None,
    }
}

/// Fold member accesses on entity and member-init nodes into the bound
/// expressions, bottom-up
///
/// Used after a lambda parameter has been replaced by a row projection, so
/// `row.CustomerId` reads the projected column directly.
#[must_use]
pub fn bind_members(expr: Expr) -> Expr {
    let expr = expr.map_children(bind_members);
    match expr {
        Expr::Member { target, member, ty } => {
            let bound = match target.as_ref() {
                Expr::Entity(entity) => entity.member_init.binding(&member).cloned(),
                Expr::MemberInit(init) => init.binding(&member).cloned(),
                _ => None,
            };
            bound.unwrap_or(Expr::Member { target, member, ty })
        }
        other => other,
    }
}
