//! Structural rewriting of expression trees.
//!
//! `map_children` rebuilds a node from transformed children; the
//! substitution pass (`replace`) is built on it. Rewrites consume the input
//! tree and never mutate a node in place.

use super::node::{
    ColumnDeclaration, EntityExpr, Expr, LambdaExpr, MemberBinding, MemberInitExpr, ProjectionExpr,
    SelectExpr,
};
use std::convert::Infallible;

impl Expr {
    /// Rebuild this node with `f` applied to each direct child
    pub fn try_map_children<E, F>(self, mut f: F) -> Result<Expr, E>
    where
        F: FnMut(Expr) -> Result<Expr, E>,
    {
        let expr = match self {
            Expr::Table(_)
            | Expr::Column(_)
            | Expr::Subquery(_)
            | Expr::Constant { .. }
            | Expr::Instance(_)
            | Expr::Parameter(_) => self,
            Expr::Select(select) => Expr::Select(Box::new(map_select(*select, &mut f)?)),
            Expr::Projection(projection) => {
                let ProjectionExpr {
                    select,
                    projector,
                    aggregator,
                    is_async,
                    is_no_tracking,
                } = *projection;
                Expr::Projection(Box::new(ProjectionExpr {
                    select: map_select(select, &mut f)?,
                    projector: Box::new(f(*projector)?),
                    aggregator,
                    is_async,
                    is_no_tracking,
                }))
            }
            Expr::Entity(entity) => {
                let EntityExpr {
                    metadata,
                    member_init,
                } = *entity;
                Expr::Entity(Box::new(EntityExpr {
                    metadata,
                    member_init: map_member_init(member_init, &mut f)?,
                }))
            }
            Expr::Scalar(mut scalar) => {
                scalar.select = map_select(scalar.select, &mut f)?;
                Expr::Scalar(scalar)
            }
            Expr::Exists(mut exists) => {
                exists.select = map_select(exists.select, &mut f)?;
                Expr::Exists(exists)
            }
            Expr::Aggregate(mut aggregate) => {
                aggregate.argument = match aggregate.argument {
                    Some(argument) => Some(Box::new(f(*argument)?)),
                    None => None,
                };
                Expr::Aggregate(aggregate)
            }
            Expr::AggregateSubquery(mut aggregate) => {
                aggregate.aggregate_in_group_select =
                    Box::new(f(*aggregate.aggregate_in_group_select)?);
                aggregate.subquery.select = map_select(aggregate.subquery.select, &mut f)?;
                Expr::AggregateSubquery(aggregate)
            }
            Expr::NamedValue(mut named) => {
                named.value = Box::new(f(*named.value)?);
                Expr::NamedValue(named)
            }
            Expr::Generator(mut generator) => {
                generator.key_source = Box::new(f(*generator.key_source)?);
                Expr::Generator(generator)
            }
            Expr::Member { target, member, ty } => Expr::Member {
                target: Box::new(f(*target)?),
                member,
                ty,
            },
            Expr::Binary { op, left, right } => Expr::Binary {
                op,
                left: Box::new(f(*left)?),
                right: Box::new(f(*right)?),
            },
            Expr::Not(operand) => Expr::Not(Box::new(f(*operand)?)),
            Expr::Convert { operand, ty } => Expr::Convert {
                operand: Box::new(f(*operand)?),
                ty,
            },
            Expr::MemberInit(init) => Expr::MemberInit(map_member_init(init, &mut f)?),
            Expr::Lambda(lambda) => Expr::Lambda(Box::new(map_lambda(*lambda, &mut f)?)),
            Expr::Quote(lambda) => Expr::Quote(Box::new(map_lambda(*lambda, &mut f)?)),
        };
        Ok(expr)
    }

    /// Infallible form of [`Expr::try_map_children`]
    #[must_use]
    pub fn map_children<F>(self, mut f: F) -> Expr
    where
        F: FnMut(Expr) -> Expr,
    {
        match self.try_map_children(|child| Ok::<_, Infallible>(f(child))) {
            Ok(expr) => expr,
            Err(never) => match never {},
        }
    }

    /// Whether `pred` holds for this node or any descendant
    pub fn any<F>(&self, pred: &F) -> bool
    where
        F: Fn(&Expr) -> bool,
    {
        if pred(self) {
            return true;
        }
        let mut found = false;
        for_each_child(self, &mut |child| {
            if !found && child.any(pred) {
                found = true;
            }
        });
        found
    }

    /// Visit this node and every descendant, parents first
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&Expr),
    {
        f(self);
        for_each_child(self, &mut |child| child.walk(&mut *f));
    }
}

fn for_each_child<F>(expr: &Expr, f: &mut F)
where
    F: FnMut(&Expr),
{
    fn select_children<F: FnMut(&Expr)>(select: &SelectExpr, f: &mut F) {
        f(&select.from);
        if let Some(where_clause) = &select.where_clause {
            f(where_clause);
        }
        for column in &select.columns {
            f(&column.expr);
        }
    }

    match expr {
        Expr::Table(_)
        | Expr::Column(_)
        | Expr::Subquery(_)
        | Expr::Constant { .. }
        | Expr::Instance(_)
        | Expr::Parameter(_) => {}
        Expr::Select(select) => select_children(select, f),
        Expr::Projection(projection) => {
            select_children(&projection.select, f);
            f(&projection.projector);
        }
        Expr::Entity(entity) => entity.member_init.bindings.iter().for_each(|b| f(&b.expr)),
        Expr::Scalar(scalar) => select_children(&scalar.select, f),
        Expr::Exists(exists) => select_children(&exists.select, f),
        Expr::Aggregate(aggregate) => {
            if let Some(argument) = &aggregate.argument {
                f(argument);
            }
        }
        Expr::AggregateSubquery(aggregate) => {
            f(&aggregate.aggregate_in_group_select);
            select_children(&aggregate.subquery.select, f);
        }
        Expr::NamedValue(named) => f(&named.value),
        Expr::Generator(generator) => f(&generator.key_source),
        Expr::Member { target, .. } => f(target),
        Expr::Binary { left, right, .. } => {
            f(left);
            f(right);
        }
        Expr::Not(operand) | Expr::Convert { operand, .. } => f(operand),
        Expr::MemberInit(init) => init.bindings.iter().for_each(|b| f(&b.expr)),
        Expr::Lambda(lambda) | Expr::Quote(lambda) => f(&lambda.body),
    }
}

fn map_select<E, F>(select: SelectExpr, f: &mut F) -> Result<SelectExpr, E>
where
    F: FnMut(Expr) -> Result<Expr, E>,
{
    let SelectExpr {
        alias,
        columns,
        from,
        where_clause,
    } = select;
    let from = Box::new(f(*from)?);
    let where_clause = match where_clause {
        Some(where_clause) => Some(Box::new(f(*where_clause)?)),
        None => None,
    };
    let columns = columns
        .into_iter()
        .map(|c| {
            Ok(ColumnDeclaration {
                name: c.name,
                expr: f(c.expr)?,
            })
        })
        .collect::<Result<Vec<_>, E>>()?;
    Ok(SelectExpr {
        alias,
        columns,
        from,
        where_clause,
    })
}

fn map_member_init<E, F>(init: MemberInitExpr, f: &mut F) -> Result<MemberInitExpr, E>
where
    F: FnMut(Expr) -> Result<Expr, E>,
{
    let bindings = init
        .bindings
        .into_iter()
        .map(|b| {
            Ok(MemberBinding {
                member: b.member,
                expr: f(b.expr)?,
            })
        })
        .collect::<Result<Vec<_>, E>>()?;
    Ok(MemberInitExpr {
        ty: init.ty,
        bindings,
    })
}

fn map_lambda<E, F>(lambda: LambdaExpr, f: &mut F) -> Result<LambdaExpr, E>
where
    F: FnMut(Expr) -> Result<Expr, E>,
{
    Ok(LambdaExpr {
        parameters: lambda.parameters,
        body: Box::new(f(*lambda.body)?),
    })
}

/// Replace every occurrence of `target` in `expr` with `replacement`
///
/// Occurrences are matched structurally. A nested lambda that redeclares a
/// target parameter shadows it, so its body is left untouched.
#[must_use]
pub fn replace(expr: Expr, target: &Expr, replacement: &Expr) -> Expr {
    if &expr == target {
        return replacement.clone();
    }
    if let (Expr::Lambda(lambda) | Expr::Quote(lambda), Expr::Parameter(parameter)) =
        (&expr, target)
    {
        if lambda.parameters.contains(parameter) {
            return expr;
        }
    }
    expr.map_children(|child| replace(child, target, replacement))
}
