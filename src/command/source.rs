//! Where a mutation takes its values from.

use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::expression::{Expr, InstanceRef, LambdaExpr, ParameterExpr, ValueType};
use crate::metadata::EntityMetadata;
use std::sync::Arc;

/// Value source of an INSERT or UPDATE
#[derive(Debug, Clone, PartialEq)]
pub enum MutationSource {
    /// Entity passed at execution time; written properties come from the
    /// context's temporary bag
    Parameter(ParameterExpr),
    /// Concrete entity instance, diffed against its modified state
    Instance(InstanceRef),
    /// `|row| Entity { member: f(row), .. }` computing new values from the
    /// current row
    Calculator(LambdaExpr),
}

impl MutationSource {
    /// Classify a raw expression
    ///
    /// Parameters, entity instances and (quoted) lambdas are accepted.
    ///
    /// # Errors
    ///
    /// Returns `TranslateError::UnsupportedInstanceKind` for anything else.
    pub fn from_expr(expr: Expr) -> Result<Self> {
        match expr {
            Expr::Parameter(parameter) => Ok(MutationSource::Parameter(parameter)),
            Expr::Instance(instance) => Ok(MutationSource::Instance(instance)),
            Expr::Lambda(lambda) | Expr::Quote(lambda) => Ok(MutationSource::Calculator(*lambda)),
            other => Err(TranslateError::UnsupportedInstanceKind(
                node_kind(&other).to_string(),
            )),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            MutationSource::Parameter(_) => "parameter",
            MutationSource::Instance(_) => "instance",
            MutationSource::Calculator(_) => "calculator",
        }
    }

    /// Metadata of the entity the source writes
    ///
    /// # Errors
    ///
    /// Returns `TranslateError::UnsupportedInstanceKind` if a parameter is
    /// not entity-typed or a calculator body is not an entity member-init.
    pub(crate) fn metadata(&self, ctx: &TranslateContext) -> Result<Arc<EntityMetadata>> {
        let entity_type = match self {
            MutationSource::Parameter(parameter) => match &parameter.ty {
                ValueType::Entity(name) => name.clone(),
                other => {
                    return Err(TranslateError::UnsupportedInstanceKind(format!(
                        "parameter of type {other}"
                    )))
                }
            },
            MutationSource::Instance(instance) => instance.instance().entity_type().to_string(),
            MutationSource::Calculator(lambda) => match lambda.body.as_ref() {
                Expr::MemberInit(init) => match &init.ty {
                    ValueType::Entity(name) => name.clone(),
                    other => {
                        return Err(TranslateError::UnsupportedInstanceKind(format!(
                            "member-init of type {other}"
                        )))
                    }
                },
                other => {
                    return Err(TranslateError::UnsupportedInstanceKind(format!(
                        "calculator returning {}",
                        node_kind(other)
                    )))
                }
            },
        };
        ctx.metadata().entity_metadata(&entity_type)
    }
}

impl TryFrom<Expr> for MutationSource {
    type Error = TranslateError;

    fn try_from(expr: Expr) -> Result<Self> {
        MutationSource::from_expr(expr)
    }
}

fn node_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Table(_) => "table",
        Expr::Column(_) => "column",
        Expr::Select(_) => "select",
        Expr::Projection(_) => "projection",
        Expr::Entity(_) => "entity",
        Expr::Subquery(_) => "subquery",
        Expr::Scalar(_) => "scalar",
        Expr::Exists(_) => "exists",
        Expr::Aggregate(_) => "aggregate",
        Expr::AggregateSubquery(_) => "aggregate subquery",
        Expr::NamedValue(_) => "named value",
        Expr::Generator(_) => "generator",
        Expr::Constant { .. } => "constant",
        Expr::Instance(_) => "instance",
        Expr::Parameter(_) => "parameter",
        Expr::Member { .. } => "member",
        Expr::Binary { .. } => "binary",
        Expr::Not(_) => "not",
        Expr::Convert { .. } => "convert",
        Expr::MemberInit(_) => "member-init",
        Expr::Lambda(_) => "lambda",
        Expr::Quote(_) => "quote",
    }
}
