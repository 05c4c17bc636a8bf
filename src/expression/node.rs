//! Expression tree nodes.
//!
//! Nodes are immutable once built. Rewrites (column projection, parameter
//! substitution) consume a tree and return a new one; nothing holds a
//! back-reference to its parent, so subtrees can be cloned into several
//! trees and shared across threads.

use super::aggregator::Aggregator;
use super::alias::TableAlias;
use super::types::{DbType, ScalarType, ValueType};
use crate::active_model::EntityInstance;
use crate::metadata::EntityMetadata;
use sea_query::Value;
use std::fmt;
use std::sync::Arc;

/// Row source bound to a physical table
#[derive(Debug, Clone, PartialEq)]
pub struct TableExpr {
    pub alias: TableAlias,
    pub name: String,
    pub entity_type: String,
}

/// Reference to a column of an aliased row source
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnExpr {
    pub ty: ValueType,
    pub alias: TableAlias,
    pub name: String,
    /// Entity property the column was bound from, if any
    pub property: Option<String>,
}

/// One named entry of a select list
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDeclaration {
    pub name: String,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpr {
    pub alias: TableAlias,
    pub columns: Vec<ColumnDeclaration>,
    pub from: Box<Expr>,
    pub where_clause: Option<Box<Expr>>,
}

impl SelectExpr {
    #[must_use]
    pub fn new(
        alias: TableAlias,
        columns: Vec<ColumnDeclaration>,
        from: Expr,
        where_clause: Option<Expr>,
    ) -> Self {
        Self {
            alias,
            columns,
            from: Box::new(from),
            where_clause: where_clause.map(Box::new),
        }
    }

    /// Look up a declared column by name
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDeclaration> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A select paired with the expression that rebuilds one result per row
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionExpr {
    pub select: SelectExpr,
    pub projector: Box<Expr>,
    pub aggregator: Option<Aggregator>,
    pub is_async: bool,
    pub is_no_tracking: bool,
}

impl ProjectionExpr {
    #[must_use]
    pub fn new(select: SelectExpr, projector: Expr, is_async: bool, is_no_tracking: bool) -> Self {
        Self {
            select,
            projector: Box::new(projector),
            aggregator: None,
            is_async,
            is_no_tracking,
        }
    }

    #[must_use]
    pub fn with_aggregator(mut self, aggregator: Option<Aggregator>) -> Self {
        self.aggregator = aggregator;
        self
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.aggregator.as_ref().is_some_and(Aggregator::is_singleton)
    }

    /// Type of the projected result
    #[must_use]
    pub fn ty(&self) -> ValueType {
        match &self.aggregator {
            Some(aggregator) => aggregator.result_type(),
            None => ValueType::sequence_of(self.projector.ty()),
        }
    }
}

/// One `member = expression` binding of a member-init
#[derive(Debug, Clone, PartialEq)]
pub struct MemberBinding {
    pub member: String,
    pub expr: Expr,
}

/// Construction of an object with the given member bindings
#[derive(Debug, Clone, PartialEq)]
pub struct MemberInitExpr {
    pub ty: ValueType,
    pub bindings: Vec<MemberBinding>,
}

impl MemberInitExpr {
    #[must_use]
    pub fn new(ty: ValueType, bindings: Vec<MemberBinding>) -> Self {
        Self { ty, bindings }
    }

    #[must_use]
    pub fn binding(&self, member: &str) -> Option<&Expr> {
        self.bindings
            .iter()
            .find(|b| b.member == member)
            .map(|b| &b.expr)
    }
}

/// Marks a member-init as one materialized entity
#[derive(Debug, Clone)]
pub struct EntityExpr {
    pub metadata: Arc<EntityMetadata>,
    pub member_init: MemberInitExpr,
}

impl PartialEq for EntityExpr {
    fn eq(&self, other: &Self) -> bool {
        self.metadata.entity_type == other.metadata.entity_type
            && self.member_init == other.member_init
    }
}

/// Computed column backed by a subquery fragment
#[derive(Debug, Clone, PartialEq)]
pub struct SubqueryColumnExpr {
    pub ty: ValueType,
    pub alias: TableAlias,
    pub name: String,
    pub subquery: String,
}

/// Subquery yielding one scalar value
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarExpr {
    pub ty: ValueType,
    pub select: SelectExpr,
}

/// `EXISTS (subquery)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsExpr {
    pub select: SelectExpr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Count,
    Sum,
    Min,
    Max,
    Average,
}

/// Aggregate function call
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateExpr {
    pub ty: ValueType,
    pub kind: AggregateKind,
    pub argument: Option<Box<Expr>>,
    pub distinct: bool,
}

/// Aggregate over a grouping, with the equivalent correlated subquery
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSubqueryExpr {
    pub group_by_alias: TableAlias,
    pub aggregate_in_group_select: Box<Expr>,
    pub subquery: ScalarExpr,
}

/// Deferred parameter or literal
#[derive(Debug, Clone, PartialEq)]
pub struct NamedValueExpr {
    pub name: String,
    pub value: Box<Expr>,
    pub db_type: Option<DbType>,
}

/// Primary-key value produced by an external generator at execution time
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorExpr {
    pub table: TableExpr,
    /// The parameter or instance the key is generated for
    pub key_source: Box<Expr>,
    pub property: String,
    pub ty: ValueType,
}

/// Lambda formal parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterExpr {
    pub name: String,
    pub ty: ValueType,
}

impl ParameterExpr {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaExpr {
    pub parameters: Vec<ParameterExpr>,
    pub body: Box<Expr>,
}

impl LambdaExpr {
    #[must_use]
    pub fn new(parameters: Vec<ParameterExpr>, body: Expr) -> Self {
        Self {
            parameters,
            body: Box::new(body),
        }
    }

    #[must_use]
    pub fn parameter(&self) -> Option<&ParameterExpr> {
        self.parameters.first()
    }
}

/// Entity instance embedded as a constant
///
/// Equality is identity: two refs are equal only if they point at the same
/// instance.
#[derive(Clone)]
pub struct InstanceRef(pub Arc<dyn EntityInstance>);

impl InstanceRef {
    #[must_use]
    pub fn instance(&self) -> &dyn EntityInstance {
        self.0.as_ref()
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InstanceRef")
            .field(&self.0.entity_type())
            .finish()
    }
}

impl PartialEq for InstanceRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// Whether the operator yields a boolean regardless of operand types
    #[must_use]
    pub fn is_predicate(self) -> bool {
        !matches!(
            self,
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide
        )
    }
}

/// Expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Table(TableExpr),
    Column(ColumnExpr),
    Select(Box<SelectExpr>),
    Projection(Box<ProjectionExpr>),
    Entity(Box<EntityExpr>),
    Subquery(SubqueryColumnExpr),
    Scalar(Box<ScalarExpr>),
    Exists(Box<ExistsExpr>),
    Aggregate(AggregateExpr),
    AggregateSubquery(Box<AggregateSubqueryExpr>),
    NamedValue(NamedValueExpr),
    Generator(Box<GeneratorExpr>),
    Constant {
        value: Value,
        ty: ValueType,
    },
    Instance(InstanceRef),
    Parameter(ParameterExpr),
    Member {
        target: Box<Expr>,
        member: String,
        ty: ValueType,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    Convert {
        operand: Box<Expr>,
        ty: ValueType,
    },
    MemberInit(MemberInitExpr),
    Lambda(Box<LambdaExpr>),
    Quote(Box<LambdaExpr>),
}

impl Expr {
    #[must_use]
    pub fn constant(value: Value, ty: impl Into<ValueType>) -> Self {
        Expr::Constant {
            value,
            ty: ty.into(),
        }
    }

    #[must_use]
    pub fn bool(value: bool) -> Self {
        Expr::constant(Value::Bool(Some(value)), ScalarType::Bool)
    }

    #[must_use]
    pub fn parameter(name: impl Into<String>, ty: ValueType) -> Self {
        Expr::Parameter(ParameterExpr::new(name, ty))
    }

    #[must_use]
    pub fn member(target: Expr, member: impl Into<String>, ty: ValueType) -> Self {
        Expr::Member {
            target: Box::new(target),
            member: member.into(),
            ty,
        }
    }

    #[must_use]
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[must_use]
    pub fn equal(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::Equal, left, right)
    }

    #[must_use]
    pub fn and(left: Expr, right: Expr) -> Self {
        Expr::binary(BinaryOp::And, left, right)
    }

    #[must_use]
    pub fn convert(operand: Expr, ty: ValueType) -> Self {
        Expr::Convert {
            operand: Box::new(operand),
            ty,
        }
    }

    #[must_use]
    pub fn lambda(parameters: Vec<ParameterExpr>, body: Expr) -> Self {
        Expr::Lambda(Box::new(LambdaExpr::new(parameters, body)))
    }

    #[must_use]
    pub fn instance(instance: Arc<dyn EntityInstance>) -> Self {
        Expr::Instance(InstanceRef(instance))
    }

    /// Type of the value the node evaluates to
    #[must_use]
    pub fn ty(&self) -> ValueType {
        match self {
            Expr::Table(table) => ValueType::sequence_of(ValueType::entity(&table.entity_type)),
            Expr::Column(column) => column.ty.clone(),
            Expr::Select(_) => ValueType::Object,
            Expr::Projection(projection) => projection.ty(),
            Expr::Entity(entity) => ValueType::entity(&entity.metadata.entity_type),
            Expr::Subquery(subquery) => subquery.ty.clone(),
            Expr::Scalar(scalar) => scalar.ty.clone(),
            Expr::Exists(_) => ValueType::Scalar(ScalarType::Bool),
            Expr::Aggregate(aggregate) => aggregate.ty.clone(),
            Expr::AggregateSubquery(aggregate) => aggregate.subquery.ty.clone(),
            Expr::NamedValue(named) => named.value.ty(),
            Expr::Generator(generator) => generator.ty.clone(),
            Expr::Constant { ty, .. } => ty.clone(),
            Expr::Instance(instance) => ValueType::entity(instance.0.entity_type()),
            Expr::Parameter(parameter) => parameter.ty.clone(),
            Expr::Member { ty, .. } => ty.clone(),
            Expr::Binary { op, left, .. } => {
                if op.is_predicate() {
                    ValueType::Scalar(ScalarType::Bool)
                } else {
                    left.ty()
                }
            }
            Expr::Not(_) => ValueType::Scalar(ScalarType::Bool),
            Expr::Convert { ty, .. } => ty.clone(),
            Expr::MemberInit(init) => init.ty.clone(),
            Expr::Lambda(_) | Expr::Quote(_) => ValueType::Object,
        }
    }

    #[must_use]
    pub fn as_column(&self) -> Option<&ColumnExpr> {
        match self {
            Expr::Column(column) => Some(column),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_projection(&self) -> Option<&ProjectionExpr> {
        match self {
            Expr::Projection(projection) => Some(projection),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<&EntityExpr> {
        match self {
            Expr::Entity(entity) => Some(entity),
            _ => None,
        }
    }
}

impl From<ColumnExpr> for Expr {
    fn from(value: ColumnExpr) -> Self {
        Expr::Column(value)
    }
}

impl From<TableExpr> for Expr {
    fn from(value: TableExpr) -> Self {
        Expr::Table(value)
    }
}

impl From<ProjectionExpr> for Expr {
    fn from(value: ProjectionExpr) -> Self {
        Expr::Projection(Box::new(value))
    }
}

impl From<SelectExpr> for Expr {
    fn from(value: SelectExpr) -> Self {
        Expr::Select(Box::new(value))
    }
}
