//! Expression AST shared by the query and command builders.
//!
//! - **Types**: logical `ValueType` / `ScalarType` and provider `DbType`
//! - **Alias**: per-compilation `TableAlias` allocation
//! - **Node**: the tagged-variant `Expr` tree and its node structs
//! - **Command**: INSERT / UPDATE / DELETE roots and column assignments
//! - **Rewrite**: child mapping and structural substitution

pub mod aggregator;
pub mod alias;
pub mod command;
pub mod node;
pub mod rewrite;
pub mod types;

#[doc(inline)]
pub use aggregator::Aggregator;
#[doc(inline)]
pub use alias::{AliasGenerator, TableAlias};
#[doc(inline)]
pub use command::{ColumnAssignment, Command, DeleteCommand, InsertCommand, UpdateCommand};
#[doc(inline)]
pub use node::{
    AggregateExpr, AggregateKind, AggregateSubqueryExpr, BinaryOp, ColumnDeclaration, ColumnExpr,
    EntityExpr, ExistsExpr, Expr, GeneratorExpr, InstanceRef, LambdaExpr, MemberBinding,
    MemberInitExpr, NamedValueExpr, ParameterExpr, ProjectionExpr, ScalarExpr, SelectExpr,
    SubqueryColumnExpr, TableExpr,
};
#[doc(inline)]
pub use rewrite::replace;
#[doc(inline)]
pub use types::{DbType, ScalarType, ValueType};
