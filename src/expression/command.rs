//! Mutation command nodes.

use super::node::{ColumnExpr, Expr, TableExpr};
use std::collections::HashSet;

/// `column = expression` within an INSERT or UPDATE
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnAssignment {
    pub column: ColumnExpr,
    pub expression: Expr,
}

impl ColumnAssignment {
    #[must_use]
    pub fn new(column: ColumnExpr, expression: Expr) -> Self {
        Self { column, expression }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertCommand {
    pub table: TableExpr,
    pub assignments: Vec<ColumnAssignment>,
    pub is_async: bool,
    /// The provider retrieves the auto-increment identity after the insert
    pub with_auto_increment: bool,
    /// At least one key value is produced by an external generator
    pub with_generate_value: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCommand {
    pub table: TableExpr,
    pub where_clause: Option<Expr>,
    pub assignments: Vec<ColumnAssignment>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCommand {
    pub table: TableExpr,
    pub where_clause: Option<Expr>,
    pub is_async: bool,
}

/// Root of a compiled mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Insert(InsertCommand),
    Update(UpdateCommand),
    Delete(DeleteCommand),
}

impl Command {
    #[must_use]
    pub fn table(&self) -> &TableExpr {
        match self {
            Command::Insert(c) => &c.table,
            Command::Update(c) => &c.table,
            Command::Delete(c) => &c.table,
        }
    }

    #[must_use]
    pub fn assignments(&self) -> &[ColumnAssignment] {
        match self {
            Command::Insert(c) => &c.assignments,
            Command::Update(c) => &c.assignments,
            Command::Delete(_) => &[],
        }
    }

    #[must_use]
    pub fn is_async(&self) -> bool {
        match self {
            Command::Insert(c) => c.is_async,
            Command::Update(c) => c.is_async,
            Command::Delete(c) => c.is_async,
        }
    }
}

/// Drop assignments to a column that is already assigned, keeping the first
pub(crate) fn dedupe_assignments(assignments: Vec<ColumnAssignment>) -> Vec<ColumnAssignment> {
    let mut seen = HashSet::new();
    assignments
        .into_iter()
        .filter(|a| seen.insert(a.column.name.clone()))
        .collect()
}
